use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use ecomonitor_core::{App, Config, Language};
use ecomonitor_env::{EnvClient, LocationSource, ReverseGeocoder};
use ecomonitor_ui::models::DashboardView;
use ecomonitor_ui::services::EnvironmentError;
use ecomonitor_ui::{Screen, Strings};

#[derive(Parser)]
#[command(name = "ecomonitor", version, about = "Air quality, rain and flood risk for any place")]
struct Cli {
    /// Config file (default: <config dir>/ecomonitor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Display language (en, pt)
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive dashboard (default)
    Run,
    /// Print the environment summary for a coordinate
    Env {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Search places by name
    Search { query: String },
    /// Resolve and name the configured location
    Locate,
    /// Check that the backend is reachable
    Status,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the current configuration to disk
    Init,
    /// Print the effective configuration
    Show,
    /// Report validation errors and warnings
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    ecomonitor_core::init()?;
    let cli = Cli::parse();

    let mut app = load_app(&cli)?;
    let command = cli.command.unwrap_or(Command::Run);

    // `config validate` reports problems instead of refusing to start
    if !matches!(
        command,
        Command::Config {
            action: ConfigAction::Validate
        }
    ) {
        app.initialize()?;
    }

    match command {
        Command::Run => run_screen(&app).await?,
        Command::Env { lat, lon } => print_environment(app.config(), lat, lon).await?,
        Command::Search { query } => print_places(app.config(), &query).await?,
        Command::Locate => print_location(app.config()).await?,
        Command::Status => print_status(app.config()).await?,
        Command::Config { action } => config_command(&cli.config, app.config(), action)?,
    }

    app.shutdown()?;
    Ok(())
}

fn load_app(cli: &Cli) -> Result<App> {
    let mut app = match &cli.config {
        None => App::new()?,
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            App::with_config(config)
        }
    };

    if cli.base_url.is_none() && cli.lang.is_none() {
        return Ok(app);
    }

    let mut config = app.config().clone();
    if let Some(url) = &cli.base_url {
        config.services.api_base_url = url.clone();
    }
    if let Some(tag) = &cli.lang {
        config.ui.language =
            Language::from_tag(tag).with_context(|| format!("Unsupported language: {}", tag))?;
    }
    app = App::with_config(config);
    Ok(app)
}

async fn run_screen(app: &App) -> Result<()> {
    let config = app.shared_config();
    let source = LocationSource::from_config(config.location.fixed());
    let (mut screen, channels) = Screen::new(config, Handle::current(), source)?;

    let colored = std::io::stdout().is_terminal();
    let input = spawn_stdin_reader();

    screen.start();
    let mut stdout = std::io::stdout();
    screen.run(channels, input, &mut stdout, colored).await?;
    Ok(())
}

/// Lines from stdin. Runs on a plain thread so a blocked read never holds up shutdown.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Stopped reading input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

async fn print_environment(config: &Config, lat: f64, lon: f64) -> Result<()> {
    let client = EnvClient::new(&config.services.api_base_url)?;
    let report = client
        .fetch_environment(lat, lon)
        .await
        .map_err(EnvironmentError::from)?;

    let strings = Strings::for_language(config.ui.language);
    let view = DashboardView::from_snapshot(&report.snapshot, strings);

    println!("{}: {} °C", strings.temperature, view.temperature);
    println!("{}: {} ({})", strings.aqi, view.aqi_value, view.aqi_status);
    println!("{}: {}", strings.pm2_5, view.pm2_5);
    println!("{}: {}", strings.pm10, view.pm10);
    println!("{}: {}", strings.max_probability, view.rain_probability);
    println!("{}: {}", strings.total_6h, view.rain_total);
    println!("{}", view.rain_risk);
    println!("{}", view.air_risk);
    println!("{}", view.flood_risk);
    if config.ui.show_raw {
        println!("{}", report.raw);
    }
    Ok(())
}

async fn print_places(config: &Config, query: &str) -> Result<()> {
    let client = EnvClient::new(&config.services.api_base_url)?;
    let places = client.search_places(query.trim()).await?;

    if places.is_empty() {
        println!("No places found for {:?}", query);
    }
    for place in places {
        match place.coordinates() {
            Some((lat, lon)) => println!("{}  ({:.4}, {:.4})", place, lat, lon),
            None => println!("{}", place),
        }
    }
    Ok(())
}

async fn print_location(config: &Config) -> Result<()> {
    let strings = Strings::for_language(config.ui.language);
    let source = LocationSource::from_config(config.location.fixed());

    let Some(location) = source.current_location().await? else {
        println!("{}", strings.location_unavailable);
        return Ok(());
    };

    let geocoder = ReverseGeocoder::new(&config.services.geocoder_url, &config.services.user_agent)?;
    let name = geocoder.reverse_geocode(&location).await;
    println!(
        "{} ({:.4}, {:.4})",
        name.as_deref().unwrap_or(strings.unknown),
        location.latitude,
        location.longitude
    );
    Ok(())
}

async fn print_status(config: &Config) -> Result<()> {
    let client = EnvClient::new(&config.services.api_base_url)?;
    let status = client.status().await?;
    println!(
        "{} at {}: {} ({})",
        status.service,
        client.base_url(),
        if status.ok { "ok" } else { "not ok" },
        status.utc.to_rfc3339()
    );
    Ok(())
}

fn config_command(path: &Option<PathBuf>, config: &Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let written = match path {
                Some(path) => {
                    config.save_to(path)?;
                    path.clone()
                }
                None => config.save()?,
            };
            println!("Wrote {}", written.display());
        }
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Validate => {
            let validation = config.validate();
            for error in &validation.errors {
                println!("error: {}", error);
            }
            for warning in &validation.warnings {
                println!("warning: {}", warning);
            }
            if !validation.is_valid() {
                anyhow::bail!("Configuration is invalid");
            }
            println!("Configuration is valid");
        }
    }
    Ok(())
}
