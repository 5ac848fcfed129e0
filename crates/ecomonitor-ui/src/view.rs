//! Plain-text rendering of the screen.

use std::fmt::Write;

use crate::screen::Screen;

const RULE: &str = "────────────────────────────────────────";

/// Render the whole screen. `colored` paints the AQI chip with ANSI colours.
pub fn render(screen: &Screen, colored: bool) -> String {
    let strings = screen.strings();
    let dashboard = screen.dashboard();
    let view = dashboard.view();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "EcoMonitor");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "{}: {}",
        strings.place,
        dashboard.place_label().unwrap_or(crate::i18n::PLACEHOLDER)
    );
    let _ = writeln!(
        out,
        "lat: {}   lon: {}{}",
        dashboard.latitude(),
        dashboard.longitude(),
        if screen.location().locate_enabled() { "" } else { "   (…)" }
    );
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "{}: {} °C", strings.temperature, view.temperature);
    let status = if colored {
        paint(&view.aqi_status, view.aqi_color, view.aqi_text_color)
    } else {
        format!("[{}]", view.aqi_status)
    };
    let _ = writeln!(out, "{}: {} {}", strings.aqi, view.aqi_value, status);
    let _ = writeln!(
        out,
        "{}: {}   {}: {}",
        strings.pm2_5, view.pm2_5, strings.pm10, view.pm10
    );
    let _ = writeln!(
        out,
        "{}: {}   {}: {}",
        strings.max_probability, view.rain_probability, strings.total_6h, view.rain_total
    );
    let _ = writeln!(
        out,
        "[{}]  [{}]  [{}]",
        view.rain_risk, view.air_risk, view.flood_risk
    );

    let suggestions = screen.autocomplete().suggestions();
    if !suggestions.is_empty() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}:", strings.suggestions);
        for (i, suggestion) in suggestions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, suggestion);
        }
    }

    if let Some(message) = dashboard.message() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", message);
    }
    if let Some(notice) = screen.notice() {
        let _ = writeln!(out, "{}", notice);
    }

    if screen.show_raw() && !dashboard.raw_output().is_empty() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", dashboard.raw_output());
    }

    let diagnostics = screen.diagnostics();
    if !diagnostics.is_empty() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}:", strings.diagnostics);
        for entry in diagnostics.entries() {
            let _ = writeln!(out, "  {}", entry);
        }
    }

    out
}

/// 24-bit ANSI background/foreground from ARGB colours
fn paint(text: &str, background: u32, foreground: u32) -> String {
    let (br, bg, bb) = rgb(background);
    let (fr, fg, fb) = rgb(foreground);
    format!("\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m {text} \x1b[0m")
}

fn rgb(argb: u32) -> (u8, u8, u8) {
    let [_, r, g, b] = argb.to_be_bytes();
    (r, g, b)
}
