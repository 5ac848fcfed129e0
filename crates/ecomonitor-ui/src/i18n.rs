//! Display strings for the two supported languages.

use ecomonitor_core::Language;
use ecomonitor_env::AqiBucket;

/// Shown wherever a value is missing
pub const PLACEHOLDER: &str = "—";

/// Risk levels the backend reports, in either language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl RiskLevel {
    /// Case-insensitive; unknown words yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" | "baixo" => Some(Self::Low),
            "moderate" | "médio" | "medio" | "moderado" => Some(Self::Moderate),
            "high" | "alto" => Some(Self::High),
            "very high" | "muito alto" => Some(Self::VeryHigh),
            "extreme" | "extremo" => Some(Self::Extreme),
            _ => None,
        }
    }
}

pub struct Strings {
    pub aqi_very_good: &'static str,
    pub aqi_good: &'static str,
    pub aqi_moderate: &'static str,
    pub aqi_bad: &'static str,
    pub aqi_very_bad: &'static str,
    pub aqi_unknown: &'static str,

    pub risk_low: &'static str,
    pub risk_moderate: &'static str,
    pub risk_high: &'static str,
    pub risk_very_high: &'static str,
    pub risk_extreme: &'static str,

    pub rain_risk: &'static str,
    pub air_risk: &'static str,
    pub flood_risk: &'static str,

    pub temperature: &'static str,
    pub aqi: &'static str,
    pub pm2_5: &'static str,
    pub pm10: &'static str,
    pub max_probability: &'static str,
    pub total_6h: &'static str,
    pub place: &'static str,
    pub suggestions: &'static str,
    pub diagnostics: &'static str,

    pub loading: &'static str,
    pub provide_lat_lon: &'static str,
    pub invalid_coordinate: &'static str,
    pub error: &'static str,
    pub unknown: &'static str,
    pub location_permission_denied: &'static str,
    pub location_unavailable: &'static str,
    pub no_such_suggestion: &'static str,
    pub unknown_command: &'static str,
    pub help: &'static str,
}

static EN: Strings = Strings {
    aqi_very_good: "Very good",
    aqi_good: "Good",
    aqi_moderate: "Moderate",
    aqi_bad: "Bad",
    aqi_very_bad: "Very bad",
    aqi_unknown: "Unknown",

    risk_low: "Low",
    risk_moderate: "Moderate",
    risk_high: "High",
    risk_very_high: "Very high",
    risk_extreme: "Extreme",

    rain_risk: "Rain risk",
    air_risk: "Air risk",
    flood_risk: "Flood risk",

    temperature: "Temperature",
    aqi: "AQI",
    pm2_5: "PM2.5",
    pm10: "PM10",
    max_probability: "Max probability (6h)",
    total_6h: "Total (6h)",
    place: "Place",
    suggestions: "Suggestions",
    diagnostics: "Diagnostics",

    loading: "Loading…",
    provide_lat_lon: "Provide latitude and longitude",
    invalid_coordinate: "invalid coordinate",
    error: "Error",
    unknown: "Unknown",
    location_permission_denied: "Location permission denied",
    location_unavailable: "Location unavailable",
    no_such_suggestion: "No such suggestion",
    unknown_command: "Unknown command",
    help: "Type a city name to search. Commands: :search  :select N  :lat X  :lon Y  \
           :fetch  :locate  :raw  :lang  :help  :quit",
};

static PT: Strings = Strings {
    aqi_very_good: "Muito bom",
    aqi_good: "Bom",
    aqi_moderate: "Moderado",
    aqi_bad: "Ruim",
    aqi_very_bad: "Muito ruim",
    aqi_unknown: "Desconhecido",

    risk_low: "Baixo",
    risk_moderate: "Moderado",
    risk_high: "Alto",
    risk_very_high: "Muito alto",
    risk_extreme: "Extremo",

    rain_risk: "Risco de chuva",
    air_risk: "Risco do ar",
    flood_risk: "Risco de alagamento",

    temperature: "Temperatura",
    aqi: "IQA",
    pm2_5: "PM2.5",
    pm10: "PM10",
    max_probability: "Probabilidade máx. (6h)",
    total_6h: "Total (6h)",
    place: "Local",
    suggestions: "Sugestões",
    diagnostics: "Diagnóstico",

    loading: "Carregando…",
    provide_lat_lon: "Informe latitude e longitude",
    invalid_coordinate: "coordenada inválida",
    error: "Erro",
    unknown: "Desconhecido",
    location_permission_denied: "Permissão de localização negada",
    location_unavailable: "Localização indisponível",
    no_such_suggestion: "Sugestão inexistente",
    unknown_command: "Comando desconhecido",
    help: "Digite o nome de uma cidade para buscar. Comandos: :search  :select N  :lat X  \
           :lon Y  :fetch  :locate  :raw  :lang  :help  :quit",
};

impl Strings {
    pub fn for_language(language: Language) -> &'static Strings {
        match language {
            Language::En => &EN,
            Language::Pt => &PT,
        }
    }

    pub fn aqi_label(&self, bucket: Option<AqiBucket>) -> &'static str {
        match bucket {
            Some(AqiBucket::VeryGood) => self.aqi_very_good,
            Some(AqiBucket::Good) => self.aqi_good,
            Some(AqiBucket::Moderate) => self.aqi_moderate,
            Some(AqiBucket::Bad) => self.aqi_bad,
            Some(AqiBucket::VeryBad) => self.aqi_very_bad,
            None => self.aqi_unknown,
        }
    }

    pub fn risk_label(&self, level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Low => self.risk_low,
            RiskLevel::Moderate => self.risk_moderate,
            RiskLevel::High => self.risk_high,
            RiskLevel::VeryHigh => self.risk_very_high,
            RiskLevel::Extreme => self.risk_extreme,
        }
    }

    /// Localized label for a backend risk string; unknown words pass through.
    pub fn translate_risk(&self, raw: Option<&str>) -> String {
        match raw {
            None => PLACEHOLDER.to_string(),
            Some(raw) => match RiskLevel::parse(raw) {
                Some(level) => self.risk_label(level).to_string(),
                None => raw.to_string(),
            },
        }
    }
}
