// --- File: crates/calmirror_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_GCAL_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/calmirror.db, via CALMIRROR_DATABASE__URL
    #[serde(default)]
    pub max_connections: Option<u32>,
}

// --- Google Calendar Config ---
// Account credentials live in the accounts table, not here.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    #[serde(default)]
    pub calendar_id: Option<String>, // defaults to "primary"
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>, // IANA name used for created events
    #[serde(default)]
    pub webhook_url: Option<String>, // public address of the webhook endpoint
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl GcalConfig {
    pub fn calendar_id(&self) -> &str {
        self.calendar_id.as_deref().unwrap_or("primary")
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GCAL_API_BASE)
            .trim_end_matches('/')
    }

    pub fn time_zone(&self) -> &str {
        self.time_zone.as_deref().unwrap_or("UTC")
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
