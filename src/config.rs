//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (SMTP credentials) are referenced by env-var name in the config
//! and resolved at runtime via `std::env::var`; the file itself carries
//! no secret material.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub state: StateConfig,
    pub alerts: AlertsConfig,
    /// Tracked entities. Order is significant: when several patterns match
    /// the same row, the last one in this list wins.
    pub entities: Vec<EntityPattern>,
}

/// The regulator's public data endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub url: String,
    /// Fixed section identifier (27 = SOFIPOs).
    pub section: u32,
    /// Fixed currency filter sent as `mone_s`.
    pub currency: String,
    /// Substring that distinguishes a genuine data page from an empty or
    /// error page.
    pub marker: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// One tracked entity: a substring pattern matched against the table's
/// institution-name cell, and the short id used in reports.
#[derive(Debug, Deserialize, Clone)]
pub struct EntityPattern {
    pub pattern: String,
    pub short: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    /// Path of the persisted cursor record.
    pub cursor_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    pub recipients: Vec<String>,
    pub from_name: String,
    pub smtp_host: String,
    /// Env-var name holding the sender account.
    pub user_env: String,
    /// Env-var name holding the app password.
    pub password_env: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [source]
        url = "https://registros.condusef.gob.mx/reco/cartera_credito_institucion.php"
        section = 27
        currency = "peso"
        marker = "CARTERA TOTAL"

        [state]
        cursor_file = "last_known_period.json"

        [alerts]
        recipients = ["credit-alerts@example.com"]
        from_name = "CONDUSEF Monitor"
        smtp_host = "smtp.gmail.com"
        user_env = "GMAIL_USER"
        password_env = "GMAIL_APP_PASSWORD"

        [[entities]]
        pattern = "Klar Technologies"
        short = "Klar"

        [[entities]]
        pattern = "Stori México"
        short = "Stori"
    "#;

    #[test]
    fn test_parse_sample_config() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.source.section, 27);
        assert_eq!(cfg.source.currency, "peso");
        assert_eq!(cfg.source.marker, "CARTERA TOTAL");
        assert_eq!(cfg.source.timeout_secs, 30, "timeout defaults to 30s");
        assert_eq!(cfg.entities.len(), 2);
        assert_eq!(cfg.entities[1].short, "Stori");
        assert_eq!(cfg.alerts.recipients.len(), 1);
    }

    #[test]
    fn test_timeout_override() {
        let toml_str = SAMPLE.replace(
            "marker = \"CARTERA TOTAL\"",
            "marker = \"CARTERA TOTAL\"\ntimeout_secs = 10",
        );
        let cfg: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(cfg.source.timeout_secs, 10);
    }

    #[test]
    fn test_load_repo_config() {
        // The checked-in config.toml must stay parseable.
        let cfg = AppConfig::load("config.toml").unwrap();
        assert_eq!(cfg.source.section, 27);
        assert!(!cfg.entities.is_empty());
    }
}
