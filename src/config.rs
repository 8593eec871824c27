use std::{fs, path::Path};

use anyhow::Context;
use log::debug;
use serde::Deserialize;

/// Standard SMTP submission port, used when the config omits one
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Relay, credential and recipient settings for alert emails
    pub email: EmailSettings,
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    /// Recipient of alert emails
    pub alert_email: String,

    /// Host of the SMTP relay to submit through
    pub smtp_server: String,

    /// Submission port on the relay
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Account to authenticate as, also used as the From address
    pub smtp_user: String,

    pub smtp_password: String,
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

impl Config {
    pub fn load_from(config_path: &Path) -> anyhow::Result<Config> {
        debug!("Loading Config from: {config_path:?}");
        let file_contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read contents of {config_path:?}"))?;
        let result = serde_json::from_str(&file_contents)
            .with_context(|| format!("Failed to parse contents of {config_path:?}"))?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"{
        "email": {
            "alert_email": "alerts@example.com",
            "smtp_server": "smtp.example.com",
            "smtp_port": 2525,
            "smtp_user": "monitor@example.com",
            "smtp_password": "hunter2"
        }
    }"#;

    #[test]
    fn full_config_parses() {
        let config: Config = serde_json::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.email.alert_email, "alerts@example.com");
        assert_eq!(config.email.smtp_server, "smtp.example.com");
        assert_eq!(config.email.smtp_port, 2525);
        assert_eq!(config.email.smtp_user, "monitor@example.com");
        assert_eq!(config.email.smtp_password, "hunter2");
    }

    #[test]
    fn omitted_port_defaults_to_587() {
        let input = r#"{
            "email": {
                "alert_email": "alerts@example.com",
                "smtp_server": "smtp.example.com",
                "smtp_user": "monitor@example.com",
                "smtp_password": "hunter2"
            }
        }"#;

        let config: Config = serde_json::from_str(input).unwrap();

        assert_eq!(config.email.smtp_port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn missing_required_key_fails() {
        // smtp_password omitted
        let input = r#"{
            "email": {
                "alert_email": "alerts@example.com",
                "smtp_server": "smtp.example.com",
                "smtp_user": "monitor@example.com"
            }
        }"#;

        let result: Result<Config, _> = serde_json::from_str(input);

        assert!(result.is_err());
    }

    #[test]
    fn load_from_reads_file() {
        let path = std::env::temp_dir().join("email_alert_load_from_reads_file.json");
        fs::write(&path, FULL_CONFIG).unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.email.alert_email, "alerts@example.com");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_from_missing_file_fails() {
        let path = Path::new("does_not_exist_email_alert.json");

        let result = Config::load_from(path);

        assert!(result.is_err());
    }
}
