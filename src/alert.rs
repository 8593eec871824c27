use std::path::Path;

use anyhow::{bail, Context};
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use log::{error, info};

use crate::config::{Config, DEFAULT_SMTP_PORT};

/// Relay host used when none is supplied to [`EmailAlert::new`]
const PLACEHOLDER_SMTP_SERVER: &str = "smtp.example.com";

/// Sends plain text alert emails through an SMTP relay
///
/// Construct once at startup, either from a config file or from explicit
/// values, then call [`EmailAlert::send_alert`] whenever an alert needs to
/// go out. The settings are immutable after construction and each send opens
/// its own connection.
#[derive(Debug)]
pub struct EmailAlert {
    alert_email: Mailbox,
    smtp_server: String,
    smtp_port: u16,
    smtp_user: Mailbox,
    smtp_password: String,
}

impl EmailAlert {
    /// Loads the `email` section of the config file at `config_path`
    pub fn from_config_file(config_path: &Path) -> anyhow::Result<Self> {
        let config = match Config::load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load email configuration: {e:#}");
                return Err(e);
            }
        };
        let email = config.email;
        Self::build(
            email.alert_email,
            email.smtp_user,
            email.smtp_password,
            email.smtp_server,
            email.smtp_port,
        )
    }

    /// Builds a sender from explicit values instead of a config file
    ///
    /// `smtp_server` and `smtp_port` may be omitted, falling back to a
    /// placeholder host and the standard submission port 587.
    pub fn new(
        alert_email: String,
        smtp_user: String,
        smtp_password: String,
        smtp_server: Option<String>,
        smtp_port: Option<u16>,
    ) -> anyhow::Result<Self> {
        Self::build(
            alert_email,
            smtp_user,
            smtp_password,
            smtp_server.unwrap_or_else(|| PLACEHOLDER_SMTP_SERVER.to_string()),
            smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
        )
    }

    /// All required fields are checked here so a bad value fails at
    /// construction rather than on the first send
    fn build(
        alert_email: String,
        smtp_user: String,
        smtp_password: String,
        smtp_server: String,
        smtp_port: u16,
    ) -> anyhow::Result<Self> {
        if smtp_server.is_empty() {
            bail!("smtp_server must not be empty");
        }
        if smtp_password.is_empty() {
            bail!("smtp_password must not be empty");
        }
        let alert_email = parse_mailbox(&alert_email, "alert_email")?;
        let smtp_user = parse_mailbox(&smtp_user, "smtp_user")?;
        Ok(Self {
            alert_email,
            smtp_server,
            smtp_port,
            smtp_user,
            smtp_password,
        })
    }

    /// Sends one alert email using the stored settings
    ///
    /// Blocks for the duration of the SMTP transaction. Success and failure
    /// each produce one log line; failures also propagate to the caller.
    pub fn send_alert(&self, subject: &str, message: &str) -> anyhow::Result<()> {
        match self.try_send(subject, message) {
            Ok(()) => {
                info!("Alert email sent to {}", self.alert_email);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email alert: {e:#}");
                Err(e)
            }
        }
    }

    fn try_send(&self, subject: &str, message: &str) -> anyhow::Result<()> {
        let email = self.build_message(subject, message)?;

        let credentials = Credentials::new(
            self.smtp_user.email.to_string(),
            self.smtp_password.clone(),
        );
        // The transport only lives for this call, dropping it closes the
        // connection on every exit path
        let mailer = SmtpTransport::starttls_relay(&self.smtp_server)
            .with_context(|| format!("Failed to set up relay to {}", self.smtp_server))?
            .port(self.smtp_port)
            .credentials(credentials)
            .build();
        mailer.send(&email).with_context(|| {
            format!(
                "Failed to send alert via {}:{}",
                self.smtp_server, self.smtp_port
            )
        })?;
        Ok(())
    }

    fn build_message(&self, subject: &str, message: &str) -> anyhow::Result<Message> {
        Message::builder()
            .from(self.smtp_user.clone())
            .to(self.alert_email.clone())
            .subject(subject)
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(message.to_string())))
            .context("Failed to build alert message")
    }
}

fn parse_mailbox(address: &str, field: &str) -> anyhow::Result<Mailbox> {
    if address.is_empty() {
        bail!("{field} must not be empty");
    }
    address
        .parse()
        .with_context(|| format!("Failed to parse {field} as an email address: {address:?}"))
}
