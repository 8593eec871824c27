//! Sends plain text alert emails through an SMTP relay.
//!
//! Configuration comes either from a JSON file with an `email` section (see
//! [`Config`]) or from explicit arguments to [`EmailAlert::new`]. Either way
//! the settings are fixed at construction and [`EmailAlert::send_alert`]
//! performs one blocking SMTP submission per call.
//!
//! Expected config file contents:
//!
//! ```json
//! {
//!     "email": {
//!         "alert_email": "recipient@example.com",
//!         "smtp_server": "smtp.example.com",
//!         "smtp_port": 587,
//!         "smtp_user": "your_email@example.com",
//!         "smtp_password": "your_password"
//!     }
//! }
//! ```

mod alert;
mod config;

pub use alert::EmailAlert;
pub use config::{Config, EmailSettings, DEFAULT_SMTP_PORT};
