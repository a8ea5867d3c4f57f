//! Configuration loading and gateway candidate parsing

pub mod settings;

pub use settings::{CredentialsConfig, GatewayConfig, GatewaySettings, LoggingConfig, Settings};
