//! Configuration and CLI argument handling

use std::sync::Arc;

use clap::Parser;

use crate::{
    services::{LogRecorder, RestRecorder, SessionRecorder},
    state::{TimerOptions, TimerProfile},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "zene")]
#[command(about = "Session timer service for Pomodoro focus and meditation")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Which timer screen to drive
    #[arg(long, value_enum, default_value = "pomodoro")]
    pub profile: TimerProfile,

    /// Start the next countdown right after a work or break interval ends
    #[arg(long)]
    pub auto_continue: bool,

    /// Also store finished meditations in the backend
    #[arg(long)]
    pub record_meditation: bool,

    /// Base URL of the hosted backend; records are only logged when unset
    #[arg(long, env = "ZENE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// API key sent to the backend
    #[arg(long, env = "ZENE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// User the records belong to
    #[arg(long, env = "ZENE_USER_ID")]
    pub user_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn timer_options(&self) -> TimerOptions {
        TimerOptions {
            profile: self.profile,
            auto_continue: self.auto_continue,
            record_meditation: self.record_meditation,
        }
    }

    /// Build the durable-record collaborator for this configuration
    pub fn recorder(&self) -> Arc<dyn SessionRecorder> {
        match &self.backend_url {
            Some(url) => Arc::new(RestRecorder::new(
                url.clone(),
                self.api_key.clone(),
                self.user_id.clone(),
            )),
            None => Arc::new(LogRecorder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["zene"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.timer_options(), TimerOptions::new(TimerProfile::Pomodoro));
    }

    #[test]
    fn test_timer_flags() {
        let config = Config::try_parse_from([
            "zene",
            "--profile",
            "meditation",
            "--auto-continue",
            "--record-meditation",
            "-v",
        ])
        .unwrap();

        let options = config.timer_options();
        assert_eq!(options.profile, TimerProfile::Meditation);
        assert!(options.auto_continue);
        assert!(options.record_meditation);
        assert_eq!(config.log_level(), "debug");
    }
}
