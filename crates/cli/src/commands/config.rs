use serde::Serialize;

use cascade_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Serialize)]
struct ConfigReport {
    command: &'static str,
    status: &'static str,
    database_url: String,
    database_max_connections: u32,
    database_timeout_secs: u64,
    log_level: String,
    log_format: String,
}

/// Prints the effective configuration after all layers applied, so an
/// operator can see what the other commands would run with.
pub fn run(options: LoadOptions) -> String {
    match AppConfig::load(options) {
        Ok(config) => {
            let report = ConfigReport {
                command: "config",
                status: "ok",
                database_url: config.database.url,
                database_max_connections: config.database.max_connections,
                database_timeout_secs: config.database.timeout_secs,
                log_level: config.logging.level,
                log_format: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            };
            serde_json::to_string_pretty(&report)
                .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"))
        }
        Err(error) => {
            format!("{{\"command\":\"config\",\"status\":\"error\",\"message\":\"{error}\"}}")
        }
    }
}
