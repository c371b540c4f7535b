use serde::Serialize;

use cascade_core::config::{AppConfig, LoadOptions};

use crate::commands::{block_on, CommandResult};

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    passed: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    command: &'static str,
    status: &'static str,
    checks: Vec<DoctorCheck>,
}

/// Validates configuration and database readiness without mutating anything
/// beyond applying pending migrations.
pub fn run(options: LoadOptions) -> CommandResult {
    let mut checks = Vec::new();

    let config = match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config",
                passed: true,
                detail: format!("database url `{}`", config.database.url),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck { name: "config", passed: false, detail: error.to_string() });
            None
        }
    };

    if let Some(config) = config {
        let connectivity = block_on("doctor", async {
            let pool = cascade_db::connect(&config.database)
                .await
                .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
            cascade_db::migrations::run_pending(&pool)
                .await
                .map_err(|error| ("migration", error.to_string(), 5u8))?;
            pool.close().await;
            Ok(())
        });

        match connectivity {
            Ok(()) => checks.push(DoctorCheck {
                name: "database",
                passed: true,
                detail: "connected and migrations applied".to_string(),
            }),
            Err(result) => {
                checks.push(DoctorCheck { name: "database", passed: false, detail: result.output })
            }
        }
    }

    let all_passed = checks.iter().all(|check| check.passed);
    let report = DoctorReport {
        command: "doctor",
        status: if all_passed { "ok" } else { "error" },
        checks,
    };
    let output = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"));

    CommandResult { exit_code: if all_passed { 0 } else { 1 }, output }
}
