use cascade_cli::commands;
use cascade_core::config::{ConfigOverrides, LoadOptions};

fn options_for(database_url: &str) -> LoadOptions {
    LoadOptions {
        overrides: ConfigOverrides {
            database_url: Some(database_url.to_string()),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }
}

fn temp_database() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("temp dir");
    // The file does not exist yet; connecting is expected to create it.
    let url = format!("sqlite://{}", dir.path().join("cascade-test.db").display());
    (dir, url)
}

#[test]
fn tracing_init_accepts_every_configured_format() {
    use cascade_core::config::{LogFormat, LoggingConfig};

    // Only the first registration takes effect; later calls must be no-ops
    // rather than panics.
    for format in [LogFormat::Compact, LogFormat::Pretty, LogFormat::Json] {
        cascade_cli::init_tracing(&LoggingConfig { level: "debug".to_string(), format });
    }
}

#[test]
fn migrate_seed_and_price_run_end_to_end() {
    let (_dir, url) = temp_database();

    let migrate = commands::migrate::run(options_for(&url));
    assert_eq!(migrate.exit_code, 0, "migrate failed: {}", migrate.output);

    let seed = commands::seed::run(options_for(&url));
    assert_eq!(seed.exit_code, 0, "seed failed: {}", seed.output);
    let seed_payload: serde_json::Value = serde_json::from_str(&seed.output).expect("seed json");
    assert_eq!(seed_payload["status"], "ok");

    let price = commands::price::run(options_for(&url), "contract-demo-001");
    assert_eq!(price.exit_code, 0, "price failed: {}", price.output);
    let report: serde_json::Value = serde_json::from_str(&price.output).expect("price json");

    assert_eq!(report["status"], "ok");
    assert_eq!(report["contract_id"], "contract-demo-001");
    assert_eq!(report["warnings"].as_array().expect("warnings").len(), 0);
    assert_eq!(report["lines"].as_array().expect("lines").len(), 6);
    // Only the item-level seed row is a selected item; ancestors select
    // nothing by themselves.
    assert_eq!(report["flattened"].as_array().expect("flattened").len(), 1);

    let gauze = report["lines"]
        .as_array()
        .expect("lines")
        .iter()
        .find(|line| line["target_id"] == "item-gauze-4x4")
        .expect("gauze line");
    let net_price: rust_decimal::Decimal = gauze["pricing"]["price_after_conditional_rebate"]
        .as_str()
        .expect("decimal string")
        .parse()
        .expect("parse decimal");
    assert_eq!(net_price, rust_decimal_macros::dec!(83.79));
}

#[test]
fn price_against_an_unknown_contract_reports_empty_session() {
    let (_dir, url) = temp_database();

    commands::migrate::run(options_for(&url));
    commands::seed::run(options_for(&url));

    let price = commands::price::run(options_for(&url), "contract-missing");
    assert_eq!(price.exit_code, 0);
    let report: serde_json::Value = serde_json::from_str(&price.output).expect("price json");
    assert_eq!(report["flattened"].as_array().expect("flattened").len(), 0);
    assert_eq!(report["lines"].as_array().expect("lines").len(), 6);
}

#[test]
fn doctor_reports_ok_for_a_reachable_database() {
    let (_dir, url) = temp_database();

    let doctor = commands::doctor::run(options_for(&url));
    assert_eq!(doctor.exit_code, 0, "doctor failed: {}", doctor.output);
    let report: serde_json::Value = serde_json::from_str(&doctor.output).expect("doctor json");
    assert_eq!(report["status"], "ok");
}

#[test]
fn config_command_prints_the_effective_database_url() {
    let (_dir, url) = temp_database();

    let output = commands::config::run(options_for(&url));
    let report: serde_json::Value = serde_json::from_str(&output).expect("config json");
    assert_eq!(report["database_url"], url.as_str());
}
