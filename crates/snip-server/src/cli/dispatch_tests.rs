use snip_lib::{EvaluatorConfig, FuelLimits};
use snip_server::ServerConfig;

use super::*;

fn parse(args: &[&str]) -> ServeParams {
    let m = build_cli()
        .try_get_matches_from(std::iter::once("snip").chain(args.iter().copied()))
        .unwrap();
    ServeParams::from_matches(&m)
}

#[test]
fn defaults_match_server_config() {
    // Guard against a developer shell exporting SNIP_* variables.
    if std::env::vars().any(|(key, _)| key.starts_with("SNIP_")) {
        return;
    }

    let params = parse(&[]);

    assert_eq!(params.log_format, LogFormat::Text);
    assert_eq!(ServerConfig::from(params), ServerConfig::default());
}

#[test]
fn flags_override_defaults() {
    let params = parse(&[
        "--host",
        "0.0.0.0",
        "--port",
        "9000",
        "--fuel",
        "5000",
        "--max-collection",
        "64",
        "--strict",
        "--max-body",
        "2048",
        "--log-format",
        "json",
    ]);

    assert_eq!(params.log_format, LogFormat::Json);
    let config = ServerConfig::from(params);
    assert_eq!(config.address(), "0.0.0.0:9000");
    assert_eq!(config.max_body, 2048);
    assert_eq!(
        config.evaluator,
        EvaluatorConfig::new()
            .strict(true)
            .limits(FuelLimits::new().exec_fuel(5000).max_collection(64))
    );
}

#[test]
fn short_port_flag() {
    assert_eq!(parse(&["-p", "3000"]).port, 3000);
}

#[test]
fn rejects_invalid_values() {
    assert!(build_cli().try_get_matches_from(["snip", "--port", "70000"]).is_err());
    assert!(build_cli().try_get_matches_from(["snip", "--fuel", "0"]).is_err());
    assert!(build_cli().try_get_matches_from(["snip", "--log-format", "xml"]).is_err());
    assert!(build_cli().try_get_matches_from(["snip", "extra"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}
