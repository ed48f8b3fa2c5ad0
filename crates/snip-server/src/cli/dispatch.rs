//! Extracts settings from `ArgMatches`.

use clap::ArgMatches;
use snip_lib::{EvaluatorConfig, FuelLimits};
use snip_server::ServerConfig;

use super::LogFormat;

pub struct ServeParams {
    pub host: String,
    pub port: u16,
    pub fuel: u64,
    pub max_collection: usize,
    pub strict: bool,
    pub max_body: usize,
    pub log_format: LogFormat,
}

impl ServeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let defaults = ServerConfig::default();
        let limits = FuelLimits::default();
        Self {
            host: m.get_one::<String>("host").cloned().unwrap_or(defaults.host),
            port: m.get_one::<u16>("port").copied().unwrap_or(defaults.port),
            fuel: m
                .get_one::<u64>("fuel")
                .copied()
                .unwrap_or(limits.get_exec_fuel()),
            max_collection: m
                .get_one::<usize>("max_collection")
                .copied()
                .unwrap_or(limits.get_max_collection()),
            strict: m.get_flag("strict"),
            max_body: m
                .get_one::<usize>("max_body")
                .copied()
                .unwrap_or(defaults.max_body),
            log_format: parse_log_format(m),
        }
    }
}

impl From<ServeParams> for ServerConfig {
    fn from(p: ServeParams) -> Self {
        let limits = FuelLimits::new()
            .exec_fuel(p.fuel)
            .max_collection(p.max_collection);
        Self {
            host: p.host,
            port: p.port,
            max_body: p.max_body,
            evaluator: EvaluatorConfig::new().strict(p.strict).limits(limits),
        }
    }
}

fn parse_log_format(m: &ArgMatches) -> LogFormat {
    match m.get_one::<String>("log_format").map(String::as_str) {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}
