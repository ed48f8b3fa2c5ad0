//! Shared argument builders.
//!
//! Every flag can also be set through a `SNIP_*` environment variable.

use clap::{Arg, ArgAction, value_parser};
use snip_lib::FuelLimits;

use snip_server::{DEFAULT_HOST, DEFAULT_MAX_BODY, DEFAULT_PORT};

/// Listen address (--host).
pub fn host_arg() -> Arg {
    Arg::new("host")
        .long("host")
        .env("SNIP_HOST")
        .value_name("HOST")
        .default_value(DEFAULT_HOST)
        .help("Address to listen on")
}

/// Listen port (--port).
pub fn port_arg() -> Arg {
    Arg::new("port")
        .short('p')
        .long("port")
        .env("SNIP_PORT")
        .value_name("PORT")
        .value_parser(value_parser!(u16))
        .default_value(DEFAULT_PORT.to_string())
        .help("Port to listen on")
}

/// Execution fuel per snippet (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .env("SNIP_FUEL")
        .value_name("STEPS")
        .value_parser(value_parser!(u64).range(1..))
        .default_value(FuelLimits::default().get_exec_fuel().to_string())
        .help("Execution steps allowed per snippet")
}

/// Collection size limit (--max-collection).
pub fn max_collection_arg() -> Arg {
    Arg::new("max_collection")
        .long("max-collection")
        .env("SNIP_MAX_COLLECTION")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .default_value(FuelLimits::default().get_max_collection().to_string())
        .help("Largest collection or string a snippet may build")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .env("SNIP_STRICT")
        .action(ArgAction::SetTrue)
        .help("Treat compiler warnings as errors")
}

/// Request body limit (--max-body).
pub fn max_body_arg() -> Arg {
    Arg::new("max_body")
        .long("max-body")
        .env("SNIP_MAX_BODY")
        .value_name("BYTES")
        .value_parser(value_parser!(usize))
        .default_value(DEFAULT_MAX_BODY.to_string())
        .help("Largest accepted request body")
}

/// Log output format (--log-format).
pub fn log_format_arg() -> Arg {
    Arg::new("log_format")
        .long("log-format")
        .env("SNIP_LOG_FORMAT")
        .value_name("FORMAT")
        .default_value("text")
        .value_parser(["text", "json"])
        .help("Log output format")
}
