mod args;
mod dispatch;

#[cfg(test)]
mod dispatch_tests;

use clap::Command;

use args::*;

pub use dispatch::ServeParams;

/// Log line format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Build the `snip` command.
pub fn build_cli() -> Command {
    Command::new("snip")
        .about("Live evaluation service for C#-flavoured snippets")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            r#"EXAMPLES:
  snip                                # http://127.0.0.1:8080/
  snip --port 9000 --strict
  snip --fuel 1000000 --log-format json
  curl -d '{"code": "return 2 + 2;"}' http://127.0.0.1:8080/code"#,
        )
        .arg(host_arg())
        .arg(port_arg())
        .arg(fuel_arg())
        .arg(max_collection_arg())
        .arg(strict_arg())
        .arg(max_body_arg())
        .arg(log_format_arg())
}
