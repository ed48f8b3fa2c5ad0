mod cli;
mod logging;

use anyhow::Context;
use snip_server::{Server, ServerConfig};

use cli::{ServeParams, build_cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let params = ServeParams::from_matches(&matches);

    logging::init(params.log_format).context("failed to install the log subscriber")?;

    let config = ServerConfig::from(params);
    let address = config.address();
    Server::new(config)
        .run()
        .await
        .with_context(|| format!("server on {address} failed"))
}
