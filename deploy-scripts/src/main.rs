use clap::Parser;
use deploy_scripts::cli::Cli;
use tracing_subscriber::EnvFilter;

/// The log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let Cli {
        priv_key,
        rpc_url,
        command,
    } = Cli::parse();

    // Logs go to stderr, stdout only carries the command's result
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    command.run(&priv_key, &rpc_url).await?;

    Ok(())
}
