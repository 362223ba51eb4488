use anyhow::Result;
use clap::Parser;
use siminterp::{
    app,
    cli::{handle_peers_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("siminterp {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Peers) => {
            handle_peers_command(cli.config.as_deref()).await?;
            return Ok(());
        }
        None => {}
    }

    app::run_service(cli.config.as_deref()).await
}
