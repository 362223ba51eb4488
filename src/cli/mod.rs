use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod peers;

pub use peers::handle_peers_command;

#[derive(Parser, Debug)]
#[command(name = "siminterp")]
#[command(about = "Simultaneous interpretation coordinator for meeting room devices", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// List configured endpoints with the name each device reports
    Peers,
}
