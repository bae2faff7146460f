use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mixremote-ctl",
    about = "Remote control client for a running MixProcessing instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue one remote call and print the dispatched response.
    Call(CallCmd),
}

#[derive(Args)]
pub struct CallCmd {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Handler name the server echoes back in the response's `callback`
    /// field.
    pub handler: String,

    /// Raw script payload, e.g. "mp.channelOn('channel0');".
    pub payload: String,
}
