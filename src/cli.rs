//! CLI struct definitions for the `genbridge` operator binary.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "genbridge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Persistence and account-state layer for GenerationBridge: migrate, seed, inspect moderation."
)]
pub(crate) struct Cli {
    /// TOML config file. Missing files fall back to defaults.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Create or upgrade the database, then seed baseline data.
    Init {
        /// Print the boot report as JSON.
        #[clap(long)]
        json: bool,
    },
    /// Print a user's ban, suspension, and warning state as JSON.
    Moderation {
        #[clap(long)]
        user_id: i64,
    },
}
