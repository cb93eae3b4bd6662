//! GenerationBridge store.
//!
//! The persistence and account-state layer behind the GenerationBridge
//! social platform: user records and their moderation state, plus the social
//! artifacts built on top of users (stories, comments, skill-exchange posts,
//! events, messages, notifications, reports, login events).
//!
//! # Boot
//!
//! [`Store::open`] is the only way to get a handle. It migrates the SQLite
//! file additively, then seeds baseline data, and fails with
//! `DatabaseInitializationError` if either step does. Both steps are
//! idempotent and run on every open.
//!
//! ```no_run
//! use genbridge::{DatabaseConfig, Store};
//!
//! let store = Store::open(&DatabaseConfig::at("app.db"))?;
//! let status = store.moderation().status(1)?;
//! # Ok::<(), genbridge::BridgeError>(())
//! ```
//!
//! # Layout
//!
//! - [`core`]: config, errors, logging, broker, schema, migrations, seeding,
//!   and the moderation state machine.
//! - [`repos`]: one repository per social table, each borrowing the store.

pub mod core;
pub mod repos;

mod cli;

pub use crate::core::config::{BridgeConfig, DatabaseConfig, LoggingConfig};
pub use crate::core::error::BridgeError;
pub use crate::core::moderation::{ModerationStatus, SuspensionStatus, WarningStatus};
pub use crate::core::store::{BootReport, Store};

use crate::core::{error, logging};
use clap::Parser;
use cli::{Cli, Command};
use colored::Colorize;

/// Entry point for the `genbridge` binary.
pub fn run() -> Result<(), error::BridgeError> {
    let cli = Cli::parse();
    let config = BridgeConfig::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging);

    match cli.command {
        Command::Init { json } => {
            let (store, report) = Store::open_with_report(&config.database)?;
            if json {
                println!("{}", to_json(&report)?);
                return Ok(());
            }
            println!(
                "{} store ready at {}",
                "✓".bright_green().bold(),
                store.db_path().display().to_string().as_str().bright_white()
            );
            if report.migrations_applied.is_empty() {
                println!("  {}", "schema already current".dimmed());
            } else {
                for name in &report.migrations_applied {
                    println!("  {} {}", "migrated".bright_cyan(), name);
                }
            }
            let seed = &report.seed;
            println!(
                "  {} interests={} accounts={} stories={} comments={} skill_posts={} events={} normalized={}",
                "seeded".bright_cyan(),
                seed.interests_inserted,
                seed.accounts_inserted,
                seed.stories_inserted,
                seed.comments_inserted,
                seed.skill_posts_inserted,
                seed.events_inserted,
                seed.stories_normalized
            );
        }
        Command::Moderation { user_id } => {
            let store = Store::open(&config.database)?;
            match store.moderation().status(user_id)? {
                Some(status) => println!("{}", to_json(&status)?),
                None => {
                    return Err(error::BridgeError::NotFound(format!("user {user_id}")));
                }
            }
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, error::BridgeError> {
    Ok(serde_json::to_string_pretty(value)?)
}
