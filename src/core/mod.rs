//! Core modules for the GenerationBridge store.
//!
//! Infrastructure shared by every repository: configuration, errors,
//! logging, the connection broker, schema and migrations, seeding, and the
//! moderation state machine.

pub mod broker;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod migration;
pub mod moderation;
pub mod schemas;
pub mod seed;
pub mod store;
pub mod time;
