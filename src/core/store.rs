//! Store handle for GenerationBridge state.
//!
//! A `Store` owns the broker for one SQLite file. It is only handed out by
//! [`Store::open`], which migrates and seeds the file first, so every
//! repository reached through it sees the current schema and baseline data.

use crate::core::broker::DbBroker;
use crate::core::config::DatabaseConfig;
use crate::core::db;
use crate::core::error;
use crate::core::migration;
use crate::core::moderation::Moderation;
use crate::core::seed::{self, SeedReport};
use crate::repos::events::EventRepo;
use crate::repos::interests::InterestRepo;
use crate::repos::login_events::LoginEventRepo;
use crate::repos::messages::MessageRepo;
use crate::repos::notifications::NotificationRepo;
use crate::repos::reports::ReportRepo;
use crate::repos::skillswap::SkillSwapRepo;
use crate::repos::stories::StoryRepo;
use crate::repos::users::UserRepo;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// What a boot pass did to the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootReport {
    pub migrations_applied: Vec<&'static str>,
    pub seed: SeedReport,
}

#[derive(Debug, Clone)]
pub struct Store {
    broker: DbBroker,
}

impl Store {
    /// Open the store at `cfg.path`, bringing it up to date.
    ///
    /// Any failure here is boot-fatal and comes back as
    /// `DatabaseInitializationError`.
    pub fn open(cfg: &DatabaseConfig) -> Result<Self, error::BridgeError> {
        Self::open_with_report(cfg).map(|(store, _)| store)
    }

    /// Like [`Store::open`], also returning what the boot pass changed.
    pub fn open_with_report(
        cfg: &DatabaseConfig,
    ) -> Result<(Self, BootReport), error::BridgeError> {
        let boot = || -> Result<(Self, BootReport), error::BridgeError> {
            db::ensure_parent_dir(&cfg.path)?;
            let store = Self {
                broker: DbBroker::new(&cfg.path, Duration::from_secs(cfg.busy_timeout_secs)),
            };
            let report = store.boot()?;
            Ok((store, report))
        };
        boot().map_err(|e| {
            tracing::error!(path = %cfg.path.display(), error = %e, "store boot failed");
            error::BridgeError::DatabaseInitializationError(e.to_string())
        })
    }

    /// Migrate, then seed.
    pub fn boot(&self) -> Result<BootReport, error::BridgeError> {
        let migrations_applied = self.ensure_schema()?;
        let seed = self.seed()?;
        tracing::info!(
            path = %self.db_path().display(),
            migrations = migrations_applied.len(),
            "store ready"
        );
        Ok(BootReport {
            migrations_applied,
            seed,
        })
    }

    pub fn ensure_schema(&self) -> Result<Vec<&'static str>, error::BridgeError> {
        self.broker
            .with_conn("store.ensure_schema", migration::ensure_schema)
    }

    /// One seeding pass in a single transaction.
    pub fn seed(&self) -> Result<SeedReport, error::BridgeError> {
        self.broker.with_tx("store.seed", |tx| seed::seed(tx))
    }

    pub fn broker(&self) -> &DbBroker {
        &self.broker
    }

    pub fn db_path(&self) -> &Path {
        self.broker.db_path()
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(self)
    }

    pub fn interests(&self) -> InterestRepo<'_> {
        InterestRepo::new(self)
    }

    pub fn login_events(&self) -> LoginEventRepo<'_> {
        LoginEventRepo::new(self)
    }

    pub fn stories(&self) -> StoryRepo<'_> {
        StoryRepo::new(self)
    }

    pub fn skillswap(&self) -> SkillSwapRepo<'_> {
        SkillSwapRepo::new(self)
    }

    pub fn events(&self) -> EventRepo<'_> {
        EventRepo::new(self)
    }

    pub fn messages(&self) -> MessageRepo<'_> {
        MessageRepo::new(self)
    }

    pub fn notifications(&self) -> NotificationRepo<'_> {
        NotificationRepo::new(self)
    }

    pub fn reports(&self) -> ReportRepo<'_> {
        ReportRepo::new(self)
    }

    pub fn moderation(&self) -> Moderation<'_> {
        Moderation::new(self)
    }
}
