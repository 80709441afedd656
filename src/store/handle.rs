//! Datastore handle
//!
//! Owns the embedded database file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use redb::{Builder, Database};

use crate::config::Config;
use crate::error::{Result, RouteError};

use super::Transaction;

/// Handle to the embedded database
///
/// ## Concurrency:
/// - `db`: redb serializes writers internally, readers run on snapshots
/// - `transactions_opened`: Atomic counter (lock-free)
/// - All methods use `&self`; share the handle behind an `Arc`
pub struct Datastore {
    /// Datastore configuration
    config: Config,

    /// Path of the database file
    db_path: PathBuf,

    /// The embedded database
    db: Database,

    /// Physical transactions opened so far
    transactions_opened: AtomicU64,
}

impl Datastore {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DB_FILENAME: &'static str = "routes.redb";

    /// Open or create the datastore with the given config
    pub fn open(config: Config) -> Result<Self> {
        if config.cache_size == 0 {
            return Err(RouteError::Config(
                "cache_size must be greater than 0".to_string(),
            ));
        }

        fs::create_dir_all(&config.data_dir)?;

        let db_path = config.data_dir.join(Self::DB_FILENAME);
        let db = Builder::new()
            .set_cache_size(config.cache_size)
            .create(&db_path)?;

        tracing::debug!("Opened datastore at {}", db_path.display());

        Ok(Self {
            config,
            db_path,
            db,
            transactions_opened: AtomicU64::new(0),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Begin a physical transaction
    ///
    /// Blocks while another writable transaction is live when `writable` is set.
    /// Only the propagator calls this; it owns commit/rollback of the result.
    pub(crate) fn begin(&self, writable: bool) -> Result<Transaction> {
        let tx = if writable {
            Transaction::Write(self.db.begin_write()?)
        } else {
            Transaction::Read(self.db.begin_read()?)
        };

        let n = self.transactions_opened.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("Began transaction #{} (writable={})", n, writable);

        Ok(tx)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the database file path
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Number of physical transactions opened since the handle was created
    pub fn transactions_opened(&self) -> u64 {
        self.transactions_opened.load(Ordering::SeqCst)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
