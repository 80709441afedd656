//! Store Module
//!
//! The embedded key-value database and the transactions opened against it.
//!
//! ## Responsibilities
//! - Own the single database file (`Datastore`)
//! - Open read-only or writable transactions
//! - Propagate an already-open transaction to nested calls (`TxContext`)
//! - Commit or roll back only the transactions a call opened itself
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────────────┐
//! │ routes.redb                            │
//! │ ┌────────────────────────────────────┐ │
//! │ │ routes: route key  → Route bytes   │ │
//! │ └────────────────────────────────────┘ │
//! │ ┌────────────────────────────────────┐ │
//! │ │ maps:   channel id → Map bytes     │ │
//! │ └────────────────────────────────────┘ │
//! └────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! One writable transaction at a time; opening a second one blocks until the
//! first commits or aborts. Read-only transactions never block and see the
//! snapshot that existed when they were opened.

mod context;
mod handle;
mod transaction;

pub use context::TxContext;
pub use handle::Datastore;
pub use transaction::{Keyspace, Transaction};
