//! # routegrid
//!
//! Assigns channel members to routes on a per-channel grid and persists the
//! assignments in an embedded key-value store:
//! - Reentrant transaction propagation through an explicit context
//! - Typed repository for Route and Map records
//! - Domain service enforcing the map invariants
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Command Layer (CLI)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     RouteService                             │
//! │          (link / unlink / reconfigure / show)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Repository                               │
//! │            (Route + Map records, key derivation)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  TxContext
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Datastore::in_transaction                       │
//! │        (reuse ambient transaction or manage a new one)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │    redb     │
//!                │ routes/maps │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod route;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, RouteError};
pub use config::Config;
pub use store::{Datastore, TxContext};
pub use route::{ChannelMap, Repository, Route, RouteIndex, RouteService};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of routegrid
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
