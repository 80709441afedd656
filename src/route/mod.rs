//! Route Module
//!
//! Route and map records, their repository, and the domain service.
//!
//! ## Invariant
//! Every stored route of a channel lies on that channel's map:
//! `1 <= section <= map.sections` and `'A' <= path <= map.max_paths[section - 1]`.
//! It is enforced when routes are written; replacing a map purges the
//! channel's routes in the same transaction.

mod codec;
mod index;
mod model;
mod repository;
mod service;

pub use codec::{decode, encode};
pub use index::{build_route_index, slot_key, RouteIndex};
pub use model::{parse_path, ChannelMap, Route, FIRST_PATH, LAST_PATH};
pub use repository::Repository;
pub use service::{RouteService, Unlinked};
