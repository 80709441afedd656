//! Route service
//!
//! Domain operations composed from repository calls. Each operation runs in a
//! single transaction so a failure part-way leaves nothing behind.

use crate::error::{Result, RouteError};
use crate::store::TxContext;

use super::index::build_route_index;
use super::model::parse_path;
use super::{ChannelMap, Repository, Route, RouteIndex};

/// Result of an unlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlinked {
    /// Ids of the deleted routes
    pub removed: Vec<String>,

    /// Index of the routes left in the channel
    pub index: RouteIndex,
}

/// Link, unlink and map operations for channels
#[derive(Clone)]
pub struct RouteService {
    repo: Repository,
}

impl RouteService {
    /// Create a new service
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// The repository this service writes through
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Link a user to a slot of the channel's map
    ///
    /// Returns the channel's index with the new route listed first in its slot.
    pub fn link_route(
        &self,
        ctx: TxContext<'_>,
        channel_id: &str,
        user_id: &str,
        section: u32,
        path: &str,
    ) -> Result<RouteIndex> {
        self.repo.store().in_transaction(ctx, true, |ctx, _| {
            let map = self.load_map(ctx, channel_id)?;
            map.check_section(section)?;
            let path = parse_path(path)?;
            map.check_slot(section, path)?;

            let mut routes = self.repo.get_routes_in_channel(ctx, channel_id)?;
            if routes.iter().any(|r| r.occupies(user_id, section, path)) {
                return Err(RouteError::AlreadyLinked {
                    user_id: user_id.to_string(),
                    section,
                    path,
                });
            }

            let route = Route::new(user_id, channel_id, section, path);
            self.repo.insert_route(ctx, &route)?;
            tracing::info!("Linked {} to {}:{} in channel {}", user_id, section, path, channel_id);

            routes.insert(0, route);
            Ok(build_route_index(&routes))
        })
    }

    /// Unlink a user from every matching route of the channel
    ///
    /// `None` for `section` or `path` matches any value; an empty `path` is
    /// treated the same as `None`.
    pub fn unlink_route(
        &self,
        ctx: TxContext<'_>,
        channel_id: &str,
        user_id: &str,
        section: Option<u32>,
        path: Option<&str>,
    ) -> Result<Unlinked> {
        self.repo.store().in_transaction(ctx, true, |ctx, _| {
            let map = self.load_map(ctx, channel_id)?;
            if let Some(section) = section {
                map.check_section(section)?;
            }
            let path = match path.map(str::trim).filter(|p| !p.is_empty()) {
                Some(raw) => {
                    let path = parse_path(raw)?;
                    if let Some(section) = section {
                        map.check_slot(section, path)?;
                    }
                    Some(path)
                }
                None => None,
            };

            let routes = self.repo.get_routes_in_channel(ctx, channel_id)?;
            let (matched, remaining): (Vec<Route>, Vec<Route>) = routes.into_iter().partition(|r| {
                r.user_id == user_id
                    && section.map_or(true, |s| s == r.section)
                    && path.map_or(true, |p| p == r.path)
            });

            if matched.is_empty() {
                return Err(RouteError::NothingToUnlink {
                    user_id: user_id.to_string(),
                    channel_id: channel_id.to_string(),
                });
            }

            for route in &matched {
                self.repo.delete_route(ctx, route)?;
            }
            tracing::info!(
                "Unlinked {} from {} route(s) in channel {}",
                user_id,
                matched.len(),
                channel_id
            );

            Ok(Unlinked {
                removed: matched.iter().map(Route::id).collect(),
                index: build_route_index(&remaining),
            })
        })
    }

    /// Replace the channel's map, purging every route linked under the old one
    ///
    /// Returns the number of routes purged.
    pub fn reconfigure_map(&self, ctx: TxContext<'_>, map: &ChannelMap) -> Result<usize> {
        self.repo.store().in_transaction(ctx, true, |ctx, _| {
            let purged = self.repo.delete_all_routes_for_channel(ctx, &map.id)?;
            self.repo.insert_map(ctx, map)?;
            tracing::info!("Saved map for channel {}: {}, purged {} route(s)", map.id, map, purged);
            Ok(purged)
        })
    }

    /// Remove every route of the channel, keeping its map
    pub fn purge_channel(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<usize> {
        let purged = self.repo.delete_all_routes_for_channel(ctx, channel_id)?;
        tracing::info!("Purged {} route(s) in channel {}", purged, channel_id);
        Ok(purged)
    }

    /// The channel's map and the index of its routes, read from one snapshot
    pub fn show(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<(ChannelMap, RouteIndex)> {
        self.repo.store().in_transaction(ctx, false, |ctx, _| {
            let map = self.load_map(ctx, channel_id)?;
            let routes = self.repo.get_routes_in_channel(ctx, channel_id)?;
            Ok((map, build_route_index(&routes)))
        })
    }

    fn load_map(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<ChannelMap> {
        self.repo
            .get_map_for_channel(ctx, channel_id)
            .map_err(|e| match e {
                RouteError::NotFound => RouteError::NotConfigured {
                    channel_id: channel_id.to_string(),
                },
                other => other,
            })
    }
}
