//! Route repository
//!
//! Typed access to Route and Map records. Every operation takes the ambient
//! `TxContext` and joins the transaction it carries, or opens one of the
//! writability it needs.

use std::sync::Arc;

use crate::error::{Result, RouteError};
use crate::store::{Datastore, Keyspace, TxContext};

use super::codec::{decode, encode};
use super::{ChannelMap, Route};

/// Handles communication between the domain and persistent storage
#[derive(Clone)]
pub struct Repository {
    store: Arc<Datastore>,
}

impl Repository {
    /// Create a repository over a shared datastore
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    /// The underlying datastore
    pub fn store(&self) -> &Datastore {
        &self.store
    }

    // =========================================================================
    // Routes
    // =========================================================================

    /// All routes currently linked in a channel, in key order
    pub fn get_routes_in_channel(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<Vec<Route>> {
        self.store.in_transaction(ctx, false, |_, tx| {
            let mut routes = Vec::new();
            tx.scan(Keyspace::Routes, |_, bytes| {
                let route: Route = decode(bytes)?;
                if route.channel_id == channel_id {
                    routes.push(route);
                }
                Ok(())
            })?;
            Ok(routes)
        })
    }

    /// Persist a route, overwriting any record with the same key
    pub fn insert_route(&self, ctx: TxContext<'_>, route: &Route) -> Result<()> {
        self.store.in_transaction(ctx, true, |_, tx| {
            let bytes = encode(route)?;
            tx.put(Keyspace::Routes, &route.key(), &bytes)
        })
    }

    /// Delete a route; deleting an absent route is a no-op
    pub fn delete_route(&self, ctx: TxContext<'_>, route: &Route) -> Result<()> {
        self.store.in_transaction(ctx, true, |_, tx| {
            tx.delete(Keyspace::Routes, &route.key())?;
            Ok(())
        })
    }

    /// Delete every route linked in a channel; returns how many were removed
    pub fn delete_all_routes_for_channel(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<usize> {
        self.store.in_transaction(ctx, true, |ctx, _| {
            let routes = self.get_routes_in_channel(ctx, channel_id)?;
            for route in &routes {
                self.delete_route(ctx, route)?;
            }
            Ok(routes.len())
        })
    }

    // =========================================================================
    // Maps
    // =========================================================================

    /// The map configured for a channel
    ///
    /// Returns `RouteError::NotFound` when the channel has none.
    pub fn get_map_for_channel(&self, ctx: TxContext<'_>, channel_id: &str) -> Result<ChannelMap> {
        self.store.in_transaction(ctx, false, |_, tx| {
            match tx.get(Keyspace::Maps, channel_id.as_bytes())? {
                Some(bytes) => decode(&bytes),
                None => Err(RouteError::NotFound),
            }
        })
    }

    /// Persist a map, replacing the channel's previous one
    pub fn insert_map(&self, ctx: TxContext<'_>, map: &ChannelMap) -> Result<()> {
        self.store.in_transaction(ctx, true, |_, tx| {
            let bytes = encode(map)?;
            tx.put(Keyspace::Maps, map.id.as_bytes(), &bytes)
        })
    }
}
