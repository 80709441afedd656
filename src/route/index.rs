//! Route index
//!
//! Groups user ids by slot for display.

use std::collections::BTreeMap;

use super::Route;

/// User ids keyed by `"section:path"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteIndex {
    slots: BTreeMap<String, Vec<String>>,
}

impl RouteIndex {
    /// Users linked to a slot, in the order their routes were given
    pub fn users_at(&self, section: u32, path: char) -> &[String] {
        self.slots
            .get(&slot_key(section, path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slots and their users
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Index key of a slot
pub fn slot_key(section: u32, path: char) -> String {
    format!("{}:{}", section, path)
}

/// Group routes by slot
///
/// Within a slot, user ids keep the order of `routes`.
pub fn build_route_index<'a, I>(routes: I) -> RouteIndex
where
    I: IntoIterator<Item = &'a Route>,
{
    let mut slots: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for route in routes {
        slots
            .entry(slot_key(route.section, route.path))
            .or_default()
            .push(route.user_id.clone());
    }
    RouteIndex { slots }
}
