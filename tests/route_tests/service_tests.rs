//! Tests for RouteService
//!
//! These tests verify:
//! - Link validation against the channel map
//! - Link idempotency (AlreadyLinked)
//! - Wildcard and filtered unlink
//! - Map reconfiguration purging routes atomically
//! - Purge and show

use std::sync::Arc;

use routegrid::route::{ChannelMap, Repository, Route, RouteService};
use routegrid::store::{Datastore, TxContext};
use routegrid::{ErrorKind, RouteError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_service() -> (TempDir, RouteService) {
    let temp_dir = TempDir::new().unwrap();
    let store = Datastore::open_path(temp_dir.path()).unwrap();
    let service = RouteService::new(Repository::new(Arc::new(store)));
    (temp_dir, service)
}

fn setup_with_map(max_paths: &[&str]) -> (TempDir, RouteService) {
    let (temp, service) = setup_temp_service();
    let map = ChannelMap::new("c", max_paths.len() as u8, max_paths).unwrap();
    service.reconfigure_map(none(), &map).unwrap();
    (temp, service)
}

fn none() -> TxContext<'static> {
    TxContext::empty()
}

fn stored_routes(service: &RouteService) -> Vec<Route> {
    service.repository().get_routes_in_channel(none(), "c").unwrap()
}

// =============================================================================
// Link Tests
// =============================================================================

#[test]
fn test_link_without_map_is_not_configured() {
    let (_temp, service) = setup_temp_service();

    let err = service.link_route(none(), "c", "u1", 1, "A").unwrap_err();

    assert!(matches!(err, RouteError::NotConfigured { ref channel_id } if channel_id == "c"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_link_returns_index_with_new_route() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);

    service.link_route(none(), "c", "u1", 1, "A").unwrap();
    let index = service.link_route(none(), "c", "u2", 1, "a").unwrap();

    assert_eq!(index.users_at(1, 'A'), ["u2".to_string(), "u1".to_string()]);
    assert_eq!(stored_routes(&service).len(), 2);
}

#[test]
fn test_link_lists_new_route_first_in_its_slot() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);

    service.link_route(none(), "c", "u2", 1, "A").unwrap();
    service.link_route(none(), "c", "u3", 2, "B").unwrap();
    let index = service.link_route(none(), "c", "u1", 1, "A").unwrap();

    assert_eq!(index.users_at(1, 'A'), ["u1".to_string(), "u2".to_string()]);
    assert_eq!(index.users_at(2, 'B'), ["u3".to_string()]);

    // A later show lists the stored routes in key order
    let (_, shown) = service.show(none(), "c").unwrap();
    assert_eq!(shown.users_at(1, 'A'), ["u1".to_string(), "u2".to_string()]);
}

#[test]
fn test_link_same_slot_twice_is_already_linked() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);

    service.link_route(none(), "c", "u1", 2, "B").unwrap();
    let err = service.link_route(none(), "c", "u1", 2, "b").unwrap_err();

    assert!(matches!(
        err,
        RouteError::AlreadyLinked { section: 2, path: 'B', .. }
    ));
    assert_eq!(stored_routes(&service).len(), 1);
}

#[test]
fn test_link_path_beyond_section_max_is_out_of_range() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);

    let err = service.link_route(none(), "c", "u1", 1, "F").unwrap_err();

    assert!(matches!(err, RouteError::OutOfRange { ref param, .. } if param == "path"));
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert!(stored_routes(&service).is_empty());

    // Section 2 goes up to F
    service.link_route(none(), "c", "u1", 2, "F").unwrap();
}

#[test]
fn test_link_section_outside_map_is_out_of_range() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);

    for section in [0, 4] {
        let err = service.link_route(none(), "c", "u1", section, "A").unwrap_err();
        assert!(matches!(err, RouteError::OutOfRange { ref param, .. } if param == "section"));
    }
}

#[test]
fn test_link_malformed_path_is_invalid() {
    let (_temp, service) = setup_with_map(&["E"]);

    let err = service.link_route(none(), "c", "u1", 1, "AB").unwrap_err();

    assert!(matches!(err, RouteError::InvalidArgument { .. }));
}

#[test]
fn test_link_in_read_only_context_fails() {
    let (_temp, service) = setup_with_map(&["E"]);

    let result = service.repository().store().in_transaction(none(), false, |ctx, _| {
        service.link_route(ctx, "c", "u1", 1, "A")
    });

    assert!(matches!(result, Err(RouteError::IncompatibleTransaction)));
}

// =============================================================================
// Unlink Tests
// =============================================================================

#[test]
fn test_unlink_without_filters_removes_all_user_routes() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u1", 1, "A").unwrap();
    service.link_route(none(), "c", "u1", 2, "B").unwrap();
    service.link_route(none(), "c", "u2", 1, "A").unwrap();

    let unlinked = service.unlink_route(none(), "c", "u1", None, None).unwrap();

    assert_eq!(unlinked.removed.len(), 2);
    assert_eq!(unlinked.index.users_at(1, 'A'), ["u2".to_string()]);
    assert!(unlinked.index.users_at(2, 'B').is_empty());
    assert_eq!(stored_routes(&service).len(), 1);
}

#[test]
fn test_unlink_with_section_filter() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u1", 1, "A").unwrap();
    service.link_route(none(), "c", "u1", 2, "B").unwrap();

    let unlinked = service.unlink_route(none(), "c", "u1", Some(1), None).unwrap();

    assert_eq!(unlinked.removed, vec!["u1:c:1:A".to_string()]);
    assert_eq!(stored_routes(&service), vec![Route::new("u1", "c", 2, 'B')]);
}

#[test]
fn test_unlink_with_path_filter_only() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u1", 1, "B").unwrap();
    service.link_route(none(), "c", "u1", 2, "B").unwrap();
    service.link_route(none(), "c", "u1", 2, "C").unwrap();

    let unlinked = service.unlink_route(none(), "c", "u1", None, Some("b")).unwrap();

    assert_eq!(unlinked.removed.len(), 2);
    assert_eq!(stored_routes(&service), vec![Route::new("u1", "c", 2, 'C')]);
}

#[test]
fn test_unlink_empty_path_is_wildcard_not_a() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u1", 1, "C").unwrap();

    let unlinked = service.unlink_route(none(), "c", "u1", Some(1), Some("")).unwrap();

    assert_eq!(unlinked.removed, vec!["u1:c:1:C".to_string()]);
}

#[test]
fn test_unlink_with_no_match_is_nothing_to_unlink() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u2", 1, "A").unwrap();

    let err = service.unlink_route(none(), "c", "u1", None, None).unwrap_err();

    assert!(matches!(err, RouteError::NothingToUnlink { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(stored_routes(&service).len(), 1);
}

#[test]
fn test_unlink_validates_filters_against_map() {
    let (_temp, service) = setup_with_map(&["E"]);

    let err = service.unlink_route(none(), "c", "u1", Some(2), None).unwrap_err();
    assert!(matches!(err, RouteError::OutOfRange { .. }));

    let err = service.unlink_route(none(), "c", "u1", Some(1), Some("Z")).unwrap_err();
    assert!(matches!(err, RouteError::OutOfRange { .. }));
}

// =============================================================================
// Map Tests
// =============================================================================

#[test]
fn test_reconfigure_purges_routes_and_saves_map() {
    let (_temp, service) = setup_with_map(&["E", "F", "G"]);
    service.link_route(none(), "c", "u1", 1, "A").unwrap();
    service.link_route(none(), "c", "u2", 3, "G").unwrap();

    let new_map = ChannelMap::new("c", 2, &["B", "B"]).unwrap();
    let purged = service.reconfigure_map(none(), &new_map).unwrap();

    assert_eq!(purged, 2);
    let (map, index) = service.show(none(), "c").unwrap();
    assert_eq!(map, new_map);
    assert!(index.is_empty());
}

#[test]
fn test_reconfigure_rolls_back_when_outer_transaction_fails() {
    let (_temp, service) = setup_with_map(&["E"]);
    service.link_route(none(), "c", "u1", 1, "A").unwrap();

    let result: Result<(), RouteError> =
        service.repository().store().in_transaction(none(), true, |ctx, _| {
            let new_map = ChannelMap::new("c", 1, &["B"]).unwrap();
            service.reconfigure_map(ctx, &new_map)?;
            Err(RouteError::Config("abort".into()))
        });

    assert!(result.is_err());
    let (map, index) = service.show(none(), "c").unwrap();
    assert_eq!(map.max_paths, vec!['E']);
    assert_eq!(index.users_at(1, 'A'), ["u1".to_string()]);
}

#[test]
fn test_reconfigure_leaves_other_channels_alone() {
    let (_temp, service) = setup_with_map(&["E"]);
    let other = ChannelMap::new("d", 1, &["C"]).unwrap();
    service.reconfigure_map(none(), &other).unwrap();
    service.link_route(none(), "d", "u1", 1, "C").unwrap();

    service
        .reconfigure_map(none(), &ChannelMap::new("c", 1, &["A"]).unwrap())
        .unwrap();

    let (_, index) = service.show(none(), "d").unwrap();
    assert_eq!(index.users_at(1, 'C'), ["u1".to_string()]);
}

// =============================================================================
// Purge / Show Tests
// =============================================================================

#[test]
fn test_purge_keeps_map() {
    let (_temp, service) = setup_with_map(&["E", "F"]);
    service.link_route(none(), "c", "u1", 1, "A").unwrap();
    service.link_route(none(), "c", "u2", 2, "F").unwrap();

    assert_eq!(service.purge_channel(none(), "c").unwrap(), 2);

    let (map, index) = service.show(none(), "c").unwrap();
    assert_eq!(map.sections, 2);
    assert!(index.is_empty());
}

#[test]
fn test_show_without_map_is_not_configured() {
    let (_temp, service) = setup_temp_service();

    let err = service.show(none(), "c").unwrap_err();

    assert!(matches!(err, RouteError::NotConfigured { .. }));
}
