//! Point queries over a tracker filled by a nested traversal

use groovyscope_api::models::{Position, Range};
use groovyscope_core::RelationshipTracker;
use std::sync::Arc;
use url::Url;

fn script_uri() -> Url {
    Url::parse("file:///project/src/Build.groovy").unwrap()
}

/// method (1-10) > block (1-10) > statement (5) > constant (5:9-5:10)
fn nested_tracker() -> RelationshipTracker<u32> {
    let uri = script_uri();
    let mut tracker = RelationshipTracker::new();
    tracker.push_node(1, Some(Range::from_coords(1, 1, 10, 1)), &uri);
    tracker.push_node(2, Some(Range::from_coords(1, 1, 10, 1)), &uri);
    tracker.push_node(3, Some(Range::from_coords(5, 5, 5, 12)), &uri);
    tracker.push_node(4, Some(Range::from_coords(5, 9, 5, 10)), &uri);
    tracker.pop_node();
    tracker.pop_node();
    tracker.pop_node();
    tracker.pop_node();
    tracker
}

#[test]
fn test_query_returns_innermost_node() {
    let tracker = nested_tracker();
    let uri = script_uri();

    assert_eq!(tracker.get_node_at(&uri, Position::new(5, 9)), Some(4));
    assert_eq!(tracker.get_node_at(&uri, Position::new(5, 6)), Some(3));
    assert_eq!(tracker.get_node_at(&uri, Position::new(2, 1)), Some(2));
}

#[test]
fn test_query_outside_every_range_is_none() {
    let tracker = nested_tracker();
    assert_eq!(tracker.get_node_at(&script_uri(), Position::new(11, 1)), None);

    let other = Url::parse("file:///project/src/Other.groovy").unwrap();
    assert_eq!(tracker.get_node_at(&other, Position::new(5, 9)), None);
}

#[test]
fn test_ancestry_is_strict() {
    let tracker = nested_tracker();

    assert!(tracker.contains(1, 4));
    assert!(tracker.contains(3, 4));
    assert!(!tracker.contains(4, 4));
    assert!(!tracker.contains(4, 1));
    assert_eq!(tracker.get_parent(1), None);
    assert_eq!(tracker.depth(4), 3);
}

#[test]
fn test_uri_index_and_clear() {
    let mut tracker = nested_tracker();
    let uri = script_uri();

    assert_eq!(tracker.nodes_for_uri(&uri), vec![1, 2, 3, 4]);
    assert_eq!(tracker.get_uri(3), Some(&uri));
    assert_eq!(tracker.get_range(4), Some(Range::from_coords(5, 9, 5, 10)));

    tracker.clear();
    assert!(tracker.is_empty());
    assert_eq!(tracker.get_node_at(&uri, Position::new(5, 9)), None);
}

#[test]
fn test_finished_tracker_is_shareable_across_threads() {
    let tracker = Arc::new(nested_tracker());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || tracker.get_node_at(&script_uri(), Position::new(5, 10)))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(4));
    }
}
