//! Relationship tracker: parent/child/URI bookkeeping collected during a
//! single tree traversal, queried afterwards by position.
//!
//! Keys are node *identities* (arena handles), never structural values, so
//! two distinct tree positions that happen to look alike stay distinct.
//!
//! A tracker is filled by exactly one traversal through `&mut self`. Once the
//! traversal is done it can be wrapped in an `Arc` and queried from any thread.

use groovyscope_api::models::{Position, Range};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::hash::Hash;
use url::Url;

#[derive(Debug, Clone)]
pub struct RelationshipTracker<K> {
    stack: Vec<K>,
    parents: HashMap<K, K>,
    children: HashMap<K, IndexSet<K>>,
    uris: HashMap<K, Url>,
    ranges: HashMap<K, Range>,
    by_uri: HashMap<Url, IndexSet<K>>,
}

impl<K> Default for RelationshipTracker<K> {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
            uris: HashMap::new(),
            ranges: HashMap::new(),
            by_uri: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> RelationshipTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `node`. Nodes without a valid range are kept on the stack (so
    /// `pop_node` stays balanced) but are never recorded.
    pub fn push_node(&mut self, node: K, range: Option<Range>, uri: &Url) {
        if let Some(range) = range.filter(|r| r.is_valid()) {
            if let Some(parent) = self.nearest_tracked_ancestor() {
                self.parents.insert(node, parent);
                self.children.entry(parent).or_default().insert(node);
            }
            self.ranges.insert(node, range);
            self.uris.insert(node, uri.clone());
            self.by_uri.entry(uri.clone()).or_default().insert(node);
        }
        self.stack.push(node);
    }

    pub fn pop_node(&mut self) -> Option<K> {
        self.stack.pop()
    }

    fn nearest_tracked_ancestor(&self) -> Option<K> {
        self.stack
            .iter()
            .rev()
            .find(|candidate| self.ranges.contains_key(candidate))
            .copied()
    }

    pub fn is_tracked(&self, node: K) -> bool {
        self.ranges.contains_key(&node)
    }

    pub fn get_parent(&self, node: K) -> Option<K> {
        self.parents.get(&node).copied()
    }

    /// Children in the order they were first pushed.
    pub fn get_children(&self, node: K) -> Vec<K> {
        self.children
            .get(&node)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn get_uri(&self, node: K) -> Option<&Url> {
        self.uris.get(&node)
    }

    pub fn get_range(&self, node: K) -> Option<Range> {
        self.ranges.get(&node).copied()
    }

    pub fn nodes_for_uri(&self, uri: &Url) -> Vec<K> {
        self.by_uri
            .get(uri)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn depth(&self, node: K) -> usize {
        let mut depth = 0;
        let mut current = self.get_parent(node);
        while let Some(parent) = current {
            depth += 1;
            current = self.get_parent(parent);
        }
        depth
    }

    /// The most specific tracked node of `uri` whose range contains `position`.
    ///
    /// Deeper nodes win; among equally deep candidates the narrower range
    /// wins, then the one recorded last.
    pub fn get_node_at(&self, uri: &Url, position: Position) -> Option<K> {
        let nodes = self.by_uri.get(uri)?;
        let mut best: Option<(K, usize, (u32, u32))> = None;

        for &node in nodes {
            let Some(range) = self.ranges.get(&node) else {
                continue;
            };
            if !range.contains(position) {
                continue;
            }
            let depth = self.depth(node);
            let extent = range.extent();
            let better = match &best {
                None => true,
                Some((_, best_depth, best_extent)) => {
                    depth > *best_depth || (depth == *best_depth && extent <= *best_extent)
                }
            };
            if better {
                best = Some((node, depth, extent));
            }
        }

        best.map(|(node, _, _)| node)
    }

    /// True iff `ancestor` is reached walking parent links up from `descendant`.
    pub fn contains(&self, ancestor: K, descendant: K) -> bool {
        let mut current = self.get_parent(descendant);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get_parent(node);
        }
        false
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.parents.clear();
        self.children.clear();
        self.uris.clear();
        self.ranges.clear();
        self.by_uri.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///work/Script.groovy").unwrap()
    }

    #[test]
    fn test_untracked_nodes_are_skipped_but_keep_stack_balanced() {
        let mut tracker = RelationshipTracker::new();
        let uri = uri();
        tracker.push_node(1u32, Some(Range::from_coords(1, 1, 9, 1)), &uri);
        tracker.push_node(2, None, &uri);
        tracker.push_node(3, Some(Range::from_coords(2, 1, 2, 5)), &uri);
        assert_eq!(tracker.pop_node(), Some(3));
        assert_eq!(tracker.pop_node(), Some(2));
        assert_eq!(tracker.pop_node(), Some(1));

        assert!(!tracker.is_tracked(2));
        assert_eq!(tracker.get_parent(3), Some(1));
        assert_eq!(tracker.get_children(1), vec![3]);
    }

    #[test]
    fn test_children_are_deduplicated_in_insertion_order() {
        let mut tracker = RelationshipTracker::new();
        let uri = uri();
        tracker.push_node(10u32, Some(Range::from_coords(1, 1, 5, 1)), &uri);
        for child in [12, 11, 12] {
            tracker.push_node(child, Some(Range::from_coords(2, 1, 2, 3)), &uri);
            tracker.pop_node();
        }
        assert_eq!(tracker.get_children(10), vec![12, 11]);
    }
}
