//! Selector Grouper: resources sharing a canonical selector within a namespace.

use std::collections::{HashMap, HashSet};

use crate::resource::{PolicyResource, ResourceId};
use crate::selector::{canonicalize, CanonicalSelector};

/// Result of scanning the snapshot for a selector-scoped resource.
#[derive(Debug, Default)]
pub struct PeerScan<'a> {
    /// Other selector-scoped resources in the namespace with the same canonical selector.
    pub peers: Vec<&'a PolicyResource>,

    /// Namespace-wide resources met in the same namespace during the scan.
    pub namespace_wide: Vec<&'a PolicyResource>,
}

impl PeerScan<'_> {
    /// Returns true if the scan found a namespace-wide resource.
    #[must_use]
    pub fn found_namespace_wide(&self) -> bool {
        !self.namespace_wide.is_empty()
    }
}

#[derive(Debug, Default)]
struct SelectorGroup {
    members: Vec<ResourceId>,
    reported: bool,
}

/// Groups selector-scoped resources by `(namespace, canonical selector)`.
///
/// Scans run against the full snapshot the grouper was built over; group
/// membership grows only as the engine calls [`SelectorGrouper::join`].
#[derive(Debug)]
pub struct SelectorGrouper<'a> {
    resources: &'a [PolicyResource],
    canonical: Vec<Option<CanonicalSelector>>,
    groups: HashMap<(String, CanonicalSelector), SelectorGroup>,
}

impl<'a> SelectorGrouper<'a> {
    /// Creates a grouper over a snapshot, canonicalizing every selector once.
    #[must_use]
    pub fn new(resources: &'a [PolicyResource]) -> Self {
        let canonical = resources
            .iter()
            .map(|r| r.selector.as_ref().map(canonicalize))
            .collect();
        Self {
            resources,
            canonical,
            groups: HashMap::new(),
        }
    }

    /// Finds every other selector-scoped resource in the namespace of
    /// `resource` with an identical canonical selector.
    ///
    /// Namespace-wide resources of the same namespace are collected on the
    /// way. Returns an empty scan for a namespace-wide query.
    #[must_use]
    pub fn find_same_selector_peers(&self, resource: &PolicyResource) -> PeerScan<'a> {
        let mut scan = PeerScan::default();
        let Some(selector) = resource.selector.as_ref() else {
            return scan;
        };
        let wanted = canonicalize(selector);

        let mut seen: HashSet<&ResourceId> = HashSet::new();
        for (candidate, canonical) in self.resources.iter().zip(&self.canonical) {
            if candidate.namespace() != resource.namespace() {
                continue;
            }
            match canonical {
                None => scan.namespace_wide.push(candidate),
                Some(canonical) => {
                    if *canonical == wanted && candidate.id != resource.id && seen.insert(&candidate.id) {
                        scan.peers.push(candidate);
                    }
                }
            }
        }

        tracing::trace!(
            resource = %resource.id,
            selector = %wanted,
            peers = scan.peers.len(),
            namespace_wide = scan.namespace_wide.len(),
            "scanned for selector peers"
        );
        scan
    }

    /// Every namespace-wide resource of `namespace` in the snapshot, in input order.
    #[must_use]
    pub fn namespace_wide_in(&self, namespace: &str) -> Vec<&'a PolicyResource> {
        self.resources
            .iter()
            .filter(|r| r.is_namespace_wide() && r.namespace() == namespace)
            .collect()
    }

    /// Adds `resource` to its group and returns the members that were already there.
    pub fn join(&mut self, resource: &PolicyResource, selector: &CanonicalSelector) -> Vec<ResourceId> {
        let group = self
            .groups
            .entry((resource.namespace().to_string(), selector.clone()))
            .or_default();
        let existing = group.members.clone();
        group.members.push(resource.id.clone());
        existing
    }

    /// Marks a group as reported. Returns false if it already was.
    pub fn mark_reported(&mut self, namespace: &str, selector: &CanonicalSelector) -> bool {
        let group = self
            .groups
            .entry((namespace.to_string(), selector.clone()))
            .or_default();
        !std::mem::replace(&mut group.reported, true)
    }

    /// Number of distinct `(namespace, selector)` groups joined so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.values().filter(|g| !g.members.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Selector;

    fn app(value: &str) -> Selector {
        Selector::new().with_label("app", value)
    }

    #[test]
    fn test_peers_exclude_self_and_other_namespaces() {
        let resources = vec![
            PolicyResource::scoped("foo", "a", app("x")),
            PolicyResource::scoped("foo", "b", app("x")),
            PolicyResource::scoped("foo", "c", app("y")),
            PolicyResource::scoped("bar", "d", app("x")),
        ];
        let grouper = SelectorGrouper::new(&resources);

        let scan = grouper.find_same_selector_peers(&resources[0]);
        let names: Vec<&str> = scan.peers.iter().map(|r| r.id.name()).collect();
        assert_eq!(names, vec!["b"]);
        assert!(!scan.found_namespace_wide());
    }

    #[test]
    fn test_scan_flags_namespace_wide() {
        let resources = vec![
            PolicyResource::scoped("foo", "a", app("x")),
            PolicyResource::namespace_wide("foo", "w"),
            PolicyResource::namespace_wide("bar", "w"),
        ];
        let grouper = SelectorGrouper::new(&resources);

        let scan = grouper.find_same_selector_peers(&resources[0]);
        assert!(scan.peers.is_empty());
        assert_eq!(scan.namespace_wide.len(), 1);
        assert_eq!(scan.namespace_wide[0].id, ResourceId::new("foo", "w"));
    }

    #[test]
    fn test_empty_selector_only_matches_empty() {
        let resources = vec![
            PolicyResource::scoped("foo", "a", Selector::new()),
            PolicyResource::scoped("foo", "b", Selector::new()),
            PolicyResource::scoped("foo", "c", app("x")),
        ];
        let grouper = SelectorGrouper::new(&resources);

        let scan = grouper.find_same_selector_peers(&resources[0]);
        assert_eq!(scan.peers.len(), 1);
        assert_eq!(scan.peers[0].id.name(), "b");
    }

    #[test]
    fn test_no_duplicate_peers() {
        let resources = vec![
            PolicyResource::scoped("foo", "a", app("x")),
            PolicyResource::scoped("foo", "b", app("x")),
            PolicyResource::scoped("foo", "b", app("x")),
        ];
        let grouper = SelectorGrouper::new(&resources);

        let scan = grouper.find_same_selector_peers(&resources[0]);
        assert_eq!(scan.peers.len(), 1);
    }

    #[test]
    fn test_join_returns_existing_members() {
        let resources = vec![
            PolicyResource::scoped("foo", "a", app("x")),
            PolicyResource::scoped("foo", "b", app("x")),
        ];
        let mut grouper = SelectorGrouper::new(&resources);
        let selector = canonicalize(&app("x"));

        assert!(grouper.join(&resources[0], &selector).is_empty());
        assert_eq!(grouper.join(&resources[1], &selector), vec![resources[0].id.clone()]);
        assert_eq!(grouper.group_count(), 1);
    }

    #[test]
    fn test_mark_reported_once() {
        let resources: Vec<PolicyResource> = Vec::new();
        let mut grouper = SelectorGrouper::new(&resources);
        let selector = canonicalize(&app("x"));

        assert!(grouper.mark_reported("foo", &selector));
        assert!(!grouper.mark_reported("foo", &selector));
        assert!(grouper.mark_reported("bar", &selector));
    }
}
