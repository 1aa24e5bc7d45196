//! Scope Registry: namespace-wide resources seen so far in a pass.

use std::collections::HashMap;

use crate::resource::{PolicyResource, ResourceId};

/// Result of observing a namespace-wide resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// First namespace-wide resource for its namespace; it is now registered.
    Registered,

    /// Namespace-wide resources were already observed for the namespace.
    ///
    /// Holds all of them in observation order; the first entry is the
    /// registered one.
    ConflictsWith(Vec<ResourceId>),
}

/// Append-only record of namespace-wide resources, keyed by namespace.
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    namespace_wide: HashMap<String, Vec<ResourceId>>,
}

impl ScopeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a namespace-wide resource and reports whether one already existed.
    pub fn observe_namespace_wide(&mut self, resource: &PolicyResource) -> Outcome {
        let seen = self
            .namespace_wide
            .entry(resource.namespace().to_string())
            .or_default();

        let outcome = if seen.is_empty() {
            Outcome::Registered
        } else {
            Outcome::ConflictsWith(seen.clone())
        };
        seen.push(resource.id.clone());

        tracing::trace!(resource = %resource.id, ?outcome, "observed namespace-wide resource");
        outcome
    }

    /// Returns the registered (first observed) namespace-wide resource for `namespace`.
    #[must_use]
    pub fn registered(&self, namespace: &str) -> Option<&ResourceId> {
        self.namespace_wide.get(namespace).and_then(|ids| ids.first())
    }

    /// Number of namespaces holding a registered namespace-wide resource.
    #[must_use]
    pub fn namespace_count(&self) -> usize {
        self.namespace_wide.len()
    }
}
