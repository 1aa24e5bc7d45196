//! Conflict records.
//!
//! A `Conflict` names two or more resources of one namespace whose
//! effective scopes overlap. Records are produced fresh by every pass and
//! carry no persisted identity.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::ResourceId;
use crate::selector::CanonicalSelector;

/// Which overlap produced the conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A namespace-wide resource overlaps another resource of the namespace.
    NamespaceWide,

    /// Selector-scoped resources share one canonical selector.
    SameSelector,
}

impl ConflictKind {
    /// Returns a short stable identifier suitable for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NamespaceWide => "namespace_wide",
            Self::SameSelector => "same_selector",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable digest of a conflict's namespace, kind, scope and participant set.
///
/// Independent of participant order, so two records naming the same
/// resources for the same overlap share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConflictFingerprint(blake3::Hash);

impl ConflictFingerprint {
    /// Returns the raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ConflictFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.to_hex().as_str())
    }
}

/// A detected scope overlap between resources of one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Namespace all participants belong to.
    pub namespace: String,

    /// Overlap kind.
    pub kind: ConflictKind,

    /// `(ALL) Namespace: <ns>` or the canonical selector string.
    pub scope_description: String,

    /// Involved resources, in report order, without duplicates.
    pub participants: Vec<ResourceId>,
}

impl Conflict {
    /// Creates a namespace-wide overlap conflict.
    #[must_use]
    pub fn namespace_wide(namespace: impl Into<String>, participants: Vec<ResourceId>) -> Self {
        let namespace = namespace.into();
        Self {
            scope_description: format!("(ALL) Namespace: {namespace}"),
            namespace,
            kind: ConflictKind::NamespaceWide,
            participants: dedup(participants),
        }
    }

    /// Creates a same-selector conflict.
    #[must_use]
    pub fn same_selector(
        namespace: impl Into<String>,
        selector: &CanonicalSelector,
        participants: Vec<ResourceId>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            kind: ConflictKind::SameSelector,
            scope_description: selector.to_string(),
            participants: dedup(participants),
        }
    }

    /// Returns the number of participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Returns true if `id` takes part in this conflict.
    #[must_use]
    pub fn involves(&self, id: &ResourceId) -> bool {
        self.participants.contains(id)
    }

    /// Every unordered pair of participants, smaller identifier first.
    pub fn pairs(&self) -> impl Iterator<Item = (&ResourceId, &ResourceId)> + '_ {
        self.participants.iter().enumerate().flat_map(move |(i, a)| {
            self.participants[i + 1..]
                .iter()
                .map(move |b| if a <= b { (a, b) } else { (b, a) })
        })
    }

    /// Computes the order-independent fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> ConflictFingerprint {
        let mut sorted: Vec<&ResourceId> = self.participants.iter().collect();
        sorted.sort();

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.namespace.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.kind.name().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.scope_description.as_bytes());
        for id in sorted {
            hasher.update(&[0]);
            hasher.update(id.namespace.as_bytes());
            hasher.update(b"/");
            hasher.update(id.name.as_bytes());
        }
        ConflictFingerprint(hasher.finalize())
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.participants.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} conflict in '{}' on [{}]: {}",
            self.kind,
            self.namespace,
            self.scope_description,
            names.join(", ")
        )
    }
}

fn dedup(participants: Vec<ResourceId>) -> Vec<ResourceId> {
    let mut seen: HashSet<ResourceId> = HashSet::with_capacity(participants.len());
    participants
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Selector;
    use crate::selector::canonicalize;

    fn id(name: &str) -> ResourceId {
        ResourceId::new("foo", name)
    }

    #[test]
    fn test_namespace_wide_description() {
        let conflict = Conflict::namespace_wide("foo", vec![id("r1"), id("r2")]);
        assert_eq!(conflict.scope_description, "(ALL) Namespace: foo");
        assert_eq!(conflict.kind, ConflictKind::NamespaceWide);
        assert_eq!(conflict.participant_count(), 2);
    }

    #[test]
    fn test_same_selector_description() {
        let selector = canonicalize(&Selector::new().with_label("app", "x").with_label("a", "1"));
        let conflict = Conflict::same_selector("foo", &selector, vec![id("r1"), id("r2")]);
        assert_eq!(conflict.scope_description, "a=1,app=x");
        assert_eq!(conflict.kind, ConflictKind::SameSelector);
    }

    #[test]
    fn test_participants_deduplicated() {
        let conflict = Conflict::namespace_wide("foo", vec![id("r2"), id("r1"), id("r2")]);
        assert_eq!(conflict.participants, vec![id("r2"), id("r1")]);
        assert!(conflict.involves(&id("r1")));
        assert!(!conflict.involves(&id("r3")));
    }

    #[test]
    fn test_pairs() {
        let conflict = Conflict::namespace_wide("foo", vec![id("c"), id("a"), id("b")]);
        let pairs: Vec<(&str, &str)> = conflict
            .pairs()
            .map(|(a, b)| (a.name(), b.name()))
            .collect();
        assert_eq!(pairs, vec![("a", "c"), ("b", "c"), ("a", "b")]);
    }

    #[test]
    fn test_fingerprint_order_independent() {
        let a = Conflict::namespace_wide("foo", vec![id("r1"), id("r2")]);
        let b = Conflict::namespace_wide("foo", vec![id("r2"), id("r1")]);
        let c = Conflict::namespace_wide("bar", vec![ResourceId::new("bar", "r1"), ResourceId::new("bar", "r2")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(format!("{}", a.fingerprint()).len(), 64);
    }

    #[test]
    fn test_conflict_display() {
        let conflict = Conflict::namespace_wide("foo", vec![id("r1"), id("r2")]);
        let text = format!("{conflict}");
        assert!(text.contains("namespace_wide"));
        assert!(text.contains("foo/r1, foo/r2"));
    }

    #[test]
    fn test_conflict_serialization() {
        let conflict = Conflict::namespace_wide("foo", vec![id("r1"), id("r2")]);
        let json = serde_json::to_string(&conflict).unwrap();
        assert!(json.contains("\"namespace_wide\""));
        let deserialized: Conflict = serde_json::from_str(&json).unwrap();
        assert_eq!(conflict, deserialized);
    }
}
