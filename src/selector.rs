//! Selector canonicalization.
//!
//! Selectors are compared through their canonical string: labels sorted by
//! key, rendered as `key=value`, joined with `,`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::Selector;

/// Deterministic string form of a selector.
///
/// Two selectors are equal iff their canonical forms are equal. An empty
/// selector canonicalizes to the empty string.
///
/// # Examples
///
/// ```
/// use nsconflict::{canonicalize, Selector};
///
/// let a = Selector::new().with_label("b", "2").with_label("a", "1");
/// assert_eq!(canonicalize(&a).as_str(), "a=1,b=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSelector(String);

impl CanonicalSelector {
    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the canonical form of an empty selector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CanonicalSelector> for String {
    fn from(selector: CanonicalSelector) -> Self {
        selector.0
    }
}

/// Computes the canonical form of a selector.
#[must_use]
pub fn canonicalize(selector: &Selector) -> CanonicalSelector {
    let mut labels: Vec<(&str, &str)> = selector.iter().collect();
    labels.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let rendered: Vec<String> = labels
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    CanonicalSelector(rendered.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_sorts_keys() {
        let selector = Selector::new()
            .with_label("version", "v1")
            .with_label("app", "reviews");
        assert_eq!(canonicalize(&selector).as_str(), "app=reviews,version=v1");
    }

    #[test]
    fn test_canonicalize_insertion_order_independent() {
        let a = Selector::new().with_label("a", "1").with_label("b", "2");
        let b = Selector::new().with_label("b", "2").with_label("a", "1");
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn test_canonicalize_distinct_values() {
        let a = Selector::new().with_label("a", "1");
        let b = Selector::new().with_label("a", "2");
        assert_ne!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn test_canonicalize_empty() {
        let canonical = canonicalize(&Selector::new());
        assert!(canonical.is_empty());
        assert_eq!(format!("{canonical}"), "");
    }

    #[test]
    fn test_canonicalize_from_iter() {
        let selector: Selector = [("tier", "web"), ("app", "x")].into_iter().collect();
        assert_eq!(String::from(canonicalize(&selector)), "app=x,tier=web");
    }
}
