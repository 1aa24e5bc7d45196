//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// How conflicts among resources sharing one selector are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorReporting {
    /// One record per `(namespace, selector)` group, listing every member
    /// in input order. Raised by the first member processed.
    #[default]
    PerGroup,

    /// One record per arriving resource that finds already-grouped members:
    /// the arriving resource followed by those members.
    PerArrival,
}

/// Configuration for a `ConflictEngine`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Grouping of same-selector conflicts.
    pub selector_reporting: SelectorReporting,
}

impl AnalyzerConfig {
    /// Sets the selector reporting mode.
    #[must_use]
    pub fn with_selector_reporting(mut self, mode: SelectorReporting) -> Self {
        self.selector_reporting = mode;
        self
    }
}
