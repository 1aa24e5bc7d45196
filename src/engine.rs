//! Conflict Engine.
//!
//! Drives the Scope Registry and the Selector Grouper over one snapshot,
//! in snapshot order, and hands every detected conflict to a sink.
//!
//! The set of conflicting pairs does not depend on snapshot order:
//! - namespace-wide resources conflict with every earlier namespace-wide
//!   resource of their namespace;
//! - a selector-scoped resource conflicts with every namespace-wide
//!   resource of its namespace, wherever it appears in the snapshot;
//! - selector-scoped resources sharing a canonical selector conflict with
//!   each other only when their namespace has no namespace-wide resource.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AnalyzerConfig, SelectorReporting};
use crate::conflict::{Conflict, ConflictKind};
use crate::error::AnalysisResult;
use crate::resource::{PolicyResource, ResourceId};
use crate::scope::{Outcome, ScopeRegistry, SelectorGrouper};
use crate::selector::canonicalize;
use crate::sink::ConflictSink;
use crate::snapshot::ResourceSnapshot;

/// Identifier of one analysis pass, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassId(Uuid);

impl PassId {
    /// Creates a new random pass ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters for a pass whose conflicts went to a caller-supplied sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Pass identifier.
    pub pass_id: PassId,
    /// Resources processed.
    pub resources_analyzed: usize,
    /// Conflicts handed to the sink.
    pub conflicts_reported: usize,
}

/// Output of a pass collected in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Pass identifier.
    pub pass_id: PassId,
    /// When the pass ran.
    pub analyzed_at: DateTime<Utc>,
    /// Resources processed.
    pub resources_analyzed: usize,
    /// Conflicts in emission order.
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Returns true if no conflict was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Returns the number of conflict records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Returns true if the report holds no conflict records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Conflicts raised in `namespace`.
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.conflicts.iter().filter(move |c| c.namespace == namespace)
    }

    /// Conflicts of one kind.
    pub fn of_kind(&self, kind: ConflictKind) -> impl Iterator<Item = &Conflict> + '_ {
        self.conflicts.iter().filter(move |c| c.kind == kind)
    }

    /// Every unordered pair of resources reported as conflicting.
    ///
    /// Stable across permutations of the input snapshot.
    #[must_use]
    pub fn conflicting_pairs(&self) -> BTreeSet<(ResourceId, ResourceId)> {
        self.conflicts
            .iter()
            .flat_map(|c| c.pairs())
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect()
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a snapshot error if serialization fails.
    pub fn to_json(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Scope-conflict analyzer.
///
/// Holds configuration only; every pass builds its own registry and
/// grouper, so one engine can serve concurrent passes.
///
/// # Examples
///
/// ```
/// use nsconflict::{ConflictEngine, PolicyResource, Selector};
///
/// let engine = ConflictEngine::new();
/// let report = engine
///     .analyze(vec![
///         PolicyResource::namespace_wide("foo", "r1"),
///         PolicyResource::scoped("foo", "r2", Selector::new().with_label("app", "x")),
///         PolicyResource::scoped("bar", "r3", Selector::new().with_label("app", "x")),
///     ])
///     .unwrap();
///
/// assert_eq!(report.len(), 1);
/// assert_eq!(report.conflicts[0].scope_description, "(ALL) Namespace: foo");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConflictEngine {
    config: AnalyzerConfig,
}

impl ConflictEngine {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes a resource sequence in the given order.
    ///
    /// # Errors
    /// Returns a validation error if any resource breaks the input contract.
    pub fn analyze<I>(&self, resources: I) -> AnalysisResult<ConflictReport>
    where
        I: IntoIterator<Item = PolicyResource>,
    {
        let snapshot: ResourceSnapshot = resources.into_iter().collect();
        self.analyze_snapshot(&snapshot)
    }

    /// Analyzes a snapshot and collects the conflicts into a report.
    ///
    /// # Errors
    /// Returns a validation error if any resource breaks the input contract.
    pub fn analyze_snapshot(&self, snapshot: &ResourceSnapshot) -> AnalysisResult<ConflictReport> {
        let analyzed_at = Utc::now();
        let mut conflicts: Vec<Conflict> = Vec::new();
        let summary = self.analyze_into(snapshot, &mut conflicts)?;

        Ok(ConflictReport {
            pass_id: summary.pass_id,
            analyzed_at,
            resources_analyzed: summary.resources_analyzed,
            conflicts,
        })
    }

    /// Analyzes a snapshot, pushing every conflict into `sink`.
    ///
    /// The snapshot is validated first; nothing reaches the sink if it is
    /// malformed.
    ///
    /// # Errors
    /// Returns a validation error if any resource breaks the input contract.
    pub fn analyze_into<S: ConflictSink>(
        &self,
        snapshot: &ResourceSnapshot,
        sink: S,
    ) -> AnalysisResult<PassSummary> {
        snapshot.validate()?;

        let pass_id = PassId::new();
        let span = tracing::info_span!("conflict_pass", %pass_id, resources = snapshot.len());
        let _enter = span.enter();

        let mut pass = Pass {
            registry: ScopeRegistry::new(),
            grouper: SelectorGrouper::new(snapshot.resources()),
            reporting: self.config.selector_reporting,
            sink,
            reported: 0,
        };
        for resource in snapshot.resources() {
            pass.process(resource);
        }

        tracing::info!(
            conflicts = pass.reported,
            namespace_wide = pass.registry.namespace_count(),
            selector_groups = pass.grouper.group_count(),
            "conflict pass complete"
        );

        Ok(PassSummary {
            pass_id,
            resources_analyzed: snapshot.len(),
            conflicts_reported: pass.reported,
        })
    }
}

/// State of one running pass.
struct Pass<'a, S> {
    registry: ScopeRegistry,
    grouper: SelectorGrouper<'a>,
    reporting: SelectorReporting,
    sink: S,
    reported: usize,
}

impl<'a, S: ConflictSink> Pass<'a, S> {
    fn process(&mut self, resource: &'a PolicyResource) {
        let namespace = resource.namespace();

        let Some(selector) = resource.selector.as_ref() else {
            if let Outcome::ConflictsWith(mut existing) = self.registry.observe_namespace_wide(resource) {
                existing.push(resource.id.clone());
                self.emit(Conflict::namespace_wide(namespace, existing));
            }
            return;
        };

        if self.registry.registered(namespace).is_some() {
            let wide = self.grouper.namespace_wide_in(namespace);
            self.emit_namespace_wide(resource, &wide);
            return;
        }

        let scan = self.grouper.find_same_selector_peers(resource);
        if scan.found_namespace_wide() {
            // Namespace-wide resources later in the snapshot.
            self.emit_namespace_wide(resource, &scan.namespace_wide);
            return;
        }

        let canonical = canonicalize(selector);
        let existing = self.grouper.join(resource, &canonical);
        if scan.peers.is_empty() {
            return;
        }

        let participants: Vec<ResourceId> = match self.reporting {
            SelectorReporting::PerGroup => {
                if !self.grouper.mark_reported(namespace, &canonical) {
                    return;
                }
                std::iter::once(resource)
                    .chain(scan.peers.iter().copied())
                    .map(|r| r.id.clone())
                    .collect()
            }
            SelectorReporting::PerArrival => {
                if existing.is_empty() {
                    return;
                }
                std::iter::once(resource.id.clone()).chain(existing).collect()
            }
        };
        self.emit(Conflict::same_selector(namespace, &canonical, participants));
    }

    fn emit_namespace_wide(&mut self, resource: &PolicyResource, wide: &[&PolicyResource]) {
        let participants = wide
            .iter()
            .map(|r| r.id.clone())
            .chain(std::iter::once(resource.id.clone()))
            .collect();
        self.emit(Conflict::namespace_wide(resource.namespace(), participants));
    }

    fn emit(&mut self, conflict: Conflict) {
        tracing::debug!(
            namespace = %conflict.namespace,
            kind = %conflict.kind,
            scope = %conflict.scope_description,
            participants = ?conflict.participants,
            "scope conflict detected"
        );
        self.sink.report(conflict);
        self.reported += 1;
    }
}
