//! # nsconflict - Scope-conflict analysis for namespace-scoped policies
//!
//! Policy resources in a declarative configuration store apply either to a
//! whole namespace (no selector) or to the workloads matching a label
//! selector. nsconflict finds resources whose effective scopes overlap.
//!
//! ## Core Concepts
//!
//! - **PolicyResource**: a namespace-wide or selector-scoped input resource
//! - **CanonicalSelector**: order-independent string form of a selector
//! - **ScopeRegistry / SelectorGrouper**: per-pass bookkeeping
//! - **ConflictEngine**: one pass over a snapshot, producing `Conflict`s
//!
//! ## Usage
//!
//! ```rust
//! use nsconflict::{ConflictEngine, PolicyResource};
//!
//! let report = ConflictEngine::new()
//!     .analyze(vec![
//!         PolicyResource::namespace_wide("foo", "jwt-a"),
//!         PolicyResource::builder()
//!             .namespace("foo")
//!             .name("jwt-b")
//!             .label("app", "reviews")
//!             .build()?,
//!     ])?;
//!
//! assert_eq!(report.len(), 1);
//! # Ok::<(), nsconflict::AnalysisError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod resource;
pub mod scope;
pub mod selector;
pub mod sink;
pub mod snapshot;

// Re-export primary types at crate root for convenience
pub use config::{AnalyzerConfig, SelectorReporting};
pub use conflict::{Conflict, ConflictFingerprint, ConflictKind};
pub use engine::{ConflictEngine, ConflictReport, PassId, PassSummary};
pub use error::{AnalysisError, AnalysisResult, ValidationError};
pub use resource::{PolicyResource, PolicyResourceBuilder, ResourceId, Selector};
pub use scope::{Outcome, PeerScan, ScopeRegistry, SelectorGrouper};
pub use selector::{canonicalize, CanonicalSelector};
pub use sink::ConflictSink;
pub use snapshot::ResourceSnapshot;
