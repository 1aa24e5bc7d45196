//! Per-pass scope bookkeeping.
//!
//! Both state objects are built fresh for every analysis pass and dropped
//! when it ends; nothing here is shared between passes.

pub mod grouper;
pub mod registry;

pub use grouper::{PeerScan, SelectorGrouper};
pub use registry::{Outcome, ScopeRegistry};
