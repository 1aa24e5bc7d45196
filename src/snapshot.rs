//! Input snapshots.
//!
//! A `ResourceSnapshot` is the ordered, finite resource sequence one pass
//! runs over. Snapshots can be built in memory or decoded from a JSON
//! array of `{"namespace", "name", "selector"?}` objects.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisResult, ValidationError};
use crate::resource::{PolicyResource, ResourceId};

/// Ordered collection of policy resources analyzed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSnapshot {
    resources: Vec<PolicyResource>,
}

impl ResourceSnapshot {
    /// Wraps resources without validating them.
    #[must_use]
    pub fn new(resources: Vec<PolicyResource>) -> Self {
        Self { resources }
    }

    /// Decodes and validates a snapshot from a JSON array.
    ///
    /// # Errors
    /// Returns a snapshot error for malformed JSON and a validation error
    /// for resources breaking the input contract.
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads, decodes and validates a snapshot file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, otherwise as
    /// [`ResourceSnapshot::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Checks every resource and rejects duplicated identifiers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen: HashSet<&ResourceId> = HashSet::with_capacity(self.resources.len());
        for resource in &self.resources {
            resource.validate()?;
            if !seen.insert(&resource.id) {
                return Err(ValidationError::DuplicateResource {
                    id: resource.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the resources in snapshot order.
    #[must_use]
    pub fn resources(&self) -> &[PolicyResource] {
        &self.resources
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the snapshot holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Distinct namespaces present in the snapshot, sorted.
    #[must_use]
    pub fn namespaces(&self) -> BTreeSet<&str> {
        self.resources.iter().map(PolicyResource::namespace).collect()
    }

    /// Appends a resource.
    pub fn push(&mut self, resource: PolicyResource) {
        self.resources.push(resource);
    }
}

impl FromIterator<PolicyResource> for ResourceSnapshot {
    fn from_iter<I: IntoIterator<Item = PolicyResource>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ResourceSnapshot {
    type Item = PolicyResource;
    type IntoIter = std::vec::IntoIter<PolicyResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl From<Vec<PolicyResource>> for ResourceSnapshot {
    fn from(resources: Vec<PolicyResource>) -> Self {
        Self::new(resources)
    }
}
