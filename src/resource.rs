//! Policy resource types.
//!
//! A `PolicyResource` is the read-only input of an analysis pass. It is
//! either namespace-wide (no selector) or selector-scoped (a label
//! selector restricting it to matching workloads).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a policy resource: namespace plus name.
///
/// Displayed as `namespace/name`.
///
/// # Examples
///
/// ```
/// use nsconflict::ResourceId;
///
/// let id = ResourceId::new("foo", "jwt-auth");
/// assert_eq!(id.to_string(), "foo/jwt-auth");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    /// Namespace the resource lives in.
    pub namespace: String,
    /// Resource name, unique within the namespace.
    pub name: String,
}

impl ResourceId {
    /// Creates a new resource identifier.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// An unordered set of label key/value pairs.
///
/// A present-but-empty selector is still a selector: it is not the same as
/// an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(HashMap<String, String>);

impl Selector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label, replacing any previous value for the key.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the value for a label key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the selector carries no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the labels in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Selector
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A namespace-scoped policy resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyResource {
    /// Namespace and name.
    #[serde(flatten)]
    pub id: ResourceId,

    /// Workload selector; `None` means the resource is namespace-wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
}

impl PolicyResource {
    /// Creates a namespace-wide resource.
    #[must_use]
    pub fn namespace_wide(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(namespace, name),
            selector: None,
        }
    }

    /// Creates a selector-scoped resource.
    #[must_use]
    pub fn scoped(
        namespace: impl Into<String>,
        name: impl Into<String>,
        selector: Selector,
    ) -> Self {
        Self {
            id: ResourceId::new(namespace, name),
            selector: Some(selector),
        }
    }

    /// Creates a new resource builder.
    #[must_use]
    pub fn builder() -> PolicyResourceBuilder {
        PolicyResourceBuilder::new()
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.id.namespace
    }

    /// Returns true if the resource applies to the whole namespace.
    #[must_use]
    pub fn is_namespace_wide(&self) -> bool {
        self.selector.is_none()
    }

    /// Checks the input contract: non-empty namespace and name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.namespace.is_empty() {
            return Err(ValidationError::EmptyNamespace);
        }
        if self.id.name.is_empty() {
            return Err(ValidationError::EmptyName {
                namespace: self.id.namespace.clone(),
            });
        }
        Ok(())
    }
}

/// Builder for `PolicyResource`.
#[derive(Debug, Default)]
pub struct PolicyResourceBuilder {
    namespace: Option<String>,
    name: Option<String>,
    selector: Option<Selector>,
}

impl PolicyResourceBuilder {
    /// Creates a new resource builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace (required).
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the name (required).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the whole selector.
    #[must_use]
    pub fn selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Adds a selector label, making the resource selector-scoped.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let selector = self.selector.take().unwrap_or_default();
        self.selector = Some(selector.with_label(key, value));
        self
    }

    /// Builds the resource.
    ///
    /// # Errors
    /// Returns an error if namespace or name is missing or empty.
    pub fn build(self) -> Result<PolicyResource, ValidationError> {
        let namespace = self.namespace.ok_or(ValidationError::MissingField {
            field: "namespace".to_string(),
        })?;
        let name = self.name.ok_or(ValidationError::MissingField {
            field: "name".to_string(),
        })?;

        let resource = PolicyResource {
            id: ResourceId::new(namespace, name),
            selector: self.selector,
        };
        resource.validate()?;
        Ok(resource)
    }
}
