//! Newtype wrappers for template identifiers
//!
//! Template names are compared and hashed constantly (dependency lookups,
//! callee signatures), so they are stored as shared `Arc<str>` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The globally unique, dot-separated name of a template, e.g. `com.example.Header`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(Arc<str>);

impl TemplateName {
    /// Creates a new TemplateName from a fully-qualified string
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the fully-qualified string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The package portion of the name, if the name is qualified.
    pub fn package_name(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }

    /// The unqualified portion of the name.
    pub fn base_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<Arc<str>> for TemplateName {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_creation() {
        let n1 = TemplateName::new("com.example.Header");
        let n2 = TemplateName::from("com.example.Header");
        let n3 = TemplateName::from(String::from("com.example.Header"));

        assert_eq!(n1, n2);
        assert_eq!(n2, n3);
        assert_eq!(n1.as_str(), "com.example.Header");
    }

    #[test]
    fn test_package_and_base_name() {
        let name = TemplateName::new("com.example.Header");
        assert_eq!(name.package_name(), Some("com.example"));
        assert_eq!(name.base_name(), "Header");

        let bare = TemplateName::new("Header");
        assert_eq!(bare.package_name(), None);
        assert_eq!(bare.base_name(), "Header");
    }

    #[test]
    fn test_hash_map_usage() {
        use std::collections::HashMap;

        let mut stamps = HashMap::new();
        stamps.insert(TemplateName::new("a.One"), 42);
        stamps.insert(TemplateName::new("a.Two"), 100);

        assert_eq!(stamps.get(&TemplateName::new("a.One")), Some(&42));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let name = TemplateName::new("a.One");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"a.One\"");
        let back: TemplateName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
