use crate::error::SchemaError;
use crate::validator::ElementValidator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Broad classification of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentFamily {
    Css,
    JavaScript,
    Markup,
    Plaintext,
}

impl ContentFamily {
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "text/javascript" => ContentFamily::JavaScript,
            "text/css" => ContentFamily::Css,
            "text/plain" => ContentFamily::Plaintext,
            _ => ContentFamily::Markup,
        }
    }

    /// Text in this family is shown to the reader.
    pub fn is_visible(self) -> bool {
        self == ContentFamily::Markup
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub namespace_uri: String,
    pub content_type: String,
    pub content_family: ContentFamily,
    #[serde(default)]
    pub tag_prefix: Option<String>,
    #[serde(default)]
    pub elements: BTreeMap<String, Arc<ElementValidator>>,
}

impl Schema {
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        for element in schema.elements.values() {
            for doc_type in element.doc_types.values() {
                doc_type.validate()?;
            }
        }
        Ok(schema)
    }

    pub fn element(&self, name: &str) -> Option<&Arc<ElementValidator>> {
        self.elements.get(name)
    }

    pub fn is_visible(&self) -> bool {
        self.content_family.is_visible()
    }
}

/// A shared handle to a schema.
///
/// Schema names are unique within a compilation, so equality and hashing
/// only look at the name and content type.
#[derive(Debug, Clone)]
pub struct SchemaRef(Arc<Schema>);

impl SchemaRef {
    pub fn new(schema: Schema) -> Self {
        Self(Arc::new(schema))
    }

    pub fn as_arc(&self) -> &Arc<Schema> {
        &self.0
    }
}

impl From<Schema> for SchemaRef {
    fn from(schema: Schema) -> Self {
        Self::new(schema)
    }
}

impl From<Arc<Schema>> for SchemaRef {
    fn from(schema: Arc<Schema>) -> Self {
        Self(schema)
    }
}

impl Deref for SchemaRef {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.0
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name && self.0.content_type == other.0.content_type)
    }
}

impl Eq for SchemaRef {}

impl Hash for SchemaRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.content_type.hash(state);
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, self.0.content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA_JSON: &str = r#"{
        "name": "mini",
        "namespace_uri": "http://example.com/mini",
        "content_type": "text/html",
        "content_family": "markup",
        "elements": {
            "html": {
                "tag_name": "html",
                "doc_types": {
                    "mobile": {
                        "name": "mobile",
                        "public_id": "-//WAPFORUM//DTD XHTML Mobile 1.0//EN",
                        "system_id": "http://www.wapforum.org/DTD/xhtml-mobile10.dtd"
                    }
                }
            },
            "script": { "tag_name": "script", "flags": ["invisible-body"] }
        }
    }"#;

    #[test]
    fn test_from_json_str() {
        let schema = Schema::from_json_str(SCHEMA_JSON).unwrap();
        assert_eq!(schema.name, "mini");
        assert!(schema.is_visible());
        let html = schema.element("html").unwrap();
        assert!(!html.doc_type("mobile").unwrap().is_sgml_compatible());
    }

    #[test]
    fn test_from_json_str_rejects_malformed_doctype() {
        let json = SCHEMA_JSON.replace(
            "\"name\": \"mobile\",",
            "\"name\": \"mobile\", \"sgml_public_id\": \"-//X//EN\",",
        );
        assert!(matches!(
            Schema::from_json_str(&json),
            Err(SchemaError::InvalidDocType { .. })
        ));
    }

    #[test]
    fn test_content_family_from_content_type() {
        assert_eq!(ContentFamily::from_content_type("text/css"), ContentFamily::Css);
        assert_eq!(ContentFamily::from_content_type("text/html"), ContentFamily::Markup);
        assert!(!ContentFamily::JavaScript.is_visible());
    }

    #[test]
    fn test_schema_ref_equality_by_name() {
        let a = SchemaRef::new(Schema::from_json_str(SCHEMA_JSON).unwrap());
        let mut other = Schema::from_json_str(SCHEMA_JSON).unwrap();
        other.elements.clear();
        let b = SchemaRef::new(other);
        assert_eq!(a, b);
    }
}
