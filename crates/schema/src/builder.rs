use crate::doctype::DocType;
use crate::error::SchemaError;
use crate::schema::{ContentFamily, Schema, SchemaRef};
use crate::validator::{AttributeFlag, AttributeValidator, ElementFlag, ElementValidator};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Fluent builder for a [`Schema`].
///
/// ```
/// use marklet_schema::{ElementBuilder, ElementFlag, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("mini", "http://example.com/mini", "text/html")
///     .element(ElementBuilder::new("br").flag(ElementFlag::NoEndTag))
///     .build()
///     .unwrap();
/// assert!(schema.element("br").unwrap().is_flag_set(ElementFlag::NoEndTag));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    namespace_uri: String,
    content_type: String,
    tag_prefix: Option<String>,
    elements: Vec<ElementValidator>,
}

impl SchemaBuilder {
    pub fn new(
        name: impl Into<String>,
        namespace_uri: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace_uri: namespace_uri.into(),
            content_type: content_type.into(),
            tag_prefix: None,
            elements: Vec::new(),
        }
    }

    pub fn tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }

    pub fn element(mut self, element: ElementBuilder) -> Self {
        self.elements.push(element.build());
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut elements = BTreeMap::new();
        for element in self.elements {
            for doc_type in element.doc_types.values() {
                doc_type.validate()?;
            }
            let tag = element.tag_name.clone();
            if elements.insert(tag.clone(), Arc::new(element)).is_some() {
                return Err(SchemaError::DuplicateElement {
                    schema: self.name,
                    element: tag,
                });
            }
        }
        Ok(Schema {
            content_family: ContentFamily::from_content_type(&self.content_type),
            name: self.name,
            namespace_uri: self.namespace_uri,
            content_type: self.content_type,
            tag_prefix: self.tag_prefix,
            elements,
        })
    }

    pub fn build_ref(self) -> Result<SchemaRef, SchemaError> {
        self.build().map(SchemaRef::new)
    }
}

#[derive(Debug, Clone)]
pub struct ElementBuilder {
    inner: ElementValidator,
}

impl ElementBuilder {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            inner: ElementValidator::new(tag_name),
        }
    }

    pub fn flag(mut self, flag: ElementFlag) -> Self {
        self.inner.flags.insert(flag);
        self
    }

    pub fn inner_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.inner.inner_content_type = Some(content_type.into());
        self
    }

    pub fn attribute(mut self, attribute: AttributeValidator) -> Self {
        self.inner
            .attributes
            .insert(attribute.name.clone(), attribute);
        self
    }

    /// Shorthand for an attribute carrying a single flag.
    pub fn flagged_attribute(self, name: &str, flag: AttributeFlag) -> Self {
        self.attribute(AttributeValidator::new(name).flag(flag))
    }

    pub fn doc_type(mut self, doc_type: DocType) -> Self {
        self.inner.doc_types.insert(doc_type.name.clone(), doc_type);
        self
    }

    pub fn build(self) -> ElementValidator {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_element_is_rejected() {
        let result = SchemaBuilder::new("s", "urn:s", "text/html")
            .element(ElementBuilder::new("p"))
            .element(ElementBuilder::new("p"))
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateElement { .. })));
    }

    #[test]
    fn test_content_family_follows_content_type() {
        let schema = SchemaBuilder::new("js", "urn:js", "text/javascript")
            .build()
            .unwrap();
        assert_eq!(schema.content_family, ContentFamily::JavaScript);
    }

    #[test]
    fn test_attribute_builder() {
        let el = ElementBuilder::new("img")
            .attribute(AttributeValidator::new("alt").flag(AttributeFlag::VisibleText))
            .attribute(AttributeValidator::new("src").example("/images/logo.png"))
            .build();
        assert!(el.attribute_flag("alt", AttributeFlag::VisibleText));
        assert_eq!(
            el.attribute("src").unwrap().example.as_deref(),
            Some("/images/logo.png")
        );
    }
}
