use crate::doctype::DocType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementFlag {
    /// No child elements allowed in the output.
    Childless,
    /// Implied CDATA element in SGML output.
    EvilCdata,
    /// End tag is not allowed in SGML mode.
    NoEndTag,
    OptionalEndTag,
    Deprecated,
    LooseDtd,
    FramesetDtd,
    /// Body is never shown to the reader (script, style, ...).
    InvisibleBody,
    /// Runs of whitespace are significant.
    PreserveSpaces,
    NonStandard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeFlag {
    /// Minimized to the bare name in SGML mode, `name="name"` in XML mode.
    Boolean,
    Deprecated,
    FramesetDtd,
    LooseDtd,
    Required,
    /// Value is text the reader sees (alt, title, ...).
    VisibleText,
    NonStandard,
    InternalOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeValidator {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub flags: BTreeSet<AttributeFlag>,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Shown to translators in place of a dynamic value.
    #[serde(default)]
    pub example: Option<String>,
}

impl AttributeValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            flags: BTreeSet::new(),
            default_value: None,
            example: None,
        }
    }

    pub fn flag(mut self, flag: AttributeFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn is_flag_set(&self, flag: AttributeFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementValidator {
    pub tag_name: String,
    #[serde(default)]
    pub flags: BTreeSet<ElementFlag>,
    #[serde(default)]
    pub inner_content_type: Option<String>,
    #[serde(default)]
    pub doc_types: BTreeMap<String, DocType>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValidator>,
}

impl ElementValidator {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            flags: BTreeSet::new(),
            inner_content_type: None,
            doc_types: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_flag_set(&self, flag: ElementFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValidator> {
        self.attributes.get(name)
    }

    /// True if the attribute is declared and carries `flag`.
    pub fn attribute_flag(&self, name: &str, flag: AttributeFlag) -> bool {
        self.attribute(name).is_some_and(|attr| attr.is_flag_set(flag))
    }

    pub fn doc_type(&self, name: &str) -> Option<&DocType> {
        self.doc_types.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_flag_lookup() {
        let mut el = ElementValidator::new("option");
        el.attributes.insert(
            "selected".to_string(),
            AttributeValidator::new("selected").flag(AttributeFlag::Boolean),
        );
        assert!(el.attribute_flag("selected", AttributeFlag::Boolean));
        assert!(!el.attribute_flag("selected", AttributeFlag::VisibleText));
        assert!(!el.attribute_flag("missing", AttributeFlag::Boolean));
    }

    #[test]
    fn test_flags_deserialize_kebab_case() {
        let el: ElementValidator = serde_json::from_str(
            r#"{ "tag_name": "br", "flags": ["no-end-tag", "childless"] }"#,
        )
        .unwrap();
        assert!(el.is_flag_set(ElementFlag::NoEndTag));
        assert!(el.is_flag_set(ElementFlag::Childless));
        assert!(el.attributes.is_empty());
    }
}
