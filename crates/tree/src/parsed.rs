use crate::meta::NodeMeta;

/// What a parsed element is, as far as the early passes care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    If,
    Elif,
    Else,
    /// A conditional group produced by if expansion.
    Cond,
    /// One branch of a [`ElementKind::Cond`] group.
    Clause,
    /// Stands in for a node that was removed after an error.
    Null,
    Text(String),
    /// Any other element, identified by namespace and local name.
    Element { namespace: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAttribute {
    pub meta: NodeMeta,
    pub namespace: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedElement {
    pub meta: NodeMeta,
    pub kind: ElementKind,
    pub attributes: Vec<ParsedAttribute>,
    pub children: Vec<ParsedElement>,
}

impl ParsedElement {
    pub fn new(
        meta: NodeMeta,
        kind: ElementKind,
        attributes: Vec<ParsedAttribute>,
        children: Vec<ParsedElement>,
    ) -> Self {
        Self {
            meta,
            kind,
            attributes,
            children,
        }
    }

    pub fn null(meta: NodeMeta) -> Self {
        Self::new(meta, ElementKind::Null, Vec::new(), Vec::new())
    }

    pub fn text(meta: NodeMeta, text: impl Into<String>) -> Self {
        Self::new(meta, ElementKind::Text(text.into()), Vec::new(), Vec::new())
    }

    pub fn attribute(&self, name: &str) -> Option<&ParsedAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn display_name(&self) -> &str {
        self.meta.display_name()
    }
}
