use crate::expression::Attribute;
use marklet_schema::SchemaRef;
use marklet_types::TemplateName;
use std::fmt;
use std::sync::Arc;

/// The declared type of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Markup or text content rendered in the given schema.
    Content(SchemaRef),
    Boolean,
    /// A host-language type, kept opaque.
    Native(String),
    /// A closure over another template.
    Template(TemplateName),
    /// An attribute bundle.
    Bundle,
}

impl Type {
    /// Whether values of this type end up in front of the reader.
    pub fn is_visible(&self) -> bool {
        match self {
            Type::Content(schema) => schema.is_visible(),
            Type::Boolean | Type::Native(_) | Type::Template(_) | Type::Bundle => true,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Content(schema) => write!(f, "content<{}>", schema.content_type),
            Type::Boolean => f.write_str("boolean"),
            Type::Native(name) => write!(f, "native<{name}>"),
            Type::Template(name) => write!(f, "template<{name}>"),
            Type::Bundle => f.write_str("bundle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormalParameter {
    pub name: String,
    pub ty: Type,
    pub has_default: bool,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>, ty: Type, has_default: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default,
        }
    }
}

/// The signature of a call target: its name and parameter contract.
///
/// Two callables are equal when name and every parameter match, which is
/// what the dependency graph compares between builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Callable {
    pub name: TemplateName,
    pub parameters: Vec<FormalParameter>,
}

impl Callable {
    pub fn new(name: impl Into<TemplateName>, parameters: Vec<FormalParameter>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&FormalParameter> {
        self.parameters.iter().find(|param| param.name == name)
    }
}

/// The three states a call moves through in the larger compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    Unbound(TemplateName),
    Bound(Arc<Callable>),
    Validated(Arc<Callable>),
}

impl CallTarget {
    pub fn callable(&self) -> Option<&Arc<Callable>> {
        match self {
            CallTarget::Unbound(_) => None,
            CallTarget::Bound(callable) | CallTarget::Validated(callable) => Some(callable),
        }
    }

    pub fn name(&self) -> &TemplateName {
        match self {
            CallTarget::Unbound(name) => name,
            CallTarget::Bound(callable) | CallTarget::Validated(callable) => &callable.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: CallTarget,
    pub attributes: Vec<Attribute>,
}

impl Call {
    pub fn new(target: CallTarget, attributes: Vec<Attribute>) -> Self {
        Self { target, attributes }
    }
}
