use crate::call::Call;
use crate::meta::NodeMeta;
use marklet_schema::{DocType, ElementValidator, Schema, SchemaRef};
use marklet_types::SourcePosition;
use std::convert::Infallible;
use std::sync::Arc;

/// Why an [`ExprKind::Exception`] fails when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    NotSupportedInSgmlMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub predicate: Expression,
    pub value: Expression,
}

/// `if / elif ... / else`, evaluated in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub clauses: Vec<Clause>,
    pub else_value: Box<Expression>,
}

/// An attribute of an [`OutputElement`] or an argument of a [`Call`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub meta: NodeMeta,
    pub name: String,
    pub value: Expression,
    /// The attribute is only rendered if this holds.
    pub condition: Option<Expression>,
}

impl Attribute {
    pub fn new(meta: NodeMeta, name: impl Into<String>, value: Expression) -> Self {
        Self {
            meta,
            name: name.into(),
            value,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: Expression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn try_map_values<E, F>(self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(Expression) -> Result<Expression, E>,
    {
        Ok(Self {
            meta: self.meta,
            name: self.name,
            value: f(self.value)?,
            condition: self.condition.map(&mut *f).transpose()?,
        })
    }
}

/// A markup element of the output language.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputElement {
    pub local_name: String,
    pub tag_prefix: Option<String>,
    pub validator: Arc<ElementValidator>,
    pub attributes: Vec<Attribute>,
    /// Names of attribute bundles spliced into the tag.
    pub bundles: Vec<String>,
    pub content: Box<Expression>,
    pub ph_name: Option<String>,
    /// Only meaningful on a root element.
    pub doc_type: Option<DocType>,
}

impl OutputElement {
    pub fn new(validator: Arc<ElementValidator>, content: Expression) -> Self {
        Self {
            local_name: validator.tag_name.clone(),
            tag_prefix: None,
            validator,
            attributes: Vec::new(),
            bundles: Vec::new(),
            content: Box::new(content),
            ph_name: None,
            doc_type: None,
        }
    }

    /// Looks `tag` up in `schema` and takes the schema's tag prefix.
    pub fn from_schema(schema: &Schema, tag: &str, content: Expression) -> Option<Self> {
        let validator = Arc::clone(schema.element(tag)?);
        let element = Self::new(validator, content);
        Some(Self {
            tag_prefix: schema.tag_prefix.clone(),
            ..element
        })
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundles.push(bundle.into());
        self
    }

    pub fn with_ph_name(mut self, name: impl Into<String>) -> Self {
        self.ph_name = Some(name.into());
        self
    }

    pub fn with_doc_type(mut self, doc_type: DocType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }
}

/// Host-language code embedded in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeExpression {
    pub code: String,
    pub example: Option<String>,
    pub ph_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    StringConstant(String),
    BooleanConstant(bool),
    Concatenation(Vec<Expression>),
    Conditional(Conditional),
    OutputElement(OutputElement),
    PlaceholderStart {
        name: String,
        example: Option<String>,
    },
    PlaceholderEnd,
    Placeholder {
        name: String,
        example: String,
        content: Box<Expression>,
    },
    Native(NativeExpression),
    /// Translatable message written inline.
    UnextractedMessage(Box<Expression>),
    /// Content exempt from translation checks.
    NoMessage(Box<Expression>),
    Example {
        sub: Box<Expression>,
        example: String,
    },
    Escape(Box<Expression>),
    /// True iff the output is rendered with XML syntax.
    IsXml,
    Exception {
        kind: ExceptionKind,
        message: String,
    },
    AttrBundleReference(String),
    Call(Call),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub meta: NodeMeta,
    pub schema: Option<SchemaRef>,
    pub kind: ExprKind,
}

fn is_java_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

impl Expression {
    pub fn new(meta: NodeMeta, schema: Option<SchemaRef>, kind: ExprKind) -> Self {
        Self { meta, schema, kind }
    }

    pub fn string(meta: NodeMeta, schema: Option<SchemaRef>, value: impl Into<String>) -> Self {
        Self::new(meta, schema, ExprKind::StringConstant(value.into()))
    }

    /// A string constant named `text`, the way literal template text is.
    pub fn text(position: SourcePosition, schema: Option<SchemaRef>, value: impl Into<String>) -> Self {
        Self::string(NodeMeta::new(position, "text"), schema, value)
    }

    pub fn boolean(meta: NodeMeta, value: bool) -> Self {
        Self::new(meta, None, ExprKind::BooleanConstant(value))
    }

    pub fn is_xml(meta: NodeMeta, schema: Option<SchemaRef>) -> Self {
        Self::new(meta, schema, ExprKind::IsXml)
    }

    pub fn conditional(
        meta: NodeMeta,
        schema: Option<SchemaRef>,
        predicate: Expression,
        then_value: Expression,
        else_value: Expression,
    ) -> Self {
        Self::new(
            meta,
            schema,
            ExprKind::Conditional(Conditional {
                clauses: vec![Clause {
                    predicate,
                    value: then_value,
                }],
                else_value: Box::new(else_value),
            }),
        )
    }

    pub fn native(meta: NodeMeta, code: impl Into<String>) -> Self {
        Self::new(
            meta,
            None,
            ExprKind::Native(NativeExpression {
                code: code.into(),
                example: None,
                ph_name: None,
            }),
        )
    }

    pub fn element(meta: NodeMeta, schema: SchemaRef, element: OutputElement) -> Self {
        Self::new(meta, Some(schema), ExprKind::OutputElement(element))
    }

    pub fn placeholder_start(
        meta: NodeMeta,
        schema: Option<SchemaRef>,
        name: impl Into<String>,
        example: Option<String>,
    ) -> Self {
        Self::new(
            meta,
            schema,
            ExprKind::PlaceholderStart {
                name: name.into(),
                example,
            },
        )
    }

    pub fn placeholder_end(meta: NodeMeta, schema: Option<SchemaRef>) -> Self {
        Self::new(meta, schema, ExprKind::PlaceholderEnd)
    }

    /// Builds a normalized concatenation.
    ///
    /// Nested concatenations are spliced in, adjacent string constants are
    /// merged and empty strings dropped. No values yield an empty string at
    /// `position`; a single value is returned as is.
    pub fn concat(
        position: SourcePosition,
        schema: Option<SchemaRef>,
        values: impl IntoIterator<Item = Expression>,
    ) -> Expression {
        let mut out: Vec<Expression> = Vec::new();
        for value in values {
            push_flattened(&mut out, &schema, value);
        }
        out.retain(|value| !matches!(&value.kind, ExprKind::StringConstant(s) if s.is_empty()));
        match out.len() {
            0 => Expression::text(position, schema, ""),
            1 => out.remove(0),
            _ => {
                let meta = out[0].meta.clone();
                Expression::new(meta, schema, ExprKind::Concatenation(out))
            }
        }
    }

    pub fn position(&self) -> &SourcePosition {
        &self.meta.position
    }

    pub fn display_name(&self) -> &str {
        self.meta.display_name()
    }

    /// Splits a concatenation into its values.
    pub fn separate(self) -> Vec<Expression> {
        match self.kind {
            ExprKind::Concatenation(values) => values,
            kind => vec![Expression::new(self.meta, self.schema, kind)],
        }
    }

    /// True if this always evaluates to the empty string.
    pub fn always_empty(&self) -> bool {
        match &self.kind {
            ExprKind::StringConstant(value) => value.is_empty(),
            ExprKind::Concatenation(values) => values.iter().all(Expression::always_empty),
            ExprKind::Conditional(cond) => {
                cond.clauses.iter().all(|clause| clause.value.always_empty())
                    && cond.else_value.always_empty()
            }
            ExprKind::NoMessage(sub) | ExprKind::Escape(sub) | ExprKind::Example { sub, .. } => {
                sub.always_empty()
            }
            _ => false,
        }
    }

    /// True if this always evaluates to whitespace (or nothing).
    pub fn always_only_whitespace(&self) -> bool {
        match &self.kind {
            ExprKind::StringConstant(value) => value.chars().all(is_java_space),
            ExprKind::Concatenation(values) => {
                values.iter().all(Expression::always_only_whitespace)
            }
            ExprKind::Conditional(cond) => {
                cond.clauses
                    .iter()
                    .all(|clause| clause.value.always_only_whitespace())
                    && cond.else_value.always_only_whitespace()
            }
            ExprKind::NoMessage(sub) | ExprKind::Escape(sub) | ExprKind::Example { sub, .. } => {
                sub.always_only_whitespace()
            }
            _ => self.always_empty(),
        }
    }

    /// True if the value is a string known at compile time.
    pub fn has_static_string(&self) -> bool {
        match &self.kind {
            ExprKind::StringConstant(_) => true,
            ExprKind::Concatenation(values) => values.iter().all(Expression::has_static_string),
            ExprKind::OutputElement(element) => {
                element
                    .attributes
                    .iter()
                    .all(|attr| attr.condition.is_none() && attr.value.has_static_string())
                    && element.content.has_static_string()
            }
            _ => false,
        }
    }

    /// The compile-time string value, for constants and concatenations of them.
    pub fn static_string(&self) -> Option<String> {
        match &self.kind {
            ExprKind::StringConstant(value) => Some(value.clone()),
            ExprKind::Concatenation(values) => values.iter().map(Expression::static_string).collect(),
            _ => None,
        }
    }

    pub fn always_equals(&self, value: bool) -> bool {
        matches!(self.kind, ExprKind::BooleanConstant(b) if b == value)
    }

    pub fn always_equal_to_xml_enabled(&self) -> bool {
        matches!(self.kind, ExprKind::IsXml)
    }

    /// Rebuilds this node with every direct sub-expression passed through `f`.
    ///
    /// Concatenations are re-normalized afterwards, so a child that expands
    /// into a concatenation is spliced into its parent.
    pub fn try_map_children<E, F>(self, f: &mut F) -> Result<Expression, E>
    where
        F: FnMut(Expression) -> Result<Expression, E>,
    {
        let Expression { meta, schema, kind } = self;
        let kind = match kind {
            ExprKind::Concatenation(values) => {
                let values = values.into_iter().map(&mut *f).collect::<Result<Vec<_>, E>>()?;
                return Ok(Expression::concat(meta.position, schema, values));
            }
            ExprKind::Conditional(cond) => ExprKind::Conditional(Conditional {
                clauses: cond
                    .clauses
                    .into_iter()
                    .map(|clause| -> Result<Clause, E> {
                        Ok(Clause {
                            predicate: f(clause.predicate)?,
                            value: f(clause.value)?,
                        })
                    })
                    .collect::<Result<_, E>>()?,
                else_value: Box::new(f(*cond.else_value)?),
            }),
            ExprKind::OutputElement(element) => ExprKind::OutputElement(OutputElement {
                attributes: element
                    .attributes
                    .into_iter()
                    .map(|attr| attr.try_map_values(&mut *f))
                    .collect::<Result<_, E>>()?,
                content: Box::new(f(*element.content)?),
                ..element
            }),
            ExprKind::Placeholder {
                name,
                example,
                content,
            } => ExprKind::Placeholder {
                name,
                example,
                content: Box::new(f(*content)?),
            },
            ExprKind::UnextractedMessage(sub) => ExprKind::UnextractedMessage(Box::new(f(*sub)?)),
            ExprKind::NoMessage(sub) => ExprKind::NoMessage(Box::new(f(*sub)?)),
            ExprKind::Escape(sub) => ExprKind::Escape(Box::new(f(*sub)?)),
            ExprKind::Example { sub, example } => ExprKind::Example {
                sub: Box::new(f(*sub)?),
                example,
            },
            ExprKind::Call(call) => ExprKind::Call(Call {
                target: call.target,
                attributes: call
                    .attributes
                    .into_iter()
                    .map(|attr| attr.try_map_values(&mut *f))
                    .collect::<Result<_, E>>()?,
            }),
            leaf @ (ExprKind::StringConstant(_)
            | ExprKind::BooleanConstant(_)
            | ExprKind::PlaceholderStart { .. }
            | ExprKind::PlaceholderEnd
            | ExprKind::Native(_)
            | ExprKind::IsXml
            | ExprKind::Exception { .. }
            | ExprKind::AttrBundleReference(_)) => leaf,
        };
        Ok(Expression { meta, schema, kind })
    }

    pub fn map_children<F>(self, mut f: F) -> Expression
    where
        F: FnMut(Expression) -> Expression,
    {
        let result: Result<Expression, Infallible> = self.try_map_children(&mut |e| Ok(f(e)));
        match result {
            Ok(expr) => expr,
            Err(never) => match never {},
        }
    }

    /// Visits every expression below this one, depth first, including
    /// attribute values and call arguments.
    pub fn for_each_descendant<F>(&self, f: &mut F)
    where
        F: FnMut(&Expression),
    {
        let mut visit = |child: &Expression| {
            f(child);
            child.for_each_descendant(&mut *f);
        };
        match &self.kind {
            ExprKind::Concatenation(values) => values.iter().for_each(&mut visit),
            ExprKind::Conditional(cond) => {
                for clause in &cond.clauses {
                    visit(&clause.predicate);
                    visit(&clause.value);
                }
                visit(&cond.else_value);
            }
            ExprKind::OutputElement(element) => {
                for attr in &element.attributes {
                    visit(&attr.value);
                    if let Some(condition) = &attr.condition {
                        visit(condition);
                    }
                }
                visit(&element.content);
            }
            ExprKind::Call(call) => {
                for attr in &call.attributes {
                    visit(&attr.value);
                    if let Some(condition) = &attr.condition {
                        visit(condition);
                    }
                }
            }
            ExprKind::Placeholder { content: sub, .. }
            | ExprKind::UnextractedMessage(sub)
            | ExprKind::NoMessage(sub)
            | ExprKind::Escape(sub)
            | ExprKind::Example { sub, .. } => visit(sub),
            ExprKind::StringConstant(_)
            | ExprKind::BooleanConstant(_)
            | ExprKind::PlaceholderStart { .. }
            | ExprKind::PlaceholderEnd
            | ExprKind::Native(_)
            | ExprKind::IsXml
            | ExprKind::Exception { .. }
            | ExprKind::AttrBundleReference(_) => {}
        }
    }
}

fn push_flattened(out: &mut Vec<Expression>, schema: &Option<SchemaRef>, value: Expression) {
    match value.kind {
        ExprKind::Concatenation(values) => {
            for value in values {
                push_flattened(out, schema, value);
            }
        }
        ExprKind::StringConstant(s) => match out.last_mut() {
            Some(Expression {
                kind: ExprKind::StringConstant(prev),
                ..
            }) => prev.push_str(&s),
            _ => out.push(Expression::string(value.meta, schema.clone(), s)),
        },
        kind => out.push(Expression::new(value.meta, value.schema, kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> SourcePosition {
        SourcePosition::new("test.gxp", 1, 1)
    }

    fn text(s: &str) -> Expression {
        Expression::text(pos(), None, s)
    }

    fn native(code: &str) -> Expression {
        Expression::native(NodeMeta::new(pos(), "expr"), code)
    }

    #[test]
    fn test_concat_merges_adjacent_strings() {
        let expr = Expression::concat(pos(), None, vec![text("<"), text("b"), text(">")]);
        assert_eq!(expr.kind, ExprKind::StringConstant("<b>".to_string()));
    }

    #[test]
    fn test_concat_flattens_nested_concatenations() {
        let inner = Expression::concat(pos(), None, vec![native("a"), text("x")]);
        let expr = Expression::concat(pos(), None, vec![text("y"), inner, text("z")]);
        match expr.kind {
            ExprKind::Concatenation(values) => {
                assert_eq!(values.len(), 3);
                assert_eq!(values[0].static_string().as_deref(), Some("y"));
                assert!(matches!(values[1].kind, ExprKind::Native(_)));
                assert_eq!(values[2].static_string().as_deref(), Some("xz"));
            }
            other => panic!("expected concatenation, got {other:?}"),
        }
    }

    #[test]
    fn test_concat_of_nothing_is_empty_string() {
        let expr = Expression::concat(pos(), None, vec![text(""), text("")]);
        assert!(expr.always_empty());
        assert!(matches!(expr.kind, ExprKind::StringConstant(_)));
    }

    #[test]
    fn test_concat_single_value_is_unwrapped() {
        let expr = Expression::concat(pos(), None, vec![text(""), native("a")]);
        assert!(matches!(expr.kind, ExprKind::Native(_)));
    }

    #[test]
    fn test_whitespace_analysis() {
        assert!(text(" \n\t").always_only_whitespace());
        assert!(!text(" \n\t").always_empty());
        assert!(!text("\u{a0}").always_only_whitespace());
        assert!(!native("x").always_only_whitespace());
    }

    #[test]
    fn test_static_string() {
        let expr = Expression::new(
            NodeMeta::new(pos(), "text"),
            None,
            ExprKind::Concatenation(vec![text("a"), text("b")]),
        );
        assert!(expr.has_static_string());
        assert_eq!(expr.static_string().as_deref(), Some("ab"));
        assert_eq!(native("x").static_string(), None);
    }

    #[test]
    fn test_map_children_renormalizes_concatenation() {
        let expr = Expression::new(
            NodeMeta::new(pos(), "text"),
            None,
            ExprKind::Concatenation(vec![native("a"), text("b")]),
        );
        let mapped = expr.map_children(|child| match child.kind {
            ExprKind::Native(_) => text("a"),
            _ => child,
        });
        assert_eq!(mapped.kind, ExprKind::StringConstant("ab".to_string()));
    }
}
