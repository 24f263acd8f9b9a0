use log::debug;
use marklet_schema::{AttributeFlag, DocType, ElementFlag, SchemaRef};
use marklet_tree::{
    Attribute, ContentFlattened, ExceptionKind, ExprKind, Expression, NodeMeta, OutputElement,
    PlaceholderInserted, Tree,
};
use quick_xml::escape::escape;

/// Lowers every [`OutputElement`] into literal text fragments.
///
/// The result of flattening an element is a single concatenation that
/// renders byte-exact markup in both XML and SGML syntax. Differences between
/// the two are expressed as conditionals on [`ExprKind::IsXml`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentFlattener;

impl ContentFlattener {
    pub fn apply(&self, tree: Tree<PlaceholderInserted>) -> Tree<ContentFlattened> {
        let (position, alerts, root) = tree.into_parts();
        debug!("content flattening: {}", position);
        Tree::new(position, alerts, root.map_expressions(flatten))
    }
}

fn flatten(expr: Expression) -> Expression {
    let Expression { meta, schema, kind } = expr;
    match kind {
        ExprKind::OutputElement(element) => flatten_element(meta, schema, element),
        kind @ (ExprKind::StringConstant(_)
        | ExprKind::BooleanConstant(_)
        | ExprKind::Concatenation(_)
        | ExprKind::Conditional(_)
        | ExprKind::PlaceholderStart { .. }
        | ExprKind::PlaceholderEnd
        | ExprKind::Placeholder { .. }
        | ExprKind::Native(_)
        | ExprKind::UnextractedMessage(_)
        | ExprKind::NoMessage(_)
        | ExprKind::Example { .. }
        | ExprKind::Escape(_)
        | ExprKind::IsXml
        | ExprKind::Exception { .. }
        | ExprKind::AttrBundleReference(_)
        | ExprKind::Call(_)) => Expression::new(meta, schema, kind).map_children(flatten),
    }
}

/// Builds fragments that share one node's position and schema.
struct Fragments<'a> {
    meta: &'a NodeMeta,
    schema: &'a Option<SchemaRef>,
}

impl Fragments<'_> {
    fn text(&self, value: impl Into<String>) -> Expression {
        Expression::string(self.meta.clone(), self.schema.clone(), value)
    }

    fn empty(&self) -> Expression {
        self.text("")
    }

    fn is_xml(&self) -> Expression {
        Expression::is_xml(self.meta.clone(), self.schema.clone())
    }

    fn when(&self, predicate: Expression, then: Expression) -> Expression {
        Expression::conditional(self.meta.clone(), self.schema.clone(), predicate, then, self.empty())
    }

    fn xml_or(&self, xml: Expression, sgml: Expression) -> Expression {
        Expression::conditional(self.meta.clone(), self.schema.clone(), self.is_xml(), xml, sgml)
    }

    fn concat(&self, values: impl IntoIterator<Item = Expression>) -> Expression {
        Expression::concat(self.meta.position.clone(), self.schema.clone(), values)
    }

    fn wrap(&self, kind: ExprKind) -> Expression {
        Expression::new(self.meta.clone(), self.schema.clone(), kind)
    }
}

fn flatten_element(meta: NodeMeta, schema: Option<SchemaRef>, element: OutputElement) -> Expression {
    let frag = Fragments {
        meta: &meta,
        schema: &schema,
    };
    let OutputElement {
        local_name,
        tag_prefix,
        validator,
        attributes,
        bundles,
        content,
        ph_name: _,
        doc_type,
    } = element;

    let mut values = Vec::new();
    if let Some(doc_type) = &doc_type {
        values.push(flatten_doc_type(&frag, &local_name, doc_type));
    }
    values.push(frag.text("<"));
    if let Some(prefix) = &tag_prefix {
        values.push(frag.text(format!("{prefix}:")));
    }
    values.push(frag.text(local_name.as_str()));
    if doc_type.is_some() {
        values.push(flatten_xmlns(&frag, tag_prefix.as_deref()));
    }

    for attr in attributes {
        let attr_validator = validator.attribute(&attr.name);
        let rendered = if attr_validator.is_some_and(|v| v.is_flag_set(AttributeFlag::Boolean)) {
            flatten_boolean_attribute(&schema, attr)
        } else {
            let example = attr_validator.and_then(|v| v.example.clone());
            Some(flatten_attribute(&schema, attr, example))
        };
        values.extend(rendered);
    }

    for bundle in bundles {
        let reference = frag.wrap(ExprKind::AttrBundleReference(bundle));
        values.push(frag.wrap(ExprKind::Escape(Box::new(reference))));
    }

    let no_end_tag = validator.is_flag_set(ElementFlag::NoEndTag);
    if no_end_tag {
        values.push(frag.xml_or(frag.text(" /"), frag.empty()));
    }
    values.push(frag.text(">"));
    values.push(flatten(*content));
    if !no_end_tag {
        values.push(frag.text("</"));
        if let Some(prefix) = &tag_prefix {
            values.push(frag.text(format!("{prefix}:")));
        }
        values.push(frag.text(format!("{local_name}>")));
    }

    frag.concat(values)
}

fn flatten_doc_type(frag: &Fragments<'_>, root: &str, doc_type: &DocType) -> Expression {
    let xml = frag.text(doc_type.to_xml(root));
    let sgml = match doc_type.to_sgml(root) {
        Some(sgml) => frag.text(sgml),
        None => frag.wrap(ExprKind::Exception {
            kind: ExceptionKind::NotSupportedInSgmlMode,
            message: format!("Doctype '{}' incompatible with non-XML syntax", doc_type.name),
        }),
    };
    frag.xml_or(xml, sgml)
}

fn flatten_xmlns(frag: &Fragments<'_>, tag_prefix: Option<&str>) -> Expression {
    let namespace = frag
        .schema
        .as_ref()
        .map(|schema| schema.namespace_uri.as_str())
        .unwrap_or_default();
    let mut values = vec![frag.text(" xmlns")];
    if let Some(prefix) = tag_prefix {
        values.push(frag.text(":"));
        values.push(frag.text(prefix));
    }
    values.push(frag.text("=\""));
    values.push(frag.text(escape(namespace)));
    values.push(frag.text("\""));
    frag.when(frag.is_xml(), frag.concat(values))
}

/// `name` in SGML syntax, `name="name"` in XML syntax.
fn boolean_attribute_text(frag: &Fragments<'_>, name: &str) -> Expression {
    frag.concat([
        frag.text(format!(" {name}")),
        frag.xml_or(frag.text(format!("=\"{name}\"")), frag.empty()),
    ])
}

fn flatten_boolean_attribute(schema: &Option<SchemaRef>, attr: Attribute) -> Option<Expression> {
    let frag = Fragments {
        meta: &attr.meta,
        schema,
    };
    let value = flatten(attr.value);
    let rendered = boolean_attribute_text(&frag, &attr.name);
    let gated = if value.always_equals(false) {
        return None;
    } else if value.always_equals(true) || value.has_static_string() {
        rendered
    } else {
        frag.when(value, rendered)
    };
    Some(match attr.condition {
        Some(condition) => frag.when(flatten(condition), gated),
        None => gated,
    })
}

fn flatten_attribute(schema: &Option<SchemaRef>, attr: Attribute, example: Option<String>) -> Expression {
    let frag = Fragments {
        meta: &attr.meta,
        schema,
    };
    let value = flatten(attr.value);
    let mut hide_from_examples = false;
    let value = if value.has_static_string() {
        value
    } else {
        let value = escaped(value);
        match example {
            Some(example) => {
                let meta = value.meta.clone();
                Expression::new(
                    meta,
                    schema.clone(),
                    ExprKind::Example {
                        sub: Box::new(value),
                        example,
                    },
                )
            }
            None => {
                hide_from_examples = true;
                value
            }
        }
    };

    let mut rendered = frag.concat([frag.text(format!(" {}=\"", attr.name)), value, frag.text("\"")]);
    if hide_from_examples {
        rendered = frag.wrap(ExprKind::Example {
            sub: Box::new(rendered),
            example: String::new(),
        });
    }
    match attr.condition {
        Some(condition) => frag.when(flatten(condition), rendered),
        None => rendered,
    }
}

fn escaped(value: Expression) -> Expression {
    if matches!(value.kind, ExprKind::Escape(_)) {
        return value;
    }
    let meta = value.meta.clone();
    let schema = value.schema.clone();
    Expression::new(meta, schema, ExprKind::Escape(Box::new(value)))
}
