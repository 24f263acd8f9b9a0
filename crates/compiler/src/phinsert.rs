use log::debug;
use marklet_tree::{
    Attribute, ExprKind, Expression, NativeExpression, NodeMeta, OutputElement, PlaceholderInserted,
    SpaceCollapsed, Tree,
};
use marklet_schema::SchemaRef;

/// Brackets every node that carries a placeholder name with start and end
/// markers.
///
/// A native expression, or an element whose content is only whitespace,
/// becomes `start(name)`, the node, `end`. Any other element is split so
/// translators see the open tag, the text and the close tag separately:
/// `start(name_start)`, the element with content `end`, content,
/// `start(name_end)`, and a final `end`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderInserter;

impl PlaceholderInserter {
    pub fn apply(&self, tree: Tree<SpaceCollapsed>) -> Tree<PlaceholderInserted> {
        let (position, alerts, root) = tree.into_parts();
        debug!("placeholder insertion: {}", position);
        Tree::new(position, alerts, root.map_expressions(insert))
    }
}

fn insert(expr: Expression) -> Expression {
    let Expression { meta, schema, kind } = expr;
    match kind {
        ExprKind::Native(native) => match native.ph_name.clone() {
            Some(name) => wrap_native(meta, schema, native, name),
            None => Expression::new(meta, schema, ExprKind::Native(native)),
        },
        ExprKind::OutputElement(element) => match element.ph_name.clone() {
            Some(name) => wrap_element(meta, schema, element, name),
            None => Expression::new(meta, schema, ExprKind::OutputElement(element)).map_children(insert),
        },
        kind @ (ExprKind::StringConstant(_)
        | ExprKind::BooleanConstant(_)
        | ExprKind::Concatenation(_)
        | ExprKind::Conditional(_)
        | ExprKind::PlaceholderStart { .. }
        | ExprKind::PlaceholderEnd
        | ExprKind::Placeholder { .. }
        | ExprKind::UnextractedMessage(_)
        | ExprKind::NoMessage(_)
        | ExprKind::Example { .. }
        | ExprKind::Escape(_)
        | ExprKind::IsXml
        | ExprKind::Exception { .. }
        | ExprKind::AttrBundleReference(_)
        | ExprKind::Call(_)) => Expression::new(meta, schema, kind).map_children(insert),
    }
}

fn wrap_native(
    meta: NodeMeta,
    schema: Option<SchemaRef>,
    native: NativeExpression,
    name: String,
) -> Expression {
    let position = meta.position.clone();
    let start = Expression::placeholder_start(meta.clone(), schema.clone(), name, None);
    let end = Expression::placeholder_end(meta.clone(), schema.clone());
    let native = Expression::new(meta, schema.clone(), ExprKind::Native(native));
    Expression::concat(position, schema, [start, native, end])
}

fn wrap_element(
    meta: NodeMeta,
    schema: Option<SchemaRef>,
    element: OutputElement,
    name: String,
) -> Expression {
    let position = meta.position.clone();
    let start = |name: String| Expression::placeholder_start(meta.clone(), schema.clone(), name, None);
    let end = || Expression::placeholder_end(meta.clone(), schema.clone());

    let mut element = OutputElement {
        ph_name: None,
        ..element
    };

    if element.content.always_only_whitespace() {
        let wrapped = Expression::new(meta.clone(), schema.clone(), ExprKind::OutputElement(element));
        return Expression::concat(position, schema.clone(), [start(name), wrapped, end()]);
    }

    let content = std::mem::replace(
        &mut element.content,
        Box::new(Expression::text(position.clone(), None, "")),
    );
    element.content = Box::new(Expression::concat(
        position.clone(),
        None,
        [end(), insert(*content), start(format!("{name}_end"))],
    ));
    element.attributes = std::mem::take(&mut element.attributes)
        .into_iter()
        .map(insert_attribute)
        .collect();

    let split = Expression::new(meta.clone(), schema.clone(), ExprKind::OutputElement(element));
    Expression::concat(
        position,
        schema.clone(),
        [start(format!("{name}_start")), split, end()],
    )
}

fn insert_attribute(attr: Attribute) -> Attribute {
    Attribute {
        value: insert(attr.value),
        condition: attr.condition.map(insert),
        ..attr
    }
}
