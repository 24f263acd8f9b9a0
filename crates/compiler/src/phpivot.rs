use crate::error::CompileError;
use log::{debug, trace};
use marklet_alerts::{Alert, AlertSetBuilder, AlertSink};
use marklet_schema::SchemaRef;
use marklet_tree::{ContentFlattened, ExprKind, Expression, NodeMeta, PlaceholderPivoted, Tree};

/// Pairs flat placeholder start and end markers into [`ExprKind::Placeholder`]
/// nodes.
///
/// Matching happens among the values of one concatenation at a time. Content
/// after a start marker that is never closed is dropped along with the
/// marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderPivoter;

impl PlaceholderPivoter {
    pub fn apply(&self, tree: Tree<ContentFlattened>) -> Result<Tree<PlaceholderPivoted>, CompileError> {
        let (position, alerts, root) = tree.into_parts();
        let mut builder = AlertSetBuilder::from_set(&alerts);
        debug!("placeholder pivoting: {}", position);
        let root = root.try_map_expressions(|expr| pivot(expr, &mut builder))?;
        Ok(Tree::new(position, builder.build_and_clear(), root))
    }
}

fn empty(meta: NodeMeta, schema: Option<SchemaRef>) -> Expression {
    Expression::string(meta, schema, "")
}

fn pivot(expr: Expression, sink: &mut dyn AlertSink) -> Result<Expression, CompileError> {
    let Expression { meta, schema, kind } = expr;
    match kind {
        ExprKind::Concatenation(values) => pivot_concatenation(meta, schema, values, sink),
        ExprKind::PlaceholderStart { .. } => {
            sink.add(Alert::bad_node_placement(
                meta.position.clone(),
                meta.display_name(),
                None,
            ));
            Ok(empty(meta, schema))
        }
        ExprKind::PlaceholderEnd => {
            sink.add(Alert::eph_missing_ph(meta.position.clone(), meta.display_name()));
            Ok(empty(meta, schema))
        }
        ExprKind::OutputElement(_) => Err(CompileError::unexpected_node(
            &meta.position,
            meta.display_name(),
            "placeholder pivoting",
        )),
        kind @ (ExprKind::StringConstant(_)
        | ExprKind::BooleanConstant(_)
        | ExprKind::Conditional(_)
        | ExprKind::Placeholder { .. }
        | ExprKind::Native(_)
        | ExprKind::UnextractedMessage(_)
        | ExprKind::NoMessage(_)
        | ExprKind::Example { .. }
        | ExprKind::Escape(_)
        | ExprKind::IsXml
        | ExprKind::Exception { .. }
        | ExprKind::AttrBundleReference(_)
        | ExprKind::Call(_)) => {
            Expression::new(meta, schema, kind).try_map_children(&mut |child| pivot(child, &mut *sink))
        }
    }
}

struct OpenPlaceholder {
    meta: NodeMeta,
    schema: Option<SchemaRef>,
    name: String,
    example: Option<String>,
    children: Vec<Expression>,
}

fn pivot_concatenation(
    meta: NodeMeta,
    schema: Option<SchemaRef>,
    values: Vec<Expression>,
    sink: &mut dyn AlertSink,
) -> Result<Expression, CompileError> {
    let mut out = Vec::with_capacity(values.len());
    let mut open: Option<OpenPlaceholder> = None;

    for value in values {
        let Expression {
            meta: value_meta,
            schema: value_schema,
            kind,
        } = value;
        match kind {
            ExprKind::PlaceholderStart { name, example } => match &open {
                None => {
                    trace!("{}: open placeholder {}", value_meta.position, name);
                    open = Some(OpenPlaceholder {
                        meta: value_meta,
                        schema: value_schema,
                        name,
                        example,
                        children: Vec::new(),
                    });
                }
                Some(current) => sink.add(Alert::bad_node_placement(
                    value_meta.position.clone(),
                    value_meta.display_name(),
                    Some(current.meta.display_name()),
                )),
            },
            ExprKind::PlaceholderEnd => match open.take() {
                None => sink.add(Alert::eph_missing_ph(
                    value_meta.position.clone(),
                    value_meta.display_name(),
                )),
                Some(placeholder) => out.extend(close(placeholder, &schema, sink)),
            },
            ExprKind::Concatenation(_) => {
                return Err(CompileError::NestedConcatenation {
                    position: value_meta.position,
                });
            }
            kind @ (ExprKind::StringConstant(_)
            | ExprKind::BooleanConstant(_)
            | ExprKind::Conditional(_)
            | ExprKind::OutputElement(_)
            | ExprKind::Placeholder { .. }
            | ExprKind::Native(_)
            | ExprKind::UnextractedMessage(_)
            | ExprKind::NoMessage(_)
            | ExprKind::Example { .. }
            | ExprKind::Escape(_)
            | ExprKind::IsXml
            | ExprKind::Exception { .. }
            | ExprKind::AttrBundleReference(_)
            | ExprKind::Call(_)) => {
                let child = pivot(Expression::new(value_meta, value_schema, kind), sink)?;
                match &mut open {
                    Some(placeholder) => placeholder.children.push(child),
                    None => out.push(child),
                }
            }
        }
    }

    if let Some(placeholder) = open {
        trace!("{}: placeholder {} never closed", placeholder.meta.position, placeholder.name);
        sink.add(Alert::ph_missing_eph(
            placeholder.meta.position.clone(),
            placeholder.meta.display_name(),
        ));
    }

    Ok(Expression::concat(meta.position, schema, out))
}

fn close(
    placeholder: OpenPlaceholder,
    concat_schema: &Option<SchemaRef>,
    sink: &mut dyn AlertSink,
) -> Option<Expression> {
    let OpenPlaceholder {
        meta,
        schema,
        name,
        example,
        children,
    } = placeholder;
    let content = Expression::concat(meta.position.clone(), concat_schema.clone(), children);
    if content.always_empty() {
        sink.add(Alert::empty_placeholder(meta.position.clone(), meta.display_name()));
        return None;
    }

    let example = match example.or_else(|| derive_example(&content)) {
        Some(example) => example,
        None => {
            sink.add(Alert::placeholder_requires_example(
                meta.position.clone(),
                meta.display_name(),
            ));
            format!("<var>{name}</var>")
        }
    };
    trace!("{}: closed placeholder {} (example {:?})", meta.position, name, example);
    Some(Expression::new(
        meta,
        schema,
        ExprKind::Placeholder {
            name,
            example,
            content: Box::new(content),
        },
    ))
}

/// Statically interprets `expr` as the text a translator should see.
fn derive_example(expr: &Expression) -> Option<String> {
    match &expr.kind {
        ExprKind::Escape(sub) | ExprKind::NoMessage(sub) => derive_example(sub),
        ExprKind::Native(native) => native.example.clone(),
        ExprKind::Concatenation(values) => values.iter().map(derive_example).collect(),
        ExprKind::Conditional(cond) => match cond.clauses.as_slice() {
            [only] if only.predicate.always_equal_to_xml_enabled() => derive_example(&cond.else_value),
            _ => None,
        },
        ExprKind::Example { example, .. } => Some(example.clone()),
        ExprKind::StringConstant(_)
        | ExprKind::BooleanConstant(_)
        | ExprKind::OutputElement(_)
        | ExprKind::PlaceholderStart { .. }
        | ExprKind::PlaceholderEnd
        | ExprKind::Placeholder { .. }
        | ExprKind::UnextractedMessage(_)
        | ExprKind::IsXml
        | ExprKind::Exception { .. }
        | ExprKind::AttrBundleReference(_)
        | ExprKind::Call(_) => {
            if expr.has_static_string() {
                expr.static_string()
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alert_codes, content_of, meta, native, pos, template_tree, text};
    use marklet_alerts::AlertCode;
    use marklet_schema::builtin;
    use marklet_tree::NativeExpression;

    fn start(name: &str, line: u32) -> Expression {
        Expression::placeholder_start(NodeMeta::new(pos(line), format!("ph {name}")), None, name, None)
    }

    fn end(line: u32) -> Expression {
        Expression::placeholder_end(NodeMeta::new(pos(line), "eph"), None)
    }

    /// Builds a raw concatenation without normalizing it.
    fn raw(values: Vec<Expression>) -> Expression {
        Expression::new(meta("concat"), Some(builtin::html()), ExprKind::Concatenation(values))
    }

    fn run(content: Expression) -> Result<Tree<PlaceholderPivoted>, CompileError> {
        let _ = env_logger::builder().is_test(true).try_init();
        PlaceholderPivoter.apply(template_tree(content))
    }

    fn placeholders(expr: &Expression) -> Vec<(String, String)> {
        expr.clone()
            .separate()
            .into_iter()
            .filter_map(|value| match value.kind {
                ExprKind::Placeholder { name, example, .. } => Some((name, example)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_matched_pair_becomes_placeholder() {
        let tree = run(raw(vec![text("Hi "), start("NAME", 2), text("Bob"), end(3), text("!")])).unwrap();
        assert!(tree.alerts().is_empty());
        let content = content_of(&tree);
        assert_eq!(placeholders(content), vec![("NAME".to_string(), "Bob".to_string())]);
        let ExprKind::Concatenation(values) = &content.kind else {
            panic!("expected concatenation");
        };
        let ExprKind::Placeholder { content: inner, .. } = &values[1].kind else {
            panic!("expected placeholder");
        };
        assert_eq!(inner.static_string().as_deref(), Some("Bob"));
    }

    #[test]
    fn test_end_without_start() {
        let tree = run(raw(vec![text("a"), end(2), text("b")])).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::EphMissingPh]);
        assert!(placeholders(content_of(&tree)).is_empty());
        assert_eq!(content_of(&tree).static_string().as_deref(), Some("ab"));
    }

    #[test]
    fn test_start_without_end_loses_following_content() {
        let tree = run(raw(vec![text("kept"), start("X", 2), text("lost"), native("y")])).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::PhMissingEph]);
        assert_eq!(content_of(&tree).kind, ExprKind::StringConstant("kept".to_string()));
    }

    #[test]
    fn test_second_start_is_dropped() {
        let tree = run(raw(vec![start("A", 2), text("x"), start("B", 3), text("y"), end(4)])).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::BadNodePlacement]);
        assert_eq!(
            tree.alerts().iter().next().unwrap().message(),
            "ph B not allowed inside ph A"
        );
        assert_eq!(placeholders(content_of(&tree)), vec![("A".to_string(), "xy".to_string())]);
    }

    #[test]
    fn test_empty_placeholder_is_dropped() {
        let tree = run(raw(vec![text("a"), start("E", 2), end(3)])).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::EmptyPlaceholder]);
        assert_eq!(content_of(&tree).static_string().as_deref(), Some("a"));
    }

    #[test]
    fn test_dynamic_content_without_example_gets_fallback() {
        let tree = run(raw(vec![start("USER", 2), native("user"), end(3)])).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::PlaceholderRequiresExample]);
        assert_eq!(
            placeholders(content_of(&tree)),
            vec![("USER".to_string(), "<var>USER</var>".to_string())]
        );
    }

    #[test]
    fn test_example_from_native_and_declared_example() {
        let native_with_example = Expression::new(
            meta("expr"),
            None,
            ExprKind::Native(NativeExpression {
                code: "user".to_string(),
                example: Some("Alice".to_string()),
                ph_name: None,
            }),
        );
        let declared = Expression::placeholder_start(meta("ph"), None, "D", Some("declared".to_string()));
        let tree = run(raw(vec![
            start("N", 2),
            native_with_example,
            end(3),
            declared,
            native("other"),
            end(5),
        ]))
        .unwrap();
        assert!(tree.alerts().is_empty());
        assert_eq!(
            placeholders(content_of(&tree)),
            vec![
                ("N".to_string(), "Alice".to_string()),
                ("D".to_string(), "declared".to_string())
            ]
        );
    }

    #[test]
    fn test_xml_conditional_uses_sgml_branch_for_example() {
        let cond = Expression::conditional(
            meta("cond"),
            None,
            Expression::is_xml(meta("xml"), None),
            text(" /"),
            text(""),
        );
        let tree = run(raw(vec![start("BR", 2), text("<br"), cond, text(">"), end(3)])).unwrap();
        assert_eq!(
            placeholders(content_of(&tree)),
            vec![("BR".to_string(), "<br>".to_string())]
        );
    }

    #[test]
    fn test_marker_outside_concatenation() {
        let tree = run(end(2)).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::EphMissingPh]);
        assert!(content_of(&tree).always_empty());

        let tree = run(start("X", 2)).unwrap();
        assert_eq!(alert_codes(tree.alerts()), vec![AlertCode::BadNodePlacement]);
    }

    #[test]
    fn test_nested_concatenation_is_fatal() {
        let nested = raw(vec![text("a"), raw(vec![native("x"), text("b")])]);
        let err = run(nested).unwrap_err();
        assert!(matches!(err, CompileError::NestedConcatenation { .. }));
    }

    #[test]
    fn test_unflattened_element_is_fatal() {
        let el = crate::test_support::element_expr(crate::test_support::html_element("b", text("x")));
        assert!(matches!(run(el), Err(CompileError::UnexpectedNode { .. })));
    }
}
