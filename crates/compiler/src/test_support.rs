//! Helpers for testing passes: tree fixtures and a reference renderer for
//! lowered trees.

use marklet_alerts::{AlertCode, AlertSet};
use marklet_schema::{SchemaRef, builtin};
use marklet_tree::{
    ExceptionKind, ExprKind, Expression, NodeMeta, OutputElement, Root, Stage, Template, Tree,
};
use marklet_types::SourcePosition;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("render failed with {kind:?}: {message}")]
    Exception { kind: ExceptionKind, message: String },

    #[error("{0} should have been lowered before rendering")]
    Unlowered(String),

    #[error("predicate {0} cannot be evaluated statically")]
    DynamicPredicate(String),
}

/// Output syntax chosen at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Xml,
    Sgml,
}

/// Renders a lowered expression the way generated code would.
///
/// Native code renders as `{code}` and attribute bundles as `{bundle:name}`.
pub fn render(expr: &Expression, syntax: Syntax) -> Result<String, RenderError> {
    let mut out = String::new();
    render_into(expr, syntax, &mut out)?;
    Ok(out)
}

fn render_into(expr: &Expression, syntax: Syntax, out: &mut String) -> Result<(), RenderError> {
    match &expr.kind {
        ExprKind::StringConstant(value) => out.push_str(value),
        ExprKind::BooleanConstant(value) => out.push_str(if *value { "true" } else { "false" }),
        ExprKind::Concatenation(values) => {
            for value in values {
                render_into(value, syntax, out)?;
            }
        }
        ExprKind::Conditional(cond) => {
            for clause in &cond.clauses {
                if evaluate(&clause.predicate, syntax)? {
                    return render_into(&clause.value, syntax, out);
                }
            }
            render_into(&cond.else_value, syntax, out)?;
        }
        ExprKind::Native(native) => {
            out.push('{');
            out.push_str(&native.code);
            out.push('}');
        }
        ExprKind::AttrBundleReference(name) => {
            out.push_str("{bundle:");
            out.push_str(name);
            out.push('}');
        }
        ExprKind::Exception { kind, message } => {
            return Err(RenderError::Exception {
                kind: *kind,
                message: message.clone(),
            });
        }
        ExprKind::Placeholder { content: sub, .. }
        | ExprKind::UnextractedMessage(sub)
        | ExprKind::NoMessage(sub)
        | ExprKind::Escape(sub)
        | ExprKind::Example { sub, .. } => render_into(sub, syntax, out)?,
        ExprKind::IsXml => out.push_str(if syntax == Syntax::Xml { "true" } else { "false" }),
        ExprKind::OutputElement(_)
        | ExprKind::PlaceholderStart { .. }
        | ExprKind::PlaceholderEnd
        | ExprKind::Call(_) => return Err(RenderError::Unlowered(expr.display_name().to_string())),
    }
    Ok(())
}

fn evaluate(predicate: &Expression, syntax: Syntax) -> Result<bool, RenderError> {
    match &predicate.kind {
        ExprKind::IsXml => Ok(syntax == Syntax::Xml),
        ExprKind::BooleanConstant(value) => Ok(*value),
        _ => Err(RenderError::DynamicPredicate(predicate.display_name().to_string())),
    }
}

pub fn pos(line: u32) -> SourcePosition {
    SourcePosition::new("test.gxp", line, 1)
}

pub fn meta(name: &str) -> NodeMeta {
    NodeMeta::new(pos(1), name)
}

pub fn html() -> SchemaRef {
    builtin::html()
}

pub fn text(value: &str) -> Expression {
    Expression::text(pos(1), Some(html()), value)
}

pub fn native(code: &str) -> Expression {
    Expression::native(meta("expr"), code)
}

pub fn concat(values: Vec<Expression>) -> Expression {
    Expression::concat(pos(1), Some(html()), values)
}

/// An HTML element from the builtin schema.
///
/// Panics if `tag` is not part of the builtin HTML schema.
pub fn html_element(tag: &str, content: Expression) -> OutputElement {
    OutputElement::from_schema(&html(), tag, content)
        .unwrap_or_else(|| panic!("no <{tag}> in builtin html schema"))
}

pub fn element_expr(element: OutputElement) -> Expression {
    let name = element.local_name.clone();
    Expression::element(meta(&name), html(), element)
}

/// Wraps `content` in a template named `test.Main`.
pub fn template_tree<S: Stage>(content: Expression) -> Tree<S> {
    let template = Template::new(meta("template"), "test.Main", html(), content);
    Tree::new(pos(1), AlertSet::empty(), Root::Template(template))
}

pub fn content_of<S: Stage>(tree: &Tree<S>) -> &Expression {
    match tree.root() {
        Root::Template(template) => &template.content,
        Root::Null(_) => panic!("tree has no template"),
    }
}

pub fn alert_codes(alerts: &AlertSet) -> Vec<AlertCode> {
    alerts.iter().map(|alert| alert.code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_picks_branch_by_syntax() {
        let expr = Expression::conditional(
            meta("if"),
            None,
            Expression::is_xml(meta("xml"), None),
            text(" /"),
            text(""),
        );
        assert_eq!(render(&expr, Syntax::Xml).unwrap(), " /");
        assert_eq!(render(&expr, Syntax::Sgml).unwrap(), "");
    }

    #[test]
    fn test_render_rejects_unlowered_nodes() {
        let expr = element_expr(html_element("b", text("x")));
        assert!(matches!(render(&expr, Syntax::Xml), Err(RenderError::Unlowered(_))));
    }
}
