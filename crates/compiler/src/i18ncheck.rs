use crate::error::CompileError;
use log::debug;
use marklet_alerts::{Alert, AlertSetBuilder, AlertSink};
use marklet_schema::{AttributeFlag, ElementFlag};
use marklet_tree::{
    Attribute, CallTarget, ExprKind, Expression, I18nChecked, PlaceholderPivoted, Root,
    SpaceCollapsed, Template, Tree,
};
use regex::Regex;
use std::sync::LazyLock;

// \xA0 is the no-break space.
static LOCALE_INDEPENDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t\n\x0B\x0C\r\xA0]*$").expect("BUG: invalid LOCALE_INDEPENDENT_RE regex literal")
});

/// True if `text` never needs translating.
pub fn is_locale_independent(text: &str) -> bool {
    LOCALE_INDEPENDENT_RE.is_match(text)
}

/// Reports visible literal text that sits outside any message.
///
/// The check walks the space-collapsed tree, where user-written messages and
/// placeholders are still in their original shape, and attaches its alerts to
/// the pivoted tree, which it passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct I18nChecker;

impl I18nChecker {
    pub fn apply(
        &self,
        collapsed: &Tree<SpaceCollapsed>,
        pivoted: Tree<PlaceholderPivoted>,
    ) -> Result<Tree<I18nChecked>, CompileError> {
        let (position, alerts, root) = pivoted.into_parts();
        let mut builder = AlertSetBuilder::from_set(&alerts);
        let before = builder.len();
        match collapsed.root() {
            Root::Template(template) => check_template(template, &mut builder)?,
            Root::Null(_) => {}
        }
        debug!("i18n check: {} unextractable fragments", builder.len() - before);
        Ok(Tree::new(position, builder.build_and_clear(), root))
    }
}

/// What the walk knows about the current position.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    visible: bool,
    inside_msg: bool,
    inside_ph: bool,
    inside_no_msg: bool,
}

impl Scope {
    fn top(visible: bool) -> Self {
        Scope {
            visible,
            ..Scope::default()
        }
    }

    fn alerts_enabled(self) -> bool {
        self.visible && (!self.inside_msg || self.inside_ph) && !self.inside_no_msg
    }

    /// Attributes are never inside the surrounding message.
    fn attribute(self, visible: bool) -> Self {
        Scope {
            visible,
            inside_msg: false,
            ..self
        }
    }
}

fn check_template(template: &Template, sink: &mut dyn AlertSink) -> Result<(), CompileError> {
    for param in &template.parameters {
        if let Some(default) = &param.default_value {
            check(default, Scope::top(param.ty.is_visible()), sink)?;
        }
    }
    check(&template.content, Scope::top(template.schema.is_visible()), sink)
}

fn check_attribute(attr: &Attribute, scope: Scope, sink: &mut dyn AlertSink) -> Result<(), CompileError> {
    check(&attr.value, scope, sink)?;
    if let Some(condition) = &attr.condition {
        check(condition, scope, sink)?;
    }
    Ok(())
}

fn check(expr: &Expression, scope: Scope, sink: &mut dyn AlertSink) -> Result<(), CompileError> {
    match &expr.kind {
        ExprKind::StringConstant(value) => {
            if scope.alerts_enabled() && !is_locale_independent(value) {
                sink.add(Alert::unextractable_content(
                    expr.position().clone(),
                    expr.display_name(),
                ));
            }
        }
        ExprKind::Concatenation(values) => {
            // Placeholder markers are flat siblings here; they switch the
            // state of the values between them.
            let mut current = scope;
            for value in values {
                match &value.kind {
                    ExprKind::PlaceholderStart { .. } => current.inside_ph = true,
                    ExprKind::PlaceholderEnd => current.inside_ph = scope.inside_ph,
                    _ => check(value, current, sink)?,
                }
            }
        }
        ExprKind::Conditional(cond) => {
            for clause in &cond.clauses {
                check(&clause.value, scope, sink)?;
            }
            check(&cond.else_value, scope, sink)?;
        }
        ExprKind::OutputElement(element) => {
            for attr in &element.attributes {
                let visible = element
                    .validator
                    .attribute_flag(&attr.name, AttributeFlag::VisibleText);
                check_attribute(attr, scope.attribute(visible), sink)?;
            }
            let content = Scope {
                visible: scope.visible && !element.validator.is_flag_set(ElementFlag::InvisibleBody),
                ..scope
            };
            check(&element.content, content, sink)?;
        }
        ExprKind::Placeholder { content, .. } => {
            check(
                content,
                Scope {
                    inside_ph: true,
                    ..scope
                },
                sink,
            )?;
        }
        ExprKind::UnextractedMessage(sub) => {
            check(
                sub,
                Scope {
                    inside_msg: true,
                    inside_ph: false,
                    ..scope
                },
                sink,
            )?;
        }
        ExprKind::NoMessage(sub) => {
            check(
                sub,
                Scope {
                    inside_no_msg: true,
                    ..scope
                },
                sink,
            )?;
        }
        ExprKind::Example { sub, .. } | ExprKind::Escape(sub) => check(sub, scope, sink)?,
        ExprKind::Call(call) => match &call.target {
            CallTarget::Unbound(name) => {
                return Err(CompileError::UnboundCall {
                    position: expr.position().clone(),
                    callee: name.clone(),
                });
            }
            CallTarget::Bound(callee) | CallTarget::Validated(callee) => {
                for attr in &call.attributes {
                    let visible = callee
                        .parameter(&attr.name)
                        .is_none_or(|param| param.ty.is_visible());
                    check_attribute(attr, scope.attribute(visible), sink)?;
                }
            }
        },
        ExprKind::BooleanConstant(_)
        | ExprKind::PlaceholderStart { .. }
        | ExprKind::PlaceholderEnd
        | ExprKind::Native(_)
        | ExprKind::IsXml
        | ExprKind::Exception { .. }
        | ExprKind::AttrBundleReference(_) => {}
    }
    Ok(())
}
