use crate::call::{Callable, FormalParameter, Type};
use crate::expression::{ExprKind, Expression};
use crate::meta::NodeMeta;
use marklet_schema::SchemaRef;
use marklet_types::TemplateName;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub meta: NodeMeta,
    pub name: String,
    pub ty: Type,
    pub default_value: Option<Expression>,
}

impl Parameter {
    pub fn new(meta: NodeMeta, name: impl Into<String>, ty: Type) -> Self {
        Self {
            meta,
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Expression) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A compiled unit: parameters plus a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub meta: NodeMeta,
    pub name: TemplateName,
    pub schema: SchemaRef,
    pub parameters: Vec<Parameter>,
    pub content: Expression,
}

impl Template {
    pub fn new(meta: NodeMeta, name: impl Into<TemplateName>, schema: SchemaRef, content: Expression) -> Self {
        Self {
            meta,
            name: name.into(),
            schema,
            parameters: Vec::new(),
            content,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The signature other templates see when they call this one.
    pub fn callable(&self) -> Callable {
        Callable::new(
            self.name.clone(),
            self.parameters
                .iter()
                .map(|param| {
                    FormalParameter::new(param.name.clone(), param.ty.clone(), param.default_value.is_some())
                })
                .collect(),
        )
    }

    /// Every callee signature referenced by a bound or validated call.
    pub fn requirements(&self) -> HashSet<Arc<Callable>> {
        let mut found = HashSet::new();
        let mut collect = |expr: &Expression| {
            if let ExprKind::Call(call) = &expr.kind {
                if let Some(callable) = call.target.callable() {
                    found.insert(Arc::clone(callable));
                }
            }
        };
        for param in &self.parameters {
            if let Some(default) = &param.default_value {
                collect(default);
                default.for_each_descendant(&mut collect);
            }
        }
        collect(&self.content);
        self.content.for_each_descendant(&mut collect);
        found
    }

    /// Rebuilds the template with `f` applied to each default value and the body.
    pub fn try_map_expressions<E, F>(self, mut f: F) -> Result<Template, E>
    where
        F: FnMut(Expression) -> Result<Expression, E>,
    {
        let parameters = self
            .parameters
            .into_iter()
            .map(|param| -> Result<Parameter, E> {
                Ok(Parameter {
                    default_value: param.default_value.map(&mut f).transpose()?,
                    ..param
                })
            })
            .collect::<Result<_, E>>()?;
        Ok(Template {
            parameters,
            content: f(self.content)?,
            ..self
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Template(Template),
    /// Nothing usable was parsed.
    Null(NodeMeta),
}

impl Root {
    pub fn template(&self) -> Option<&Template> {
        match self {
            Root::Template(template) => Some(template),
            Root::Null(_) => None,
        }
    }

    pub fn try_map_expressions<E, F>(self, f: F) -> Result<Root, E>
    where
        F: FnMut(Expression) -> Result<Expression, E>,
    {
        match self {
            Root::Template(template) => template.try_map_expressions(f).map(Root::Template),
            Root::Null(meta) => Ok(Root::Null(meta)),
        }
    }

    pub fn map_expressions<F>(self, mut f: F) -> Root
    where
        F: FnMut(Expression) -> Expression,
    {
        let result: Result<Root, std::convert::Infallible> = self.try_map_expressions(|e| Ok(f(e)));
        match result {
            Ok(root) => root,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{Call, CallTarget};
    use crate::expression::Attribute;
    use marklet_schema::builtin;
    use marklet_types::SourcePosition;

    fn meta(name: &str) -> NodeMeta {
        NodeMeta::new(SourcePosition::new("t.gxp", 1, 1), name)
    }

    fn call(target: CallTarget) -> Expression {
        Expression::new(meta("call"), None, ExprKind::Call(Call::new(target, Vec::new())))
    }

    #[test]
    fn test_requirements_collects_bound_calls_everywhere() {
        let callee = Arc::new(Callable::new("a.Callee", Vec::new()));
        let other = Arc::new(Callable::new("a.Other", Vec::new()));
        let nested = Expression::new(
            meta("call"),
            None,
            ExprKind::Call(Call::new(
                CallTarget::Validated(Arc::clone(&other)),
                vec![Attribute::new(meta("x"), "x", call(CallTarget::Bound(Arc::clone(&callee))))],
            )),
        );
        let template = Template::new(meta("template"), "a.Main", builtin::html(), nested)
            .with_parameter(
                Parameter::new(meta("p"), "p", Type::Content(builtin::html()))
                    .with_default(call(CallTarget::Bound(Arc::clone(&callee)))),
            );
        let reqs = template.requirements();
        assert_eq!(reqs.len(), 2);
        assert!(reqs.contains(&callee));
        assert!(reqs.contains(&other));
    }

    #[test]
    fn test_unbound_calls_are_not_requirements() {
        let template = Template::new(
            meta("template"),
            "a.Main",
            builtin::html(),
            call(CallTarget::Unbound("a.Missing".into())),
        );
        assert!(template.requirements().is_empty());
    }

    #[test]
    fn test_callable_records_defaults() {
        let template = Template::new(meta("template"), "a.Main", builtin::html(), call(CallTarget::Unbound("x.Y".into())))
            .with_parameter(
                Parameter::new(meta("p"), "p", Type::Boolean).with_default(Expression::boolean(meta("b"), true)),
            );
        let callable = template.callable();
        assert_eq!(callable.name.as_str(), "a.Main");
        assert!(callable.parameters[0].has_default);
    }
}
