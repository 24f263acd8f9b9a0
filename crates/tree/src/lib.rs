//! The data model every marklet compiler pass reads and writes.
//!
//! Templates are trees of [`Expression`] nodes. A tree is owned, never shared,
//! and never mutated in place: a pass consumes a [`Tree`] of one stage and
//! produces a brand-new [`Tree`] of the next, carrying the accumulated
//! [`AlertSet`](marklet_alerts::AlertSet) forward.
//!
//! Before expressions exist, the parser produces a [`Forest`] of
//! [`ParsedElement`]s, which is where `if`/`elif`/`else` expansion happens.

pub mod call;
pub mod expression;
pub mod meta;
pub mod parsed;
pub mod stage;
pub mod template;

pub use call::{Call, CallTarget, Callable, FormalParameter, Type};
pub use expression::{
    Attribute, Clause, Conditional, ExceptionKind, ExprKind, Expression, NativeExpression,
    OutputElement,
};
pub use meta::NodeMeta;
pub use parsed::{ElementKind, ParsedAttribute, ParsedElement};
pub use stage::{
    ContentFlattened, Forest, I18nChecked, IfExpanded, Parsed, PlaceholderInserted,
    PlaceholderPivoted, SpaceCollapsed, Stage, Tree,
};
pub use template::{Parameter, Root, Template};
