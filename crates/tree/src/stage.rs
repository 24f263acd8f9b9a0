use crate::parsed::ParsedElement;
use crate::template::Root;
use marklet_alerts::AlertSet;
use marklet_types::SourcePosition;
use std::fmt;
use std::marker::PhantomData;

/// Marks which pass produced a tree, so passes can only run in order.
pub trait Stage: fmt::Debug + Clone + Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! define_stage {
    ($($(#[$doc:meta])* $name:ident => $label:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name;

            impl Stage for $name {
                const NAME: &'static str = $label;
            }
        )*
    };
}

define_stage! {
    Parsed => "parsed";
    IfExpanded => "if-expanded";
    /// Whitespace has been normalized; the input to placeholder insertion.
    SpaceCollapsed => "space-collapsed";
    PlaceholderInserted => "placeholder-inserted";
    ContentFlattened => "content-flattened";
    PlaceholderPivoted => "placeholder-pivoted";
    I18nChecked => "i18n-checked";
}

/// An expression tree at a given stage, with the alerts found so far.
#[derive(Debug, Clone)]
pub struct Tree<S: Stage> {
    position: SourcePosition,
    alerts: AlertSet,
    root: Root,
    _stage: PhantomData<S>,
}

impl<S: Stage> Tree<S> {
    pub fn new(position: SourcePosition, alerts: AlertSet, root: Root) -> Self {
        Self {
            position,
            alerts,
            root,
            _stage: PhantomData,
        }
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    pub fn alerts(&self) -> &AlertSet {
        &self.alerts
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn stage_name(&self) -> &'static str {
        S::NAME
    }

    pub fn into_parts(self) -> (SourcePosition, AlertSet, Root) {
        (self.position, self.alerts, self.root)
    }
}

/// The parse-level tree: a list of top-level elements.
#[derive(Debug, Clone)]
pub struct Forest<S: Stage> {
    position: SourcePosition,
    alerts: AlertSet,
    children: Vec<ParsedElement>,
    _stage: PhantomData<S>,
}

impl<S: Stage> Forest<S> {
    pub fn new(position: SourcePosition, alerts: AlertSet, children: Vec<ParsedElement>) -> Self {
        Self {
            position,
            alerts,
            children,
            _stage: PhantomData,
        }
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    pub fn alerts(&self) -> &AlertSet {
        &self.alerts
    }

    pub fn children(&self) -> &[ParsedElement] {
        &self.children
    }

    pub fn into_parts(self) -> (SourcePosition, AlertSet, Vec<ParsedElement>) {
        (self.position, self.alerts, self.children)
    }
}
