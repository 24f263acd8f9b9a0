use marklet_types::SourcePosition;
use std::sync::Arc;

/// Where a node came from and what to call it in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeMeta {
    pub position: SourcePosition,
    pub display_name: Arc<str>,
}

impl NodeMeta {
    pub fn new(position: SourcePosition, display_name: impl Into<Arc<str>>) -> Self {
        Self {
            position,
            display_name: display_name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
