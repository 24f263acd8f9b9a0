use marklet_types::{SourcePosition, TemplateName};
use thiserror::Error;

/// An internal inconsistency in the tree. Aborts the unit being compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("{position}: concatenation nested directly inside a concatenation")]
    NestedConcatenation { position: SourcePosition },

    #[error("{position}: call to '{callee}' was never bound")]
    UnboundCall {
        position: SourcePosition,
        callee: TemplateName,
    },

    #[error("{position}: unexpected {node} during {pass}")]
    UnexpectedNode {
        position: SourcePosition,
        node: String,
        pass: &'static str,
    },
}

impl CompileError {
    pub fn unexpected_node(position: &SourcePosition, node: &str, pass: &'static str) -> Self {
        Self::UnexpectedNode {
            position: position.clone(),
            node: node.to_string(),
            pass,
        }
    }

    pub fn position(&self) -> &SourcePosition {
        match self {
            Self::NestedConcatenation { position }
            | Self::UnboundCall { position, .. }
            | Self::UnexpectedNode { position, .. } => position,
        }
    }
}
