use marklet_types::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// What went wrong. The `Display` form is the user-facing message.
///
/// Node names are display names such as `<gxp:else>` or `text`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKind {
    #[error("{node} not allowed {}", placement(.parent))]
    BadNodePlacement { node: String, parent: Option<String> },

    #[error("{node} not allowed after else clause.")]
    ElifAfterElse { node: String },

    #[error("Only one {node} allowed per if block.")]
    DoubleElse { node: String },

    #[error("{node} without matching start of placeholder.")]
    EphMissingPh { node: String },

    #[error("{node} without matching end of placeholder.")]
    PhMissingEph { node: String },

    #[error("{node} is an empty placeholder.")]
    EmptyPlaceholder { node: String },

    #[error("{node} requires an example.")]
    PlaceholderRequiresExample { node: String },

    #[error("unextractable {node}")]
    UnextractableContent { node: String },
}

fn placement(parent: &Option<String>) -> String {
    match parent {
        Some(p) => format!("inside {}", p),
        None => "here".to_string(),
    }
}

/// Stable identifier for each [`AlertKind`], used to configure severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCode {
    BadNodePlacement,
    ElifAfterElse,
    DoubleElse,
    EphMissingPh,
    PhMissingEph,
    EmptyPlaceholder,
    PlaceholderRequiresExample,
    UnextractableContent,
}

impl AlertKind {
    pub fn code(&self) -> AlertCode {
        match self {
            AlertKind::BadNodePlacement { .. } => AlertCode::BadNodePlacement,
            AlertKind::ElifAfterElse { .. } => AlertCode::ElifAfterElse,
            AlertKind::DoubleElse { .. } => AlertCode::DoubleElse,
            AlertKind::EphMissingPh { .. } => AlertCode::EphMissingPh,
            AlertKind::PhMissingEph { .. } => AlertCode::PhMissingEph,
            AlertKind::EmptyPlaceholder { .. } => AlertCode::EmptyPlaceholder,
            AlertKind::PlaceholderRequiresExample { .. } => AlertCode::PlaceholderRequiresExample,
            AlertKind::UnextractableContent { .. } => AlertCode::UnextractableContent,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            AlertKind::UnextractableContent { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alert {
    position: SourcePosition,
    kind: AlertKind,
}

impl Alert {
    pub fn new(position: SourcePosition, kind: AlertKind) -> Self {
        Self { position, kind }
    }

    pub fn bad_node_placement(
        position: SourcePosition,
        node: impl Into<String>,
        parent: Option<&str>,
    ) -> Self {
        Self::new(
            position,
            AlertKind::BadNodePlacement {
                node: node.into(),
                parent: parent.map(str::to_string),
            },
        )
    }

    pub fn elif_after_else(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(position, AlertKind::ElifAfterElse { node: node.into() })
    }

    pub fn double_else(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(position, AlertKind::DoubleElse { node: node.into() })
    }

    pub fn eph_missing_ph(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(position, AlertKind::EphMissingPh { node: node.into() })
    }

    pub fn ph_missing_eph(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(position, AlertKind::PhMissingEph { node: node.into() })
    }

    pub fn empty_placeholder(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(position, AlertKind::EmptyPlaceholder { node: node.into() })
    }

    pub fn placeholder_requires_example(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(
            position,
            AlertKind::PlaceholderRequiresExample { node: node.into() },
        )
    }

    pub fn unextractable_content(position: SourcePosition, node: impl Into<String>) -> Self {
        Self::new(
            position,
            AlertKind::UnextractableContent { node: node.into() },
        )
    }

    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    pub fn kind(&self) -> &AlertKind {
        &self.kind
    }

    pub fn code(&self) -> AlertCode {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn default_severity(&self) -> Severity {
        self.kind.default_severity()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, col: u32) -> SourcePosition {
        SourcePosition::new("test.gxp", line, col)
    }

    #[test]
    fn test_bad_node_placement_messages() {
        let here = Alert::bad_node_placement(pos(2, 1), "<gxp:elif>", None);
        assert_eq!(here.message(), "<gxp:elif> not allowed here");

        let inside = Alert::bad_node_placement(pos(3, 11), "text", Some("<gxp:else>"));
        assert_eq!(inside.message(), "text not allowed inside <gxp:else>");
    }

    #[test]
    fn test_display_includes_position() {
        let alert = Alert::double_else(pos(4, 1), "<gxp:else>");
        assert_eq!(
            alert.to_string(),
            "test.gxp:4:1:4:1: Only one <gxp:else> allowed per if block."
        );
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(
            Alert::unextractable_content(pos(1, 1), "text").default_severity(),
            Severity::Info
        );
        assert_eq!(
            Alert::ph_missing_eph(pos(1, 1), "<b>").default_severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_alert_code_serde_names() {
        let code: AlertCode = serde_json::from_str("\"unextractable-content\"").unwrap();
        assert_eq!(code, AlertCode::UnextractableContent);
        assert_eq!(
            Alert::elif_after_else(pos(1, 1), "<gxp:elif>").code(),
            AlertCode::ElifAfterElse
        );
    }
}
