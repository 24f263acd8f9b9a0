//! Foundation types shared by every marklet crate.
//!
//! - [`SourcePosition`]: where in a template source a node came from
//! - [`TemplateName`]: the fully-qualified name of a compilation unit

pub mod ids;
pub mod position;

pub use ids::TemplateName;
pub use position::SourcePosition;
