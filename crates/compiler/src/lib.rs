//! The marklet compiler middle-end.
//!
//! Each pass is a zero-sized value with an `apply` method that consumes a
//! tree of one stage and returns a new tree of the next stage:
//!
//! | Pass | From | To |
//! |------|------|----|
//! | [`IfExpander`] | `Forest<Parsed>` | `Forest<IfExpanded>` |
//! | [`PlaceholderInserter`] | `Tree<SpaceCollapsed>` | `Tree<PlaceholderInserted>` |
//! | [`ContentFlattener`] | `Tree<PlaceholderInserted>` | `Tree<ContentFlattened>` |
//! | [`PlaceholderPivoter`] | `Tree<ContentFlattened>` | `Tree<PlaceholderPivoted>` |
//! | [`I18nChecker`] | `Tree<SpaceCollapsed>` + `Tree<PlaceholderPivoted>` | `Tree<I18nChecked>` |
//!
//! User mistakes become alerts on the output tree. Only broken tree shapes
//! left behind by an earlier pass are reported as [`CompileError`].

pub mod error;
pub mod flatten;
pub mod i18ncheck;
pub mod ifexpand;
pub mod phinsert;
pub mod phpivot;

#[cfg(any(test, feature = "testing"))]
pub mod test_support;

pub use error::CompileError;
pub use flatten::ContentFlattener;
pub use i18ncheck::I18nChecker;
pub use ifexpand::IfExpander;
pub use phinsert::PlaceholderInserter;
pub use phpivot::PlaceholderPivoter;
