//! Incremental build support.
//!
//! A [`DependencyGraph`] is built once from the units of the previous build
//! and then only read, so it can be shared across threads compiling
//! different units. It answers two questions per unit: did the source change,
//! and did the interfaces of the templates it calls change.

pub mod graph;
pub mod manager;

pub use graph::{DependencyGraph, DependencyNode};
pub use manager::{CompilationManager, CompilationUnit, SimpleCompilationManager};
