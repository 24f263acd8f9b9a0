//! marklet: the middle-end of a markup template compiler.
//!
//! Trees arrive already parsed, bound and space-collapsed. A
//! [`CompilationPipeline`] lowers each one to a flat, placeholder-pivoted
//! expression tree and checks it for text that translators could not see.
//! [`IncrementalBuild`] decides which units can be skipped because neither
//! their source nor the interfaces they call have changed.
//!
//! The pass crates are re-exported for drivers that need finer control.

pub mod config;
pub mod error;
pub mod executor;
pub mod pipeline;

pub use config::CompilerConfig;
pub use error::PipelineError;
pub use executor::Executor;
pub use pipeline::{AlertSummary, CompilationPipeline, CompiledUnit, IncrementalBuild, SourceUnit};

pub use marklet_alerts as alerts;
pub use marklet_compiler as compiler;
pub use marklet_depend as depend;
pub use marklet_schema as schema;
pub use marklet_tree as tree;
pub use marklet_types as types;
