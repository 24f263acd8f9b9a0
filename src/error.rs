use marklet_compiler::CompileError;
use thiserror::Error;

/// Everything that can stop the pipeline outside of ordinary alerts.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
