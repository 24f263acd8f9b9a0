use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid doctype '{name}': {message}")]
    InvalidDocType { name: String, message: String },

    #[error("Element '{element}' declared twice in schema '{schema}'")]
    DuplicateElement { schema: String, element: String },
}

impl SchemaError {
    pub fn invalid_doctype(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocType {
            name: name.into(),
            message: message.into(),
        }
    }
}
