use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// A payload broke its structural contract. `path` is a JSON pointer
    /// into the offending payload ("" for the root).
    #[error("Validation error at '{path}': {message}")]
    Validation { path: String, message: String },

    #[error("Upstream error: {status} {message}")]
    Upstream { status: u16, message: String },

    /// The upstream answered with a success status but the body was not JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Tool '{0}' not found in registry")]
    NotFound(String),

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid execution context: {0}")]
    InvalidContext(String),
}

impl ToolError {
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable tag the hosting runtime can branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation { .. } => "validation",
            ToolError::Upstream { .. } => "upstream",
            ToolError::Decode(_) => "decode",
            ToolError::NotFound(_) => "not_found",
            ToolError::DuplicateTool(_) => "duplicate_tool",
            ToolError::Transport(_) => "transport",
            ToolError::InvalidContext(_) => "invalid_context",
        }
    }

    /// Returns true if a higher layer may reasonably retry the call.
    /// The tools themselves never retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolError::Upstream { status, .. } => *status == 429 || *status >= 500,
            ToolError::Transport(_) => true,
            ToolError::Validation { .. }
            | ToolError::Decode(_)
            | ToolError::NotFound(_)
            | ToolError::DuplicateTool(_)
            | ToolError::InvalidContext(_) => false,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors come from bad header values in the context.
        if err.is_builder() {
            ToolError::InvalidContext(err.to_string())
        } else {
            ToolError::Transport(err.to_string())
        }
    }
}
