use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubechatError {
    #[error("config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("verbs dropdown select cannot be empty")]
    VerbDropdownEmpty,

    #[error("unknown command builder command: '{0}'")]
    UnknownCommand(String),

    #[error("resource '{0}' not found in cluster API resources")]
    ResourceNotFound(String),

    #[error("verb '{verb}' is not supported for resource '{resource}'")]
    VerbNotSupported { verb: String, resource: String },

    #[error("invalid namespace pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("command '{command}' failed: {message}")]
    Execution { command: String, message: String },

    #[error("command rejected: {0}")]
    Forbidden(String),

    #[error("kubernetes API error: {0}")]
    Kube(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl KubechatError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, KubechatError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, KubechatError>;
