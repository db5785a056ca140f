use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmaicError {
    #[error("not initialized: run 'dmaic init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("catalog file not found: {0}")]
    CatalogNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DmaicError>;
