use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sitebrief
#[derive(Error, Debug)]
pub enum SitebriefError {
    /// Graph source could not be located
    #[error("Graph source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Structural violation in the graph document
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Traversal could not pick a root page
    #[error("No root found: {0}")]
    NoRootFound(String),

    /// Task briefing needs credentials the graph does not carry
    #[error(
        "Missing credentials: pages [{}] require authentication but no default credentials are configured",
        .pages.join(", ")
    )]
    MissingCredentials { pages: Vec<String> },

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors (passthrough artifact, manifest)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a graph document is rejected by the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Source is not syntactically valid structured data
    #[error("{format} syntax error: {message}")]
    Syntax { format: &'static str, message: String },

    /// A node or edge lacks a field its variant requires
    #[error("{owner} is missing required field '{field}'")]
    MissingField { owner: String, field: &'static str },

    /// Discriminant tag is not one of the known variants
    #[error("{owner} has unknown kind '{kind}'")]
    UnknownKind { owner: String, kind: String },

    /// Two nodes share an id
    #[error("duplicate node id '{id}'")]
    DuplicateId { id: String },

    /// A reference names a node id that does not exist
    #[error("dangling reference to '{id}' in {context}")]
    DanglingReference { id: String, context: String },

    /// A node is listed as both public and protected
    #[error("node '{id}' is listed in both publicPages and protectedPages")]
    CrossListedAuth { id: String },
}

/// Convenient Result type using SitebriefError
pub type Result<T> = std::result::Result<T, SitebriefError>;
