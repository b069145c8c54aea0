//! Error types for scene graph operations and queries

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the scene manager and the query engine
#[derive(Error, Debug)]
pub enum SceneError {
    /// A movable object with this name already exists for the type
    #[error("{kind} named '{name}' already exists")]
    DuplicateName {
        /// Movable type the name collided in
        kind: &'static str,
        /// The colliding name
        name: String,
    },

    /// Malformed query input (for example a zero-length ray direction)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// World bounds were required from an object that is not attached
    #[error("Movable object '{0}' is not attached to a scene node")]
    DetachedObject(String),

    /// Unknown node, object or mesh
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The requested parent/child change would break the tree
    #[error("Invalid hierarchy operation: {0}")]
    InvalidHierarchy(String),

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Alias for `Result<T, SceneError>`
pub type Result<T> = std::result::Result<T, SceneError>;
