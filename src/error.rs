//! Error types for the merge engine

use thiserror::Error;

/// Failure reported by a template renderer collaborator
///
/// The engine treats renderers as opaque dependencies, so the only thing it
/// can carry upward is the renderer's own message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RenderError {
    /// Description of the rendering failure
    pub message: String,
}

impl RenderError {
    /// Create a render error from any printable message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while merging an artifact
///
/// All variants are fatal for the current artifact; there is no partial
/// merge. Callers report the error and continue with other artifacts.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Start and end markers in the input do not balance
    #[error("Unbalanced region markers at line {line}: {message}")]
    UnbalancedMarkers {
        /// Line number (1-based) where the imbalance was detected
        line: usize,
        /// Description of the imbalance
        message: String,
    },

    /// Two sibling regions share a name
    #[error("Duplicate region name: {name}")]
    DuplicateRegionName {
        /// The offending region name
        name: String,
    },

    /// A region spec tree violates a structural constraint
    #[error("Invalid region spec: {0}")]
    InvalidSpec(String),

    /// Template rendering failed while populating a region slot
    #[error("Template '{template}' failed for region '{region}': {source}")]
    Render {
        /// Template identifier handed to the renderer
        template: String,
        /// Slash-joined path of the region being populated
        region: String,
        /// Underlying renderer failure
        #[source]
        source: RenderError,
    },

    /// A required region is missing from the merged tree
    #[error("Required region could not be resolved: {name}")]
    SectionUnresolvable {
        /// Slash-joined path of the unresolved region
        name: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
