//! Export error types

use std::fmt;
use std::io;

use crate::attributes::AttributeError;
use crate::validate::ValidationError;

/// Error aborting an export
#[derive(Debug)]
pub enum ExportError {
    /// A node's kind or attributes violate its category's shape
    Schema {
        container: String,
        node: String,
        message: String,
    },
    /// An instance references a group no catalog entry provides
    Reference {
        container: String,
        node: String,
        group: String,
    },
    /// The assembled world failed its consistency checks
    Invalid(Vec<ValidationError>),
    /// Output could not be written
    Io(io::Error),
}

impl ExportError {
    pub fn schema(container: &str, node: &str, message: impl Into<String>) -> Self {
        ExportError::Schema {
            container: container.to_string(),
            node: node.to_string(),
            message: message.into(),
        }
    }

    pub fn reference(container: &str, node: &str, group: &str) -> Self {
        ExportError::Reference {
            container: container.to_string(),
            node: node.to_string(),
            group: group.to_string(),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Schema { container, node, message } if container == node => {
                write!(f, "Schema error in '{}': {}", container, message)
            }
            ExportError::Schema { container, node, message } => {
                write!(f, "Schema error in '{}' at '{}': {}", container, node, message)
            }
            ExportError::Reference { container, node, group } => write!(
                f,
                "Reference error in '{}' at '{}': group '{}' must reference a model from a list",
                container, node, group
            ),
            ExportError::Invalid(errors) => {
                write!(f, "Export validation failed with {} problem(s)", errors.len())?;
                for error in errors {
                    write!(f, "; {}", error)?;
                }
                Ok(())
            }
            ExportError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Attach container/node context to an attribute read
pub(crate) trait AttributeContext<T> {
    fn in_node(self, container: &str, node: &str) -> Result<T, ExportError>;
}

impl<T> AttributeContext<T> for Result<T, AttributeError> {
    fn in_node(self, container: &str, node: &str) -> Result<T, ExportError> {
        self.map_err(|e| ExportError::schema(container, node, e.to_string()))
    }
}
