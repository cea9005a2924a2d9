use std::fmt;

/// Errors returned by graphics operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// A drawing command that needs an open contour arrived while none was
    /// open. `index` is the position of the command in its stream.
    MalformedPath {
        command: &'static str,
        index: usize,
    },
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPath { command, index } => {
                write!(f, "malformed path: {command} at command {index} has no open contour")
            }
        }
    }
}

impl std::error::Error for GraphicsError {}
