use std::fmt;

/// Problems found by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DxfError {
    /// The document does not consist of whole code/value line pairs.
    OddLineCount(usize),
    /// A group-code line is not an integer. `line` is 1-based.
    BadGroupCode { line: usize, text: String },
    /// Sections or markers are missing, repeated, or out of order.
    Structure(String),
}

impl fmt::Display for DxfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLineCount(n) => write!(f, "document has an odd number of lines ({n})"),
            Self::BadGroupCode { line, text } => {
                write!(f, "line {line}: group code {text:?} is not an integer")
            }
            Self::Structure(msg) => write!(f, "malformed document structure: {msg}"),
        }
    }
}

impl std::error::Error for DxfError {}
