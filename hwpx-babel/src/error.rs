//! Error types for conversion operations

use std::fmt;

/// A markdown construct the document model has no mapping for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedConstruct {
    /// Short name of the construct (e.g. "raw HTML block")
    pub kind: String,
    /// 1-based source line, when known
    pub line: Option<usize>,
}

impl UnsupportedConstruct {
    pub fn new(kind: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind: kind.into(),
            line,
        }
    }
}

impl fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Broad classification of a [`ConversionError`], for logs and callers that
/// map errors onto transport-level responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    UnsupportedConstruct,
    InvariantViolation,
    Packaging,
}

/// Errors that can occur while converting markdown to HWPX
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Input could not be read as text (bad encoding, over the size limit)
    Input(String),
    /// The markdown uses constructs that are rejected under the strict policy
    UnsupportedConstruct(Vec<UnsupportedConstruct>),
    /// An internal invariant was broken while building or serializing
    InvariantViolation(String),
    /// Writing the zip container failed
    Packaging(String),
}

impl ConversionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConversionError::Input(_) => ErrorCategory::Input,
            ConversionError::UnsupportedConstruct(_) => ErrorCategory::UnsupportedConstruct,
            ConversionError::InvariantViolation(_) => ErrorCategory::InvariantViolation,
            ConversionError::Packaging(_) => ErrorCategory::Packaging,
        }
    }

    /// Whether the caller can fix this by changing the input.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Input | ErrorCategory::UnsupportedConstruct
        )
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Packaging
    }

    /// Build an [`ConversionError::InvariantViolation`], logging it as a defect.
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        log::error!(target: "hwpx_babel::invariant", "{msg}");
        ConversionError::InvariantViolation(msg)
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Input(msg) => write!(f, "Invalid input: {msg}"),
            ConversionError::UnsupportedConstruct(constructs) => {
                write!(f, "Unsupported markdown constructs: ")?;
                for (i, construct) in constructs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{construct}")?;
                }
                Ok(())
            }
            ConversionError::InvariantViolation(msg) => {
                write!(f, "Internal invariant violated: {msg}")
            }
            ConversionError::Packaging(msg) => write!(f, "Packaging error: {msg}"),
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<zip::result::ZipError> for ConversionError {
    fn from(err: zip::result::ZipError) -> Self {
        ConversionError::Packaging(err.to_string())
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::Packaging(err.to_string())
    }
}

impl From<quick_xml::Error> for ConversionError {
    fn from(err: quick_xml::Error) -> Self {
        ConversionError::Packaging(format!("xml writer: {err}"))
    }
}
