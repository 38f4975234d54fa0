use std::fmt;
use std::path::PathBuf;

use crate::value::ResultKind;

/// Maximum number of characters of offending input kept in an error record.
pub(crate) const DATA_LIMIT: usize = 200;

/// Severity of an [`ErrorRecord`].
///
/// The levels are ordered; anything above [`Level::NoError`] is reported by
/// the error handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// No error.
    #[default]
    NoError,
    /// Informational message.
    Info,
    /// The operation succeeded but the result needs attention.
    Warning,
    /// The operation did not produce a usable result.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::NoError => write!(f, "NOERR"),
            Level::Info => write!(f, "INFO"),
            Level::Warning => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

/// The out-of-band error record kept by document and node handles.
///
/// It holds a severity, a human readable message and auxiliary data: the
/// failing query, the file path or the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRecord {
    pub level: Level,
    pub message: String,
    pub data: String,
}

impl ErrorRecord {
    /// Construct a record by hand, for instance to report a problem
    /// detected by the caller through [`crate::handle_error`].
    pub fn new(level: Level, message: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            data: data.into(),
        }
    }

    /// True if this record is more severe than [`Level::NoError`].
    pub fn is_error(&self) -> bool {
        self.level > Level::NoError
    }

    /// The message of the record.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\nDATA: {}", self.level, self.message, self.data)
    }
}

impl From<&Error> for ErrorRecord {
    fn from(error: &Error) -> Self {
        ErrorRecord::new(error.level(), error.to_string(), error.data())
    }
}

/// Errors produced by document and node handles.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML input could not be parsed.
    #[error("{message}")]
    Parse { message: String, data: String },
    /// A file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The evaluation context could not be created. The document's tree
    /// has been released.
    #[error("Fatal error on XPath context")]
    Context { data: String },
    /// The expression failed to compile or to evaluate.
    #[error("{message}")]
    Evaluation { message: String, query: String },
    /// The result category differs from the requested one.
    #[error("Result type is not \"{expected}\"")]
    TypeMismatch { expected: ResultKind, query: String },
    /// The result is outside of string, number, boolean and node-set.
    #[error("Result type is not supported: {description}")]
    Unsupported { description: String, query: String },
    /// A number was requested as integer but had a fractional part.
    #[error("Result is not an integer, truncating")]
    Truncated { value: f64, query: String },
    /// A replacement fragment could not be used.
    #[error("{message}")]
    Fragment { message: String, data: String },
    /// The node kind cannot be replaced.
    #[error("Node cannot be replaced: {kind}")]
    NotReplaceable { kind: &'static str },
    /// The node kind has no serialization of its own.
    #[error("Node cannot be serialized: {kind}")]
    NotSerializable { kind: &'static str },
    /// The document handle holds no tree.
    #[error("Document has no tree")]
    NoTree,
    /// Saving without an explicit path needs a recorded origin.
    #[error("Document has no origin path")]
    NoOrigin,
    /// An empty path was given to save to.
    #[error("Cannot save to an empty path")]
    EmptyPath,
    /// The node handle does not refer to any node.
    #[error("Node handle is empty")]
    EmptyNode,
    /// The node handle outlived its document or its tree.
    #[error("Stale node reference: {reason}")]
    Stale { reason: &'static str },
    /// The tree could not be manipulated or serialized.
    #[error(transparent)]
    Tree(#[from] xot::Error),
}

impl Error {
    /// The severity of this error when recorded.
    pub fn level(&self) -> Level {
        match self {
            Error::Truncated { .. } => Level::Warning,
            _ => Level::Error,
        }
    }

    /// Auxiliary data for the error record.
    pub fn data(&self) -> String {
        match self {
            Error::Parse { data, .. }
            | Error::Context { data }
            | Error::Fragment { data, .. } => data.clone(),
            Error::Read { path, .. } | Error::Write { path, .. } => path.display().to_string(),
            Error::Evaluation { query, .. }
            | Error::TypeMismatch { query, .. }
            | Error::Unsupported { query, .. }
            | Error::Truncated { query, .. } => query.clone(),
            Error::NotReplaceable { .. }
            | Error::NotSerializable { .. }
            | Error::NoTree
            | Error::NoOrigin
            | Error::EmptyPath
            | Error::EmptyNode
            | Error::Stale { .. }
            | Error::Tree(_) => String::new(),
        }
    }

    /// True if this error only warns; a usable value was still produced.
    pub fn is_warning(&self) -> bool {
        self.level() == Level::Warning
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Keep at most [`DATA_LIMIT`] characters of input for an error record.
pub(crate) fn snippet(input: &str) -> String {
    input.chars().take(DATA_LIMIT).collect()
}
