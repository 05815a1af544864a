use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of every failure the library can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Item counts and branch indices outside the accepted range.
    Range,
    /// Values of the wrong shape, e.g. a fractional branch index.
    Type,
    /// Malformed grammar text or attribute names.
    Syntax,
    /// Drawing and serialization contract violations.
    Geometry,
}

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    #[error("{message} at line {line}, column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    #[error("Invalid attribute name {0}")]
    InvalidAttributeName(String),
    #[error("{component} requires {expected} items, got {found}")]
    ItemCount {
        component: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("normal must be an index between 0 and {}, got {normal}", .len.saturating_sub(1))]
    NormalOutOfRange { normal: i64, len: usize },
    #[error("normal must be an integer, got {0}")]
    NonIntegerNormal(f64),
    #[error("type must be 'any' or 'all', got '{0}'")]
    InvalidChoiceType(String),
    #[error("invalid direction '{0}'")]
    InvalidCardinal(String),
    #[error("invalid spin '{0}'")]
    InvalidSpin(String),
    #[error("Missing document object")]
    MissingDocument,
    #[error("diagrams are sized to their own content, cannot format with width {0}")]
    DiagramWidth(f64),
    #[error("DOM error: {0}")]
    Dom(String),
    #[error("invalid diagram description: {0}")]
    Description(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ItemCount { .. } | Error::NormalOutOfRange { .. } => ErrorKind::Range,
            Error::NonIntegerNormal(_) | Error::InvalidChoiceType(_) | Error::Description(_) => {
                ErrorKind::Type
            }
            Error::Syntax { .. } | Error::InvalidAttributeName(_) => ErrorKind::Syntax,
            Error::InvalidCardinal(_)
            | Error::InvalidSpin(_)
            | Error::MissingDocument
            | Error::DiagramWidth(_)
            | Error::Dom(_) => ErrorKind::Geometry,
        }
    }

    pub(crate) fn item_count(component: &'static str, expected: &'static str, found: usize) -> Self {
        Error::ItemCount {
            component,
            expected,
            found,
        }
    }
}
