use thiserror::Error;

/// Coarse classification of [`GeneError`], all of which are fatal at the gene layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Construction,
    Usage,
    UnsatisfiableConstraint,
    Configuration,
    Io,
}

#[derive(Error, Debug)]
pub enum GeneError {
    #[error("Invalid construction: {0}")]
    Construction(String),

    #[error("Gene '{gene}' needs the genes of its individual for this operation")]
    ContextRequired { gene: String },

    #[error("No gene at index {0}")]
    GeneIndexOutOfBounds(usize),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    VariantMismatch { expected: String, actual: String },

    #[error("Cannot handle specialization: {0}")]
    UnsupportedSpecialization(String),

    #[error("Foreign key '{column}' for table {table} is not bound")]
    UnboundForeignKey { column: String, table: String },

    #[error("Input genes do not contain primary key with id {0}")]
    MissingPrimaryKey(i64),

    #[error("Trying to print a foreign key pointing to non-printable primary key {0}")]
    NonPrintablePrimaryKey(i64),

    #[error("Gene '{0}' has no printable value")]
    NotPrintable(String),

    #[error("Cannot find impact of gene {0} in the individual")]
    MissingImpact(String),

    #[error("Cannot choose from an empty collection")]
    EmptyChoice,

    #[error("Foreign key '{column}' is not nullable, but no primary key of table {table} precedes it")]
    UnsatisfiableConstraint { column: String, table: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GeneError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeneError::Construction(_) => ErrorKind::Construction,
            GeneError::UnsatisfiableConstraint { .. } => ErrorKind::UnsatisfiableConstraint,
            GeneError::Configuration(_) | GeneError::Serde(_) => ErrorKind::Configuration,
            GeneError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Usage,
        }
    }

    pub(crate) fn mismatch(expected: &str, actual: &str) -> Self {
        GeneError::VariantMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneError>;
