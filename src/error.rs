use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// All failures the engine can report.
///
/// `Parse` is the one recoverable kind: a front end may hand the offending
/// text to an external natural-language translator and try `parse` once more.
/// Everything else propagates straight to the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported or invalid statement: '{0}'")]
    Parse(String),

    #[error("invalid WHERE clause: '{0}'")]
    WhereClause(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table document error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the error came from the grammar rejecting the input,
    /// i.e. the caller may retry through a translation step.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
