use thiserror::Error;

/// Errors surfaced while deciding whether a feature is excluded.
#[derive(Debug, Error)]
pub enum ExclusionError {
    /// A `querystring` entry is not a valid regular expression.
    /// This is a configuration bug, not a per-request condition.
    #[error("invalid pattern {pattern:?} for query parameter {param:?}: {source}")]
    InvalidPattern {
        param: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The special page name resolver failed.
    #[error("resolver error: {0}")]
    Resolver(String),

    /// Options could not be read.
    #[error("options error: {0}")]
    Options(String),
}

pub type Result<T> = std::result::Result<T, ExclusionError>;
