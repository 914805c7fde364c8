use thiserror::Error;

/// Result type for depot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for depot operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Repository index errors
    #[error("Index error: {0}")]
    Index(String),

    /// Search or update attempted against a closed index
    #[error("Index for repository '{repository_id}' is closed")]
    IndexClosed { repository_id: String },

    /// Malformed artifact coordinate string
    #[error("Invalid artifact coordinate '{0}'")]
    InvalidCoordinate(String),

    /// Fixture resolution or loading errors
    #[error("Fixture error in {path}: {message}")]
    Fixture { path: String, message: String },

    /// Transform output does not match the expected artifact
    #[error("Output mismatch for fixture '{fixture}':\n{diff}")]
    Mismatch { fixture: String, diff: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an index error
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Creates a closed-index error
    pub fn index_closed(repository_id: impl Into<String>) -> Self {
        Self::IndexClosed {
            repository_id: repository_id.into(),
        }
    }

    /// Creates a fixture error
    pub fn fixture(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fixture {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a mismatch error carrying a rendered diff
    pub fn mismatch(fixture: impl Into<String>, diff: impl Into<String>) -> Self {
        Self::Mismatch {
            fixture: fixture.into(),
            diff: diff.into(),
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
