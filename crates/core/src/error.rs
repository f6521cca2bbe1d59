use thiserror::Error;

/// Result type for tsdocbot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tsdocbot operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parsing errors when processing source code
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// Comment or pull-request text synthesis failed
    #[error("Synthesis error: {message}")]
    Synthesis { message: String, transient: bool },

    /// Repository host (branch, commit, pull request, file fetch) failure
    #[error("Repository host error during {operation}: {message}")]
    Host {
        operation: String,
        /// HTTP status, when the host answered at all
        status: Option<u16>,
        message: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

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

    /// Creates a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Creates a synthesis error
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis {
            message: msg.into(),
            transient: false,
        }
    }

    /// Creates a synthesis error that should be retried
    pub fn transient_synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis {
            message: msg.into(),
            transient: true,
        }
    }

    /// Creates a repository host error
    pub fn host(
        operation: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Host {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
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

    /// Whether retrying the failed operation may succeed
    ///
    /// Network failures (no status), rate limiting (429) and server errors (5xx)
    /// are transient. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Host { status, .. } => match status {
                None => true,
                Some(code) => *code == 429 || (500..600).contains(code),
            },
            Self::Synthesis { transient, .. } => *transient,
            _ => false,
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
