//! Common error handling utilities and conventions

/// Extension trait for adding context to errors consistently across crates
pub trait ErrorContext<T> {
    /// Add operation context to an error result
    fn with_context<F>(self, f: F) -> CoreResult<T>
    where
        F: FnOnce() -> String;

    /// Add operation context with a static string
    fn with_context_str(self, context: &'static str) -> CoreResult<T>;
}

impl<T> ErrorContext<T> for CoreResult<T> {
    fn with_context<F>(self, f: F) -> CoreResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| err.prefixed(&f()))
    }

    fn with_context_str(self, context: &'static str) -> CoreResult<T> {
        self.with_context(|| context.to_string())
    }
}

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types that can be shared across crates
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, thiserror::Error)]
pub enum CoreError {
    #[error("Storage access failed: {message}")]
    Storage { message: String },

    #[error("Invalid expiration time '{value}': {message}")]
    InvalidExpiration { value: String, message: String },

    #[error("Failed to load module '{module}': {message}")]
    ModuleLoad { module: String, message: String },
}

impl CoreError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an invalid expiration error
    pub fn invalid_expiration(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidExpiration {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a module load error
    pub fn module_load(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleLoad {
            module: module.into(),
            message: message.into(),
        }
    }

    fn prefixed(self, context: &str) -> Self {
        let join = |message: String| format!("{context}: {message}");
        match self {
            Self::Storage { message } => Self::Storage {
                message: join(message),
            },
            Self::InvalidExpiration { value, message } => Self::InvalidExpiration {
                value,
                message: join(message),
            },
            Self::ModuleLoad { module, message } => Self::ModuleLoad {
                module,
                message: join(message),
            },
        }
    }
}
