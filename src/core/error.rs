//! Error types for the stream registry

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create the backing file for a new stream
    #[error("cannot open log stream at '{path}': {source}")]
    OpenStream {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to reopen a registered writer during a rotation pass
    #[error("reopen failed for '{path}': {source}")]
    Reopen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation requires a promoted registry with a base path
    #[error("registry not configured: {operation} requires a base path")]
    NotConfigured { operation: &'static str },

    /// Caller used the name reserved for the bootstrap logger
    #[error("stream name '{name}' is reserved")]
    ReservedName { name: String },

    /// Sink-side failure outside of open/reopen
    #[error("sink error: {0}")]
    Sink(String),
}

impl RegistryError {
    /// Create an open-stream error for a path
    pub fn open_stream(path: impl Into<String>, source: std::io::Error) -> Self {
        RegistryError::OpenStream {
            path: path.into(),
            source,
        }
    }

    /// Create a reopen error for a path
    pub fn reopen(path: impl Into<String>, source: std::io::Error) -> Self {
        RegistryError::Reopen {
            path: path.into(),
            source,
        }
    }

    /// Create a not-configured error for an operation name
    pub fn not_configured(operation: &'static str) -> Self {
        RegistryError::NotConfigured { operation }
    }

    /// Create a reserved-name error
    pub fn reserved(name: impl Into<String>) -> Self {
        RegistryError::ReservedName { name: name.into() }
    }

    /// Create a generic sink error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        RegistryError::Sink(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = RegistryError::open_stream("/var/log/app.log", io_err);
        assert!(matches!(err, RegistryError::OpenStream { .. }));

        let err = RegistryError::not_configured("open");
        assert!(matches!(err, RegistryError::NotConfigured { .. }));

        let err = RegistryError::reserved("__early");
        assert!(matches!(err, RegistryError::ReservedName { .. }));
    }

    #[test]
    fn test_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = RegistryError::reopen("/var/log/api.log", io_err);
        assert_eq!(
            err.to_string(),
            "reopen failed for '/var/log/api.log': no such file"
        );

        let err = RegistryError::not_configured("open");
        assert_eq!(
            err.to_string(),
            "registry not configured: open requires a base path"
        );

        let err = RegistryError::sink("write past shutdown");
        assert_eq!(err.to_string(), "sink error: write past shutdown");
    }
}
