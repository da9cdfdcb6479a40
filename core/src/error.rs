//! Error types for the EnsEMBL REST client.
//!
//! # Design
//! Everything that can go wrong before the request leaves the process
//! (unknown operation, bad method, missing placeholder value) has its own
//! variant so callers can tell configuration mistakes from network failures.
//! Transport errors are boxed as-is; the original error stays reachable
//! through `source()` and `downcast_ref`.

/// Error type returned by transports.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested operation name is not in the registry.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The endpoint is configured with a method other than GET or POST.
    #[error("operation {operation} has unsupported method {method:?}, expected GET or POST")]
    InvalidMethod { operation: String, method: String },

    /// A `{{placeholder}}` in the URL template has no matching parameter.
    #[error("operation {operation} requires parameter {name:?}")]
    MissingParameter { operation: String, name: String },

    /// An endpoint table could not be loaded.
    #[error("invalid endpoint table: {0}")]
    InvalidRegistry(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Connection, DNS or TLS failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The response body is not JSON. Only raised under the strict decode policy.
    #[error("operation {operation} returned a body that is not valid JSON: {source}")]
    Json {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// True when the error was raised before any network I/O took place.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::UnknownOperation(_)
                | Error::InvalidMethod { .. }
                | Error::MissingParameter { .. }
                | Error::InvalidRegistry(_)
                | Error::Url(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_operation() {
        let err = Error::InvalidMethod {
            operation: "lookup_id".to_string(),
            method: "DELETE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation lookup_id has unsupported method \"DELETE\", expected GET or POST"
        );

        let err = Error::MissingParameter {
            operation: "lookup_id".to_string(),
            name: "id".to_string(),
        };
        assert_eq!(err.to_string(), "operation lookup_id requires parameter \"id\"");
    }

    #[test]
    fn transport_error_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Transport(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert!(!err.is_local());
    }

    #[test]
    fn configuration_errors_are_local() {
        assert!(Error::UnknownOperation("nope".to_string()).is_local());
        assert!(Error::InvalidRegistry("bad".to_string()).is_local());
    }
}
