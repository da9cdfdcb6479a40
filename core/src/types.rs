//! Call results returned to the caller.
//!
//! # Design
//! Every reply carries the `CallRecord` of its own exchange, so callers that
//! share a client across threads never have to read a slot another call may
//! have overwritten. The client additionally keeps a copy of the latest
//! record for post-hoc inspection.

use serde::Serialize;
use serde_json::Value;

use crate::http::HttpMethod;

/// What to do when a response body is not valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Return an empty object and set `CallRecord::json_error`.
    #[default]
    Lenient,
    /// Fail the call with `Error::Json`.
    Strict,
}

/// Snapshot of one request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub operation: String,
    pub method: HttpMethod,
    /// Resolved URL, including the query string.
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    /// Raw response body.
    pub content: String,
    /// Set when `content` failed to decode as JSON.
    pub json_error: Option<String>,
}

impl CallRecord {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Meaning of the status code as documented by the EnsEMBL REST service.
    pub fn status_text(&self) -> Option<&'static str> {
        status_text(self.status)
    }
}

/// Describe an HTTP status code the way the EnsEMBL REST documentation does.
pub fn status_text(status: u16) -> Option<&'static str> {
    let text = match status {
        200 => "OK: request was a success",
        400 => "Bad Request: occurs during exceptional circumstances such as the service being unable to find an ID",
        403 => "Forbidden: you are submitting far too many requests and have been temporarily forbidden access",
        404 => "Not Found: badly formatted request",
        408 => "Timeout: the request was not processed in time",
        415 => "Unsupported Media Type: unsupported content type requested",
        429 => "Too Many Requests: you have been rate-limited; wait and retry",
        500 => "Internal Server Error: an unexpected error occurred on the server",
        503 => "Service Unavailable: the service is temporarily down",
        _ => return None,
    };
    Some(text)
}

/// Decoded response plus the record of the exchange that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Decoded JSON, or an empty object when decoding failed.
    pub content: Value,
    pub record: CallRecord,
}

impl Reply {
    /// False when `content` is the empty placeholder for an undecodable body.
    pub fn is_decoded(&self) -> bool {
        self.record.json_error.is_none()
    }

    /// The decoded JSON, or `None` when the body could not be decoded.
    pub fn json(&self) -> Option<&Value> {
        self.is_decoded().then_some(&self.content)
    }

    pub fn into_content(self) -> Value {
        self.content
    }
}
