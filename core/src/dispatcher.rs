//! Stateless request builder and response parser for EnsEMBL operations.
//!
//! # Design
//! `Dispatcher` holds the server base URL and the endpoint registry and
//! carries no mutable state between calls. `build_request` turns an operation
//! name plus parameters into an `HttpRequest`; `parse_response` turns the
//! matching `HttpResponse` into a `Reply`. The network round-trip in between
//! belongs to a `Transport`, which keeps this module deterministic.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use url::{form_urlencoded, ParseError, Url};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::{encode_multipart, Attachment, HttpMethod, HttpRequest, HttpResponse};
use crate::params::{ParamValue, Params};
use crate::registry::Registry;
use crate::template;
use crate::types::{CallRecord, DecodePolicy, Reply};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("ensembl-rest-rs/", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Builds requests for named operations and parses their responses.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    server: String,
    registry: Arc<Registry>,
    user_agent: String,
}

impl Dispatcher {
    pub fn new(server: &str, registry: Arc<Registry>) -> Self {
        Self {
            server: server.trim_end_matches('/').to_string(),
            registry,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn build_request(&self, operation: &str, params: &Params) -> Result<HttpRequest> {
        self.build_request_with_attachments(operation, params, &[])
    }

    /// Build the request for `operation`.
    ///
    /// Parameters that fill a URL placeholder are consumed by the path; the
    /// rest go to the query string (GET) or the body (POST). Each substituted
    /// value is percent-encoded as one path segment, so `/`, `?` and `#`
    /// inside a value stay part of it. Attachments switch a POST body to
    /// `multipart/form-data` and are ignored on GET.
    ///
    /// GET requests carry `Content-Type: application/json`. POST requests
    /// replace it with the body's own type, `application/x-www-form-urlencoded`
    /// or `multipart/form-data`; `Accept: application/json` is sent either way.
    pub fn build_request_with_attachments(
        &self,
        operation: &str,
        params: &Params,
        attachments: &[Attachment],
    ) -> Result<HttpRequest> {
        let endpoint = self.registry.lookup(operation)?;
        let method = endpoint.http_method()?;

        let segments = endpoint
            .url
            .trim_start_matches('/')
            .split('/')
            .map(|segment| {
                template::render(segment, |name| params.get(name).map(ParamValue::render))
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|name| Error::MissingParameter {
                operation: operation.to_string(),
                name,
            })?;

        let placeholders = endpoint.placeholders();
        let fields: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| !placeholders.contains(key))
            .flat_map(|(key, value)| {
                value
                    .field_values()
                    .into_iter()
                    .map(move |v| (key.to_string(), v))
            })
            .collect();

        let mut url = Url::parse(&self.server)?;
        url.path_segments_mut()
            .map_err(|()| Error::Url(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(&segments);
        let mut content_type = JSON.to_string();

        let body = match method {
            HttpMethod::Get => {
                if !fields.is_empty() {
                    url.query_pairs_mut().extend_pairs(&fields);
                }
                if !attachments.is_empty() {
                    warn!(operation, "attachments are not sent with GET requests");
                }
                None
            }
            HttpMethod::Post if attachments.is_empty() => {
                content_type = FORM.to_string();
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&fields)
                    .finish();
                Some(encoded.into_bytes())
            }
            HttpMethod::Post => {
                let boundary = format!("ensembl-rest-{}", Uuid::new_v4().simple());
                content_type = format!("multipart/form-data; boundary={boundary}");
                Some(encode_multipart(&boundary, &fields, attachments))
            }
        };

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers: vec![
                ("Content-Type".to_string(), content_type),
                ("Accept".to_string(), JSON.to_string()),
                ("User-Agent".to_string(), self.user_agent.clone()),
            ],
            body,
        };
        debug!(operation, method = %request.method, url = %request.url, "built request");
        Ok(request)
    }

    /// Parse the response to `request`, applying `policy` to bodies that are
    /// not JSON.
    pub fn parse_response(
        &self,
        operation: &str,
        request: &HttpRequest,
        response: HttpResponse,
        policy: DecodePolicy,
    ) -> Result<Reply> {
        self.decode(operation, request, response)?.into_reply(policy)
    }

    /// Decode without applying a policy, so the caller can record the
    /// exchange before deciding whether it failed.
    pub(crate) fn decode(
        &self,
        operation: &str,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<Decoded> {
        debug!(operation, status = response.status, bytes = response.body.len(), "received response");
        let cookies = response.cookies();
        let HttpResponse { status, headers, body } = response;
        let content = String::from_utf8(body)?;
        trace!(operation, %content, "response body");

        let (value, error) = match serde_json::from_str::<Value>(&content) {
            Ok(value) => (value, None),
            Err(e) => {
                warn!(operation, status, error = %e, "response body is not valid JSON");
                (Value::Object(Map::new()), Some(e))
            }
        };

        let record = CallRecord {
            operation: operation.to_string(),
            method: request.method,
            url: request.url.clone(),
            status,
            headers,
            cookies,
            content,
            json_error: error.as_ref().map(ToString::to_string),
        };
        Ok(Decoded {
            reply: Reply { content: value, record },
            error,
        })
    }
}

/// A parsed exchange whose JSON failure, if any, has not been acted on yet.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) reply: Reply,
    pub(crate) error: Option<serde_json::Error>,
}

impl Decoded {
    pub(crate) fn into_reply(self, policy: DecodePolicy) -> Result<Reply> {
        match (self.error, policy) {
            (Some(source), DecodePolicy::Strict) => Err(Error::Json {
                operation: self.reply.record.operation,
                source,
            }),
            _ => Ok(self.reply),
        }
    }
}
