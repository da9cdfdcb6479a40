//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! dispatcher builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` executes the round-trip in
//! between. Owned fields keep values free of lifetimes so they can be stored
//! in call records and replayed in tests.

use serde::Serialize;

/// HTTP method of an endpoint. EnsEMBL only exposes GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Parse a configured method name, ignoring case.
    pub fn parse(method: &str) -> Option<Self> {
        if method.eq_ignore_ascii_case("get") {
            Some(HttpMethod::Get)
        } else if method.eq_ignore_ascii_case("post") {
            Some(HttpMethod::Post)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is fully resolved: server, substituted path and query string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Name/value pairs from every `Set-Cookie` header. Cookie attributes
    /// (`Path`, `Expires`, ...) are dropped.
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, value)| {
                let pair = value.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// A file sent alongside the form fields of a POST call.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: "application/octet-stream".to_string(),
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Encode form fields and attachments as a `multipart/form-data` body.
pub(crate) fn encode_multipart(
    boundary: &str,
    fields: &[(String, String)],
    attachments: &[Attachment],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", quote(name)).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for file in attachments {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                quote(&file.field),
                quote(&file.file_name)
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(&file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_ignores_case() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("Post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("PUT"), None);
        assert_eq!(HttpMethod::parse(""), None);
    }

    #[test]
    fn cookies_are_parsed_from_set_cookie_headers() {
        let response = HttpResponse {
            status: 200,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("set-cookie".to_string(), "session=abc123; Path=/; HttpOnly".to_string()),
                ("Set-Cookie".to_string(), "region = eu".to_string()),
                ("Set-Cookie".to_string(), "garbage".to_string()),
            ],
            body: Vec::new(),
        };
        assert_eq!(
            response.cookies(),
            vec![
                ("session".to_string(), "abc123".to_string()),
                ("region".to_string(), "eu".to_string()),
            ]
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn multipart_body_lists_fields_then_files() {
        let body = encode_multipart(
            "XyZ",
            &[("species".to_string(), "human".to_string())],
            &[Attachment::new("file", "input.vcf", b"1 100 . A T".to_vec()).with_content_type("text/plain")],
        );
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "--XyZ\r\n\
             Content-Disposition: form-data; name=\"species\"\r\n\r\n\
             human\r\n\
             --XyZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"input.vcf\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             1 100 . A T\r\n\
             --XyZ--\r\n"
        );
    }
}
