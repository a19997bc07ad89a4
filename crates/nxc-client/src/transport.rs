//! HTTP transport abstraction.
//!
//! Everything above this module speaks in [`HttpRequest`] / [`RawResponse`]
//! values. [`HttpTransport`] executes them with a blocking `reqwest` client;
//! tests plug in scripted transports instead.

use std::fmt;
use std::time::Duration;

use nxc_core::config::{AuthConfig, ClientConfig};

use crate::error::{ClientError, ClientResult};

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method in upper case (`GET`, `PROPFIND`, ...).
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the first value of a header, compared case-insensitively.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// What came back from the server, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Method of the request that produced this response.
    pub method: String,
    /// URL of the request that produced this response.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the first value of a header, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes HTTP requests.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends `request` and returns the server's answer, whatever its status.
    ///
    /// ## Errors
    /// Returns `ClientError::Transport` when no response was received.
    fn execute(&self, request: HttpRequest) -> ClientResult<RawResponse>;
}

/// Blocking `reqwest` transport with HTTP basic authentication.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    user: Option<String>,
    password: Option<String>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Builds a transport from the `auth` and `client` configuration sections.
    ///
    /// ## Errors
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(auth: &AuthConfig, client: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(client.timeout_secs))
            .build()?;
        Ok(Self {
            client: http,
            user: auth.user.clone(),
            password: auth.password.clone(),
        })
    }
}

impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    fn execute(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| ClientError::InvalidArgument(format!("HTTP method: {e}")))?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(user) = &self.user {
            builder = builder.basic_auth(user, self.password.as_deref());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body = response.bytes()?.to_vec();

        tracing::debug!(status, body_len = body.len(), "Received response");
        Ok(RawResponse {
            method: request.method,
            url: request.url,
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = RawResponse {
            method: "POST".to_owned(),
            url: "https://cloud.example.com/remote.php/dav/systemtags".to_owned(),
            status: 201,
            headers: vec![(
                "content-location".to_owned(),
                "/remote.php/dav/systemtags/7".to_owned(),
            )],
            body: Vec::new(),
        };
        assert_eq!(response.header("Content-Location"), Some("/remote.php/dav/systemtags/7"));
        assert_eq!(response.header("Etag"), None);
    }

    #[test]
    fn request_builder() {
        let request = HttpRequest::new("PROPFIND", "https://cloud.example.com/x")
            .header("Depth", "1")
            .body("<d:propfind/>");
        assert_eq!(request.header_value("depth"), Some("1"));
        assert_eq!(request.body.as_deref(), Some(b"<d:propfind/>".as_slice()));
    }
}
