//! Per-capability request helpers.

use std::sync::{Arc, Weak};

use nxc_core::constants::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, OCS_API_REQUEST_HEADER, XML_CONTENT_TYPE};
use nxc_dav::dav::core::Origin;
use serde_json::Value;

use crate::capability::CapabilityDecl;
use crate::error::{ClientError, ClientResult};
use crate::response::Response;
use crate::session::Session;
use crate::transport::HttpRequest;

/// `PROPFIND` depth header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
    Infinity,
}

impl Depth {
    #[must_use]
    pub fn as_header(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }

    /// Parses a numeric depth; anything above one means infinity.
    #[must_use]
    pub fn from_level(level: u64) -> Self {
        match level {
            0 => Self::Zero,
            1 => Self::One,
            _ => Self::Infinity,
        }
    }
}

/// Builds and sends the requests of one capability module.
///
/// URLs are `base_url + api_url + "/" + path`. OCS modules that can answer
/// in JSON get `?format=json` appended when the client asks for JSON output.
#[derive(Debug)]
pub struct Requester {
    session: Arc<Session>,
    decl: &'static CapabilityDecl,
    json_output: bool,
}

impl Requester {
    #[must_use]
    pub fn new(session: Arc<Session>, decl: &'static CapabilityDecl, json_output: bool) -> Self {
        Self {
            session,
            decl,
            json_output,
        }
    }

    /// A requester for another capability over the same session.
    #[must_use]
    pub fn sibling(&self, decl: &'static CapabilityDecl) -> Arc<Self> {
        Arc::new(Self::new(Arc::clone(&self.session), decl, self.json_output))
    }

    #[must_use]
    pub fn decl(&self) -> &'static CapabilityDecl {
        self.decl
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Handle attached to decoded entities so they can issue follow-up
    /// requests over the same session.
    #[must_use]
    pub fn origin(&self) -> Origin {
        let session: Weak<Session> = Arc::downgrade(&self.session);
        session
    }

    /// Name of the session user.
    #[must_use]
    pub fn user(&self) -> &str {
        self.session.current_user()
    }

    /// Whether responses of this capability are requested as JSON.
    #[must_use]
    pub fn json_output(&self) -> bool {
        self.decl.json_able && self.json_output
    }

    /// Builds the absolute URL of `path` below the capability prefix.
    #[must_use]
    pub fn full_url(&self, path: &str) -> String {
        let mut url = format!(
            "{}{}",
            self.session.base_url(),
            self.decl.api_url.unwrap_or_default()
        );
        if !path.is_empty() {
            if !path.starts_with('/') {
                url.push('/');
            }
            url.push_str(path);
        }
        if self.json_output() {
            url.push_str("?format=json");
        }
        url
    }

    fn read_request(&self, method: &str, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.full_url(path)).header(OCS_API_REQUEST_HEADER, "true")
    }

    fn write_request(&self, method: &str, path: &str) -> HttpRequest {
        self.read_request(method, path)
            .header("Content-Type", FORM_CONTENT_TYPE)
    }

    fn dav_request(&self, method: &str, path: &str, body: Option<String>) -> HttpRequest {
        let request = HttpRequest::new(method, self.full_url(path));
        match body {
            Some(body) => request.header("Content-Type", XML_CONTENT_TYPE).body(body),
            None => request,
        }
    }

    #[tracing::instrument(skip(self, request), fields(capability = self.decl.name, method = %request.method, url = %request.url))]
    fn send(&self, request: HttpRequest) -> ClientResult<Response> {
        tracing::debug!("Dispatching request");
        let raw = self.session.execute(request)?;
        let response = Response::new(raw, self.decl.kind, self.decl.success);
        tracing::debug!(http_status = response.http_status(), "Request completed");
        Ok(response)
    }

    /// `GET` with query parameters.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` if the URL cannot be built, or
    /// a transport error.
    pub fn get(&self, path: &str, params: &[(&str, String)]) -> ClientResult<Response> {
        let mut request = self.read_request("GET", path);
        if !params.is_empty() {
            let mut url = reqwest::Url::parse(&request.url)
                .map_err(|e| ClientError::InvalidArgument(format!("URL {}: {e}", request.url)))?;
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
            request.url = url.to_string();
        }
        self.send(request)
    }

    /// `POST` without body.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn post(&self, path: &str) -> ClientResult<Response> {
        self.send(self.write_request("POST", path))
    }

    /// `POST` with a JSON body.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn post_json(&self, path: &str, payload: &Value) -> ClientResult<Response> {
        let request = self
            .read_request("POST", path)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(payload.to_string());
        self.send(request)
    }

    /// `PUT` with an optional body.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn put(&self, path: &str, body: Option<Vec<u8>>) -> ClientResult<Response> {
        self.put_with_timestamp(path, body, None)
    }

    /// `PUT` carrying the file modification time in `X-OC-MTIME`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn put_with_timestamp(
        &self,
        path: &str,
        body: Option<Vec<u8>>,
        timestamp: Option<i64>,
    ) -> ClientResult<Response> {
        let mut request = self.write_request("PUT", path);
        if let Some(timestamp) = timestamp {
            request = request.header("X-OC-MTIME", timestamp.to_string());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        self.send(request)
    }

    /// `DELETE`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn delete(&self, path: &str) -> ClientResult<Response> {
        self.send(self.write_request("DELETE", path))
    }

    /// `GET` of a file body.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn download(&self, path: &str) -> ClientResult<Response> {
        self.send(self.read_request("GET", path))
    }

    /// `PROPFIND` with an optional body and depth.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn propfind(&self, path: &str, body: Option<String>, depth: Option<Depth>) -> ClientResult<Response> {
        let mut request = self.dav_request("PROPFIND", path, body);
        if let Some(depth) = depth {
            request = request.header("Depth", depth.as_header());
        }
        self.send(request)
    }

    /// `PROPPATCH`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn proppatch(&self, path: &str, body: String) -> ClientResult<Response> {
        self.send(self.dav_request("PROPPATCH", path, Some(body)))
    }

    /// `REPORT`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn report(&self, path: &str, body: String) -> ClientResult<Response> {
        self.send(self.dav_request("REPORT", path, Some(body)))
    }

    /// `MKCOL`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn make_collection(&self, path: &str) -> ClientResult<Response> {
        self.send(self.dav_request("MKCOL", path, None))
    }

    /// `MOVE` to `destination`, below the same prefix.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn move_to(&self, path: &str, destination: &str, overwrite: bool) -> ClientResult<Response> {
        self.send(self.transfer_request("MOVE", path, destination, overwrite))
    }

    /// `COPY` to `destination`, below the same prefix.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn copy_to(&self, path: &str, destination: &str, overwrite: bool) -> ClientResult<Response> {
        self.send(self.transfer_request("COPY", path, destination, overwrite))
    }

    fn transfer_request(&self, method: &str, path: &str, destination: &str, overwrite: bool) -> HttpRequest {
        self.dav_request(method, path, None)
            .header("Destination", self.full_url(destination))
            .header("Overwrite", if overwrite { "T" } else { "F" })
    }
}
