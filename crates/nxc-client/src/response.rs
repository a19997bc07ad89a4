//! Response classification.
//!
//! A [`Response`] wraps the raw transport result and decides success from
//! the declared [`SuccessPolicy`]. OCS bodies are unwrapped from their
//! `{"ocs": {"meta": ..., "data": ...}}` envelope, in which case the status
//! that counts is `meta.statuscode` rather than the HTTP status.

use std::cell::OnceCell;
use std::fmt;

use nxc_core::codes::UNSTRUCTURED_STATUS;
use serde_json::{Value, json};

use crate::transport::RawResponse;

/// Payload substituted when an OCS body is not valid JSON.
pub const UNPARSABLE_JSON_MESSAGE: &str = "Unable to parse JSON response";

/// Codes that count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// One code.
    Code(i64),
    /// Any of these codes.
    Codes(&'static [i64]),
    /// Codes per HTTP method. A method missing from the table never succeeds.
    PerMethod(&'static [(&'static str, &'static [i64])]),
}

impl SuccessPolicy {
    /// Returns the success codes for `method`.
    #[must_use]
    pub fn codes_for(&self, method: &str) -> &[i64] {
        match self {
            Self::Code(code) => std::slice::from_ref(code),
            Self::Codes(codes) => codes,
            Self::PerMethod(table) => table
                .iter()
                .find(|(m, _)| m.eq_ignore_ascii_case(method))
                .map_or(&[][..], |(_, codes)| *codes),
        }
    }

    /// Returns whether `status` counts as success for `method`.
    #[must_use]
    pub fn accepts(&self, method: &str, status: i64) -> bool {
        self.codes_for(method).contains(&status)
    }
}

/// How a body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    /// Plain HTTP, classified on the HTTP status.
    Plain,
    /// OCS JSON envelope, classified on `meta.statuscode`.
    Ocs,
    /// `WebDAV`, classified on the HTTP status.
    WebDav,
}

#[derive(Debug, Clone)]
struct OcsEnvelope {
    status: i64,
    meta: Value,
    data: Value,
    full: Option<Value>,
}

impl OcsEnvelope {
    fn decode(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(full) => match full.get("ocs") {
                Some(ocs) => {
                    let meta = ocs.get("meta").cloned().unwrap_or(Value::Null);
                    let status = meta
                        .get("statuscode")
                        .and_then(status_code_value)
                        .unwrap_or(UNSTRUCTURED_STATUS);
                    Self {
                        status,
                        data: ocs.get("data").cloned().unwrap_or(Value::Null),
                        meta,
                        full: Some(full),
                    }
                }
                None => Self {
                    status: UNSTRUCTURED_STATUS,
                    meta: full.clone(),
                    data: full.clone(),
                    full: Some(full),
                },
            },
            Err(err) => {
                tracing::warn!(error = %err, body_len = body.len(), "OCS body is not JSON");
                let data = json!({ "message": UNPARSABLE_JSON_MESSAGE });
                Self {
                    status: UNSTRUCTURED_STATUS,
                    meta: data.clone(),
                    data,
                    full: None,
                }
            }
        }
    }
}

fn status_code_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Classified server response.
///
/// Payload decoding and the success flag are computed on first access.
pub struct Response {
    raw: RawResponse,
    kind: ApiKind,
    policy: SuccessPolicy,
    ocs: OnceCell<OcsEnvelope>,
    json: OnceCell<Option<Value>>,
    text: OnceCell<String>,
    is_ok: OnceCell<bool>,
}

impl Response {
    #[must_use]
    pub fn new(raw: RawResponse, kind: ApiKind, policy: SuccessPolicy) -> Self {
        Self {
            raw,
            kind,
            policy,
            ocs: OnceCell::new(),
            json: OnceCell::new(),
            text: OnceCell::new(),
            is_ok: OnceCell::new(),
        }
    }

    fn envelope(&self) -> Option<&OcsEnvelope> {
        (self.kind == ApiKind::Ocs).then(|| self.ocs.get_or_init(|| OcsEnvelope::decode(&self.raw.body)))
    }

    /// Whether the request achieved its purpose, according to the policy
    /// for the method that was executed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        *self
            .is_ok
            .get_or_init(|| self.policy.accepts(&self.raw.method, self.status_code()))
    }

    /// The status code the policy is applied to: `meta.statuscode` for OCS
    /// (`-1` without envelope), the HTTP status otherwise.
    #[must_use]
    pub fn status_code(&self) -> i64 {
        self.envelope()
            .map_or_else(|| i64::from(self.raw.status), |envelope| envelope.status)
    }

    /// HTTP status code.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.raw.status
    }

    /// HTTP method that was executed.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.raw.method
    }

    #[must_use]
    pub fn kind(&self) -> ApiKind {
        self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    #[must_use]
    pub fn raw_body(&self) -> &[u8] {
        &self.raw.body
    }

    /// Consumes the response and returns the body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.raw.body
    }

    /// Decoded JSON payload.
    ///
    /// For OCS this is the envelope's `data`, the whole body when there is
    /// no envelope, or a diagnostic object when the body is not JSON. For
    /// other kinds it is the body parsed as JSON, if it parses.
    #[must_use]
    pub fn json_payload(&self) -> Option<&Value> {
        match self.envelope() {
            Some(envelope) => Some(&envelope.data),
            None => self
                .json
                .get_or_init(|| serde_json::from_slice(&self.raw.body).ok())
                .as_ref(),
        }
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn text_payload(&self) -> &str {
        self.text
            .get_or_init(|| String::from_utf8_lossy(&self.raw.body).into_owned())
    }

    /// OCS `meta` object (the whole body without envelope).
    #[must_use]
    pub fn meta(&self) -> Option<&Value> {
        self.envelope().map(|envelope| &envelope.meta)
    }

    /// Full OCS JSON document, when the body was JSON.
    #[must_use]
    pub fn full_data(&self) -> Option<&Value> {
        self.envelope().and_then(|envelope| envelope.full.as_ref())
    }

    /// `Content-Location` header, set by the server on resource creation.
    #[must_use]
    pub fn content_location(&self) -> Option<&str> {
        self.raw.header("Content-Location")
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.header(name)
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            ApiKind::Ocs => "OcsResponse",
            ApiKind::WebDav => "WebDavResponse",
            ApiKind::Plain => "Response",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_ok() { "OK" } else { "Failed" };
        write!(f, "<{}: Status: {}>", self.type_name(), status)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("kind", &self.kind)
            .field("method", &self.raw.method)
            .field("url", &self.raw.url)
            .field("http_status", &self.raw.status)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// A response together with a value extracted from it.
#[derive(Debug)]
pub struct DataResponse<T> {
    response: Response,
    data: Option<T>,
}

impl<T> DataResponse<T> {
    #[must_use]
    pub fn new(response: Response, data: Option<T>) -> Self {
        Self { response, data }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.response.is_ok()
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn into_parts(self) -> (Response, Option<T>) {
        (self.response, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEBDAV: SuccessPolicy = SuccessPolicy::PerMethod(&[("PROPFIND", &[207])]);

    fn raw(method: &str, status: u16, body: &str) -> RawResponse {
        RawResponse {
            method: method.to_owned(),
            url: "https://cloud.example.com/ocs/v1.php/cloud/capabilities".to_owned(),
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn policy_resolution() {
        assert_eq!(SuccessPolicy::Code(100).codes_for("GET"), [100]);
        assert_eq!(SuccessPolicy::Codes(&[201, 204]).codes_for("MOVE"), [201, 204]);
        assert_eq!(WEBDAV.codes_for("propfind"), [207]);
        assert!(WEBDAV.codes_for("DELETE").is_empty());
    }

    #[test]
    fn per_method_policy() {
        let found = Response::new(raw("PROPFIND", 207, ""), ApiKind::WebDav, WEBDAV);
        assert!(found.is_ok());
        assert_eq!(found.status_code(), 207);

        let deleted = Response::new(raw("DELETE", 207, ""), ApiKind::WebDav, WEBDAV);
        assert!(!deleted.is_ok());
    }

    #[test]
    fn ocs_envelope() {
        let body = r#"{"ocs":{"meta":{"status":"ok","statuscode":100},"data":{"id":"42"}}}"#;
        let response = Response::new(raw("GET", 200, body), ApiKind::Ocs, SuccessPolicy::Code(100));
        assert!(response.is_ok());
        assert_eq!(response.status_code(), 100);
        assert_eq!(response.json_payload(), Some(&json!({"id": "42"})));
        assert_eq!(response.meta().and_then(|m| m.get("status")), Some(&json!("ok")));
        assert!(response.full_data().is_some());
    }

    #[test]
    fn ocs_failure_code() {
        let body = r#"{"ocs":{"meta":{"statuscode":"998"},"data":[]}}"#;
        let response = Response::new(raw("GET", 200, body), ApiKind::Ocs, SuccessPolicy::Code(100));
        assert!(!response.is_ok());
        assert_eq!(response.status_code(), 998);
    }

    #[test]
    fn ocs_without_envelope() {
        let response = Response::new(
            raw("GET", 200, r#"{"installed": true}"#),
            ApiKind::Ocs,
            SuccessPolicy::Code(100),
        );
        assert_eq!(response.status_code(), UNSTRUCTURED_STATUS);
        assert!(!response.is_ok());
        assert_eq!(response.json_payload(), Some(&json!({"installed": true})));
        assert_eq!(response.meta(), response.json_payload());
    }

    #[test_log::test]
    fn ocs_malformed_json() {
        let response = Response::new(
            raw("GET", 500, "<html>oops</html>"),
            ApiKind::Ocs,
            SuccessPolicy::Code(100),
        );
        assert_eq!(response.status_code(), -1);
        assert!(!response.is_ok());
        assert_eq!(
            response.json_payload(),
            Some(&json!({"message": "Unable to parse JSON response"}))
        );
        assert_eq!(response.http_status(), 500);
        assert_eq!(response.text_payload(), "<html>oops</html>");
    }

    #[test]
    fn webdav_payload_is_raw() {
        let response = Response::new(
            raw("GET", 200, "plain file contents"),
            ApiKind::WebDav,
            WEBDAV,
        );
        assert_eq!(response.json_payload(), None);
        assert_eq!(response.raw_body(), b"plain file contents");
        assert!(response.meta().is_none());
        assert!(!response.is_ok());
    }

    #[test]
    fn display() {
        let ok = Response::new(
            raw("GET", 200, r#"{"ocs":{"meta":{"statuscode":100},"data":{}}}"#),
            ApiKind::Ocs,
            SuccessPolicy::Code(100),
        );
        assert_eq!(ok.to_string(), "<OcsResponse: Status: OK>");

        let failed = Response::new(raw("DELETE", 404, ""), ApiKind::WebDav, WEBDAV);
        assert_eq!(failed.to_string(), "<WebDavResponse: Status: Failed>");
    }
}
