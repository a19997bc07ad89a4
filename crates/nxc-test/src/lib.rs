//! Test support for the `nxc` client crates.
//!
//! Provides a scripted [`MockTransport`] that records every request and
//! answers from a queue, plus builders for the multistatus and OCS bodies a
//! Nextcloud server sends back.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use nxc_client::{
    ClientError, ClientResult, FacadeBuilder, HttpRequest, NextCloud, RawResponse, Session,
    Transport,
};
use serde_json::{Value, json};

pub use nxc_client as client;
pub use nxc_dav as dav;

/// Server URL used by [`client_over`].
pub const SERVER: &str = "https://cloud.example.com";

/// User name used by [`client_over`].
pub const USER: &str = "alice";

/// A canned answer of [`MockTransport`].
#[derive(Debug, Clone)]
pub struct Scripted {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Scripted {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

/// Transport answering from a queue of scripted responses.
///
/// Requests are recorded in the order they were sent. Running out of
/// scripted responses is a transport error.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues `response` behind the already scripted ones.
    pub fn push(&self, response: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queues a response with `status` and `body`.
    pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.push(Scripted::new(status, body));
    }

    /// Requests sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of scripted responses not consumed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        tracing::trace!(method = %request.method, url = %request.url, scripted = scripted.is_some(), "Mock request");
        let method = request.method.clone();
        let url = request.url.clone();
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let scripted = scripted.ok_or_else(|| {
            ClientError::Transport(format!("no scripted response for {method} {url}"))
        })?;
        Ok(RawResponse {
            method,
            url,
            status: scripted.status,
            headers: scripted.headers,
            body: scripted.body,
        })
    }
}

/// Session of [`USER`] on [`SERVER`] over `transport`.
#[must_use]
pub fn session_over(transport: &Arc<MockTransport>) -> Arc<Session> {
    let transport: Arc<dyn Transport> = Arc::<MockTransport>::clone(transport);
    Arc::new(Session::new(SERVER, USER, transport))
}

/// Client with every built-in module over `transport`.
///
/// ## Panics
/// Panics if the built-in modules cannot be composed.
#[must_use]
#[expect(clippy::expect_used, reason = "test support; composition failure is a test failure")]
pub fn client_over(transport: &Arc<MockTransport>, json_output: bool) -> NextCloud {
    FacadeBuilder::new()
        .with_builtin()
        .json_output(json_output)
        .compose()
        .expect("built-in modules compose")
        .bind(session_over(transport))
}

/// One `d:response` of a multistatus body.
#[derive(Debug, Clone)]
pub struct DavEntry {
    href: String,
    props: Vec<(String, String)>,
    missing: Vec<String>,
}

impl DavEntry {
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_owned(),
            props: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Adds a found property. `name` is prefixed (`oc:fileid`) and `inner`
    /// is inserted as raw XML.
    #[must_use]
    pub fn prop(mut self, name: &str, inner: &str) -> Self {
        self.props.push((name.to_owned(), inner.to_owned()));
        self
    }

    /// Marks the entry as a folder.
    #[must_use]
    pub fn collection(self) -> Self {
        self.prop("d:resourcetype", "<d:collection/>")
    }

    /// Adds a property reported with `404 Not Found`.
    #[must_use]
    pub fn missing(mut self, name: &str) -> Self {
        self.missing.push(name.to_owned());
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str("<d:response><d:href>");
        out.push_str(&self.href);
        out.push_str("</d:href><d:propstat><d:prop>");
        for (name, inner) in &self.props {
            if inner.is_empty() {
                out.push_str(&format!("<{name}/>"));
            } else {
                out.push_str(&format!("<{name}>{inner}</{name}>"));
            }
        }
        out.push_str("</d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat>");
        if !self.missing.is_empty() {
            out.push_str("<d:propstat><d:prop>");
            for name in &self.missing {
                out.push_str(&format!("<{name}/>"));
            }
            out.push_str("</d:prop><d:status>HTTP/1.1 404 Not Found</d:status></d:propstat>");
        }
        out.push_str("</d:response>");
    }
}

/// Renders a multistatus document with the `d`, `oc` and `nc` prefixes.
#[must_use]
pub fn multistatus(entries: &[DavEntry]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0"?><d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">"#,
    );
    for entry in entries {
        entry.render(&mut out);
    }
    out.push_str("</d:multistatus>");
    out
}

/// Renders an OCS JSON envelope.
#[must_use]
pub fn ocs(status: &str, statuscode: i64, data: Value) -> String {
    json!({
        "ocs": {
            "meta": {
                "status": status,
                "statuscode": statuscode,
                "message": "OK",
            },
            "data": data,
        }
    })
    .to_string()
}

/// Href of `path` below the user's files.
#[must_use]
pub fn file_href(path: &str) -> String {
    format!("/remote.php/dav/files/{USER}/{path}")
}
