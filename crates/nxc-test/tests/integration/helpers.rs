#![expect(clippy::expect_used, reason = "test helpers")]
//! Shared helpers for the integration tests.

use std::sync::Arc;

pub use nxc_client::transport::HttpRequest;
pub use nxc_client::{ClientError, NextCloud, OperationArgs};
pub use nxc_test::{DavEntry, MockTransport, Scripted, SERVER, USER, client_over, file_href, multistatus, ocs};

/// Client in XML mode plus the transport behind it.
pub fn dav_client() -> (Arc<MockTransport>, NextCloud) {
    let transport = MockTransport::new();
    let client = client_over(&transport, false);
    (transport, client)
}

/// Client in JSON mode plus the transport behind it.
pub fn ocs_client() -> (Arc<MockTransport>, NextCloud) {
    let transport = MockTransport::new();
    let client = client_over(&transport, true);
    (transport, client)
}

/// Request body as text.
pub fn body_text(request: &HttpRequest) -> String {
    let body = request.body.clone().unwrap_or_default();
    String::from_utf8(body).expect("request body is UTF-8")
}

/// URL below the server root.
pub fn url(path: &str) -> String {
    format!("{SERVER}{path}")
}
