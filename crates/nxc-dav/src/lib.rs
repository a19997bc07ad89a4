//! `WebDAV` property mapping for the `nxc` client.
//!
//! Maps namespaced `WebDAV` properties onto entity attributes, builds
//! `PROPFIND`/`PROPPATCH`/`REPORT` request bodies and decodes multistatus
//! responses into entities.

pub mod dav;
pub mod error;
pub mod schemas;

pub use error::{DavError, DavResult};
pub use schemas::catalog;
