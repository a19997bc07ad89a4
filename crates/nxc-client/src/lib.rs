//! Nextcloud client built from capability modules.
//!
//! Every server API the client speaks is a capability module: an API prefix,
//! a success policy for classifying responses and a set of named operations.
//! [`FacadeBuilder`] composes the modules into one [`NextCloud`] client bound
//! to a [`Session`].
//!
//! ```no_run
//! use nxc_client::NextCloud;
//! use nxc_client::api::WebDav;
//!
//! # fn run(settings: &nxc_core::config::Settings) -> nxc_client::ClientResult<()> {
//! let client = NextCloud::from_settings(settings)?;
//! if let Some(webdav) = client.capability::<WebDav>() {
//!     let listing = webdav.list_folders("Documents", &Default::default())?;
//!     for entity in listing.items() {
//!         println!("{}", entity.href());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod capability;
pub mod error;
pub mod facade;
pub mod requester;
pub mod response;
pub mod session;
pub mod transport;

pub use capability::{OperationArgs, Outcome};
pub use error::{ClientError, ClientResult};
pub use facade::{ComposedFacade, FacadeBuilder, NextCloud};
pub use response::{DataResponse, Response};
pub use session::Session;
pub use transport::{HttpRequest, HttpTransport, RawResponse, Transport};
