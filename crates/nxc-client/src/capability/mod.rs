//! Capability modules and their composition.
//!
//! A capability module declares an API prefix, how its responses are
//! classified and the named operations it offers. Modules are collected in
//! a [`CapabilityRegistry`] and composed into one facade by
//! [`crate::facade::FacadeBuilder`].

mod args;
mod decorator;
mod registry;

use std::any::Any;
use std::sync::Arc;

use nxc_core::codes::{ocs, provisioning, webdav};

pub use args::{OperationArgs, Outcome};
pub use decorator::{EntityList, EntityOne, ObjectDecorator};
pub use registry::{CapabilityRegistry, builtin_registry, register_builtin};

use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::{ApiKind, SuccessPolicy};

/// Success codes of `WebDAV` methods. Methods not listed never succeed.
pub const WEBDAV_SUCCESS_CODES: &[(&str, &[i64])] = &[
    ("PROPFIND", &[webdav::MULTISTATUS]),
    ("PROPPATCH", &[webdav::MULTISTATUS]),
    ("REPORT", &[webdav::MULTISTATUS]),
    ("MKCOL", &[webdav::CREATED]),
    ("COPY", &[webdav::CREATED, webdav::NO_CONTENT]),
    ("MOVE", &[webdav::CREATED, webdav::NO_CONTENT]),
    ("PUT", &[webdav::CREATED]),
    ("POST", &[webdav::CREATED]),
    ("DELETE", &[webdav::NO_CONTENT]),
];

/// Static description of a capability module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityDecl {
    pub name: &'static str,
    /// API prefix below the server URL; `None` for abstract bases.
    pub api_url: Option<&'static str>,
    pub kind: ApiKind,
    pub success: SuccessPolicy,
    /// Whether the module may ask the server for JSON output.
    pub json_able: bool,
    /// Unverified modules are never registered.
    pub verified: bool,
}

impl CapabilityDecl {
    /// Declares an abstract base without API prefix.
    #[must_use]
    pub const fn base(name: &'static str, kind: ApiKind, success: SuccessPolicy, json_able: bool) -> Self {
        Self {
            name,
            api_url: None,
            kind,
            success,
            json_able,
            verified: true,
        }
    }

    /// Derives a concrete module from this base.
    #[must_use]
    pub const fn with_url(self, name: &'static str, api_url: &'static str) -> Self {
        Self {
            name,
            api_url: Some(api_url),
            ..self
        }
    }

    /// Marks the module as unverified.
    #[must_use]
    pub const fn unverified(self) -> Self {
        Self {
            verified: false,
            ..self
        }
    }

    /// Concrete and verified.
    #[must_use]
    pub const fn is_registrable(&self) -> bool {
        self.api_url.is_some() && self.verified
    }
}

/// Provisioning API base (success code 100).
pub const PROVISIONING_API: CapabilityDecl = CapabilityDecl::base(
    "ProvisioningApi",
    ApiKind::Ocs,
    SuccessPolicy::Code(provisioning::SUCCESS),
    true,
);

/// OCS v1 base (success code 100).
pub const OCS_V1_API: CapabilityDecl =
    CapabilityDecl::base("OcsV1Api", ApiKind::Ocs, SuccessPolicy::Code(ocs::SUCCESS_V1), true);

/// OCS v2 base (success code 200).
pub const OCS_V2_API: CapabilityDecl =
    CapabilityDecl::base("OcsV2Api", ApiKind::Ocs, SuccessPolicy::Code(ocs::SUCCESS_V2), true);

/// `WebDAV` base (per-method success codes).
pub const WEBDAV_API: CapabilityDecl = CapabilityDecl::base(
    "WebDavApi",
    ApiKind::WebDav,
    SuccessPolicy::PerMethod(WEBDAV_SUCCESS_CODES),
    false,
);

/// Runtime side of a capability module.
///
/// The operations a provider answers are declared on its
/// [`CapabilityModule`], which the facade dispatches from.
pub trait Provider: Send + Sync {
    /// Runs `operation` with dynamically typed arguments.
    ///
    /// ## Errors
    /// Returns `ClientError::UnknownOperation` for a name not listed in
    /// [`CapabilityModule::operations`], `ClientError::InvalidArgument` for missing
    /// or ill-typed arguments, or the operation's own error.
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome>;

    /// Typed access to the concrete provider.
    fn as_any(&self) -> &dyn Any;
}

/// Builds a provider around a requester bound to its declaration.
pub type ProviderFactory = fn(Arc<Requester>) -> Box<dyn Provider>;

/// A capability declaration, the operations it offers and its provider
/// factory.
///
/// Operations are declared statically so that a facade can detect name
/// clashes before any provider is built.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityModule {
    pub decl: &'static CapabilityDecl,
    pub operations: &'static [&'static str],
    pub factory: ProviderFactory,
}

impl CapabilityModule {
    #[must_use]
    pub const fn new(
        decl: &'static CapabilityDecl,
        operations: &'static [&'static str],
        factory: ProviderFactory,
    ) -> Self {
        Self {
            decl,
            operations,
            factory,
        }
    }
}
