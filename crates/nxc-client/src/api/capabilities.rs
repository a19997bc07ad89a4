use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::CAPABILITIES_API_URL;

use super::unknown_operation;
use crate::capability::{CapabilityDecl, CapabilityModule, OCS_V1_API, OperationArgs, Outcome, Provider};
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::Response;

pub static CAPABILITIES: CapabilityDecl = OCS_V1_API.with_url("Capabilities", CAPABILITIES_API_URL);

pub static CAPABILITIES_MODULE: CapabilityModule =
    CapabilityModule::new(&CAPABILITIES, OPERATIONS, Capabilities::provider);

const OPERATIONS: &[&str] = &["get_capabilities"];

/// Server and app capabilities.
#[derive(Debug, Clone)]
pub struct Capabilities {
    requester: Arc<Requester>,
}

impl Capabilities {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn get_capabilities(&self) -> ClientResult<Response> {
        self.requester.get("", &[])
    }
}

impl Provider for Capabilities {
    fn call(&self, operation: &str, _args: &OperationArgs) -> ClientResult<Outcome> {
        match operation {
            "get_capabilities" => Ok(self.get_capabilities()?.into()),
            other => Err(unknown_operation(&self.requester, other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
