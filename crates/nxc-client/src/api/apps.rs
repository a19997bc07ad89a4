//! Provisioning API for server apps.

use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::APPS_API_URL;

use super::unknown_operation;
use crate::capability::{
    CapabilityDecl, CapabilityModule, OperationArgs, Outcome, PROVISIONING_API, Provider,
};
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::Response;

pub static APPS: CapabilityDecl = PROVISIONING_API.with_url("Apps", APPS_API_URL);

pub static APPS_MODULE: CapabilityModule = CapabilityModule::new(&APPS, OPERATIONS, Apps::provider);

const OPERATIONS: &[&str] = &["get_apps", "get_app", "enable_app", "disable_app"];

/// Lists, inspects, enables and disables server apps.
#[derive(Debug, Clone)]
pub struct Apps {
    requester: Arc<Requester>,
}

impl Apps {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    /// Lists installed apps, optionally only `enabled` or `disabled` ones.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn get_apps(&self, filter: Option<&str>) -> ClientResult<Response> {
        let params: Vec<_> = filter.map(|f| ("filter", f.to_owned())).into_iter().collect();
        self.requester.get("", &params)
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn get_app(&self, app_id: &str) -> ClientResult<Response> {
        self.requester.get(app_id, &[])
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn enable_app(&self, app_id: &str) -> ClientResult<Response> {
        self.requester.post(app_id)
    }

    /// ## Errors
    /// Returns a transport error.
    pub fn disable_app(&self, app_id: &str) -> ClientResult<Response> {
        self.requester.delete(app_id)
    }
}

impl Provider for Apps {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        let response = match operation {
            "get_apps" => self.get_apps(args.opt_str("filter")?)?,
            "get_app" => self.get_app(args.str("app_id")?)?,
            "enable_app" => self.enable_app(args.str("app_id")?)?,
            "disable_app" => self.disable_app(args.str("app_id")?)?,
            other => return Err(unknown_operation(&self.requester, other)),
        };
        Ok(response.into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
