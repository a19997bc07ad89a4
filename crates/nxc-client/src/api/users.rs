use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::USERS_API_URL;

use super::unknown_operation;
use crate::capability::{
    CapabilityDecl, CapabilityModule, OperationArgs, Outcome, PROVISIONING_API, Provider,
};
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::Response;

pub static USERS: CapabilityDecl = PROVISIONING_API.with_url("Users", USERS_API_URL);

pub static USERS_MODULE: CapabilityModule = CapabilityModule::new(&USERS, OPERATIONS, Users::provider);

const OPERATIONS: &[&str] = &["get_user"];

/// User provisioning (read side).
#[derive(Debug, Clone)]
pub struct Users {
    requester: Arc<Requester>,
}

impl Users {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    /// Fetches a user's details, the session user when `user_id` is `None`.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn get_user(&self, user_id: Option<&str>) -> ClientResult<Response> {
        let user_id = user_id.unwrap_or_else(|| self.requester.user());
        self.requester.get(user_id, &[])
    }
}

impl Provider for Users {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        match operation {
            "get_user" => Ok(self.get_user(args.opt_str("user_id")?)?.into()),
            other => Err(unknown_operation(&self.requester, other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
