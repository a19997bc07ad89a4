//! Sharee (share recipient) search.

use std::any::Any;
use std::sync::Arc;

use nxc_core::constants::SHARING_API_URL;

use super::unknown_operation;
use crate::capability::{CapabilityDecl, CapabilityModule, OCS_V1_API, OperationArgs, Outcome, Provider};
use crate::error::ClientResult;
use crate::requester::Requester;
use crate::response::Response;

pub static SHAREE: CapabilityDecl = OCS_V1_API.with_url("Sharee", SHARING_API_URL);

pub static SHAREE_MODULE: CapabilityModule = CapabilityModule::new(&SHAREE, OPERATIONS, Sharee::provider);

const OPERATIONS: &[&str] = &["search_sharees"];

const SHAREES_PATH: &str = "sharees";

/// Item type searched when none is given.
pub const DEFAULT_ITEM_TYPE: &str = "file";

/// Parameters of [`Sharee::search_sharees`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareeQuery<'a> {
    pub search: &'a str,
    /// Also query the global lookup server.
    pub lookup: bool,
    pub per_page: Option<i64>,
    pub item_type: &'a str,
}

impl<'a> ShareeQuery<'a> {
    #[must_use]
    pub fn new(search: &'a str) -> Self {
        Self {
            search,
            lookup: false,
            per_page: None,
            item_type: DEFAULT_ITEM_TYPE,
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("search", self.search.to_owned()),
            ("itemType", self.item_type.to_owned()),
        ];
        if self.lookup {
            params.push(("lookup", "true".to_owned()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("perPage", per_page.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct Sharee {
    requester: Arc<Requester>,
}

impl Sharee {
    #[must_use]
    pub fn new(requester: Arc<Requester>) -> Self {
        Self { requester }
    }

    fn provider(requester: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Self::new(requester))
    }

    /// Searches users, groups and remotes a file can be shared with.
    ///
    /// ## Errors
    /// Returns a transport error.
    pub fn search_sharees(&self, query: &ShareeQuery<'_>) -> ClientResult<Response> {
        self.requester.get(SHAREES_PATH, &query.params())
    }
}

impl Provider for Sharee {
    fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        match operation {
            "search_sharees" => {
                let query = ShareeQuery {
                    search: args.str("search")?,
                    lookup: args.bool_or("lookup", false)?,
                    per_page: args.opt_i64("per_page")?,
                    item_type: args.opt_str("item_type")?.unwrap_or(DEFAULT_ITEM_TYPE),
                };
                Ok(self.search_sharees(&query)?.into())
            }
            other => Err(unknown_operation(&self.requester, other)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
