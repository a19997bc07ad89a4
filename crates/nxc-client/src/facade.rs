//! Composed client facade.
//!
//! A [`FacadeBuilder`] collects capability modules, [`FacadeBuilder::compose`]
//! builds the operation table and rejects duplicate names, and
//! [`ComposedFacade::bind`] attaches the table to a session, giving a
//! [`NextCloud`] client.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use nxc_core::config::Settings;
use serde_json::Value;

use crate::capability::{
    CapabilityModule, CapabilityRegistry, OperationArgs, Outcome, Provider, builtin_registry,
};
use crate::error::{ClientError, ClientResult};
use crate::requester::Requester;
use crate::session::Session;

/// Collects the modules a client is composed of.
#[derive(Debug, Clone)]
pub struct FacadeBuilder {
    registry: CapabilityRegistry,
    json_output: bool,
}

impl Default for FacadeBuilder {
    fn default() -> Self {
        Self {
            registry: CapabilityRegistry::new(),
            json_output: true,
        }
    }
}

impl FacadeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the modules of `registry`.
    #[must_use]
    pub fn from_registry(registry: &CapabilityRegistry) -> Self {
        Self {
            registry: registry.clone(),
            ..Self::default()
        }
    }

    /// Adds every built-in module.
    #[must_use]
    pub fn with_builtin(mut self) -> Self {
        for module in builtin_registry().modules() {
            self.registry.register(*module);
        }
        self
    }

    /// Adds `module`. Abstract and unverified modules are skipped.
    #[must_use]
    pub fn register(mut self, module: CapabilityModule) -> Self {
        self.registry.register(module);
        self
    }

    #[must_use]
    pub fn json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Builds the operation table.
    ///
    /// ## Errors
    /// Returns `ClientError::DuplicateOperation` if two modules offer the
    /// same operation name.
    pub fn compose(self) -> ClientResult<ComposedFacade> {
        let modules: Arc<[CapabilityModule]> = self.registry.modules().into();
        let mut table: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (index, module) in modules.iter().enumerate() {
            for &operation in module.operations {
                if let Some(&first) = table.get(operation) {
                    let first: &CapabilityModule = &modules[first];
                    return Err(ClientError::DuplicateOperation {
                        operation: operation.to_owned(),
                        first: first.decl.name.to_owned(),
                        second: module.decl.name.to_owned(),
                    });
                }
                table.insert(operation, index);
            }
        }
        tracing::debug!(
            modules = modules.len(),
            operations = table.len(),
            "Facade composed"
        );
        Ok(ComposedFacade {
            modules,
            table: Arc::new(table),
            json_output: self.json_output,
        })
    }
}

/// Operation table not yet bound to a session.
#[derive(Debug, Clone)]
pub struct ComposedFacade {
    modules: Arc<[CapabilityModule]>,
    table: Arc<BTreeMap<&'static str, usize>>,
    json_output: bool,
}

impl ComposedFacade {
    /// Operation names in lexical order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    #[must_use]
    pub fn modules(&self) -> &[CapabilityModule] {
        &self.modules
    }

    /// Builds one provider per module over `session`.
    #[must_use]
    pub fn bind(self, session: Arc<Session>) -> NextCloud {
        let providers = self
            .modules
            .iter()
            .map(|module| {
                let requester = Requester::new(Arc::clone(&session), module.decl, self.json_output);
                (module.factory)(Arc::new(requester))
            })
            .collect();
        tracing::debug!(user = session.current_user(), url = session.base_url(), "Facade bound");
        NextCloud {
            session,
            composed: self,
            providers,
        }
    }
}

/// Client exposing every composed operation over one session.
pub struct NextCloud {
    session: Arc<Session>,
    composed: ComposedFacade,
    providers: Vec<Box<dyn Provider>>,
}

impl fmt::Debug for NextCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextCloud")
            .field("url", &self.session.base_url())
            .field("user", &self.session.current_user())
            .field("json_output", &self.composed.json_output)
            .field("operations", &self.composed.table.len())
            .finish_non_exhaustive()
    }
}

impl NextCloud {
    /// Client with every built-in module over a session built from
    /// `settings`.
    ///
    /// ## Errors
    /// Returns the session's construction error, or
    /// `ClientError::DuplicateOperation` if the built-in modules clash.
    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        let session = Session::from_settings(settings)?;
        let composed = FacadeBuilder::new()
            .with_builtin()
            .json_output(settings.client.json_output)
            .compose()?;
        Ok(composed.bind(Arc::new(session)))
    }

    /// Runs `operation` on the module that provides it.
    ///
    /// ## Errors
    /// Returns `ClientError::SessionClosed` after [`NextCloud::logout`],
    /// `ClientError::UnknownOperation` for a name no module provides, or the
    /// operation's own error.
    #[tracing::instrument(skip(self, args), fields(user = self.session.current_user()))]
    pub fn call(&self, operation: &str, args: &OperationArgs) -> ClientResult<Outcome> {
        if !self.session.is_open() {
            return Err(ClientError::SessionClosed);
        }
        let index = *self
            .composed
            .table
            .get(operation)
            .ok_or_else(|| ClientError::UnknownOperation(operation.to_owned()))?;
        self.providers[index].call(operation, args)
    }

    /// Typed access to a composed module, as in
    /// `client.capability::<WebDav>()`.
    #[must_use]
    pub fn capability<T: Provider + 'static>(&self) -> Option<&T> {
        self.providers
            .iter()
            .find_map(|provider| provider.as_any().downcast_ref::<T>())
    }

    /// Operation names in lexical order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.composed.operations()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn user(&self) -> &str {
        self.session.current_user()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.session.base_url()
    }

    #[must_use]
    pub fn json_output(&self) -> bool {
        self.composed.json_output
    }

    /// Re-opens the session after [`NextCloud::logout`].
    pub fn login(&self) {
        self.session.open();
    }

    /// Closes the session for this client and every client sharing it.
    /// Returns whether it was open.
    pub fn logout(&self) -> bool {
        self.session.close()
    }

    /// A client over the same session with different output format.
    #[must_use]
    pub fn with_json_output(&self, json_output: bool) -> Self {
        let mut composed = self.composed.clone();
        composed.json_output = json_output;
        composed.bind(Arc::clone(&self.session))
    }

    /// A client over the same session with attribute `name` set to `value`.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` for an unknown attribute or a
    /// value of the wrong type.
    pub fn with_attr(&self, name: &str, value: &Value) -> ClientResult<Self> {
        match name {
            "json_output" => value
                .as_bool()
                .map(|json_output| self.with_json_output(json_output))
                .ok_or_else(|| {
                    ClientError::InvalidArgument(format!("json_output must be a boolean, got {value}"))
                }),
            other => Err(ClientError::InvalidArgument(format!(
                "{other:?} is not a client attribute"
            ))),
        }
    }
}
