use std::sync::OnceLock;

use super::CapabilityModule;
use crate::api;

/// Append-only list of capability modules available for composition.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    modules: Vec<CapabilityModule>,
}

impl CapabilityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `module` unless it is abstract or unverified.
    ///
    /// Returns whether the module was accepted.
    pub fn register(&mut self, module: CapabilityModule) -> bool {
        if !module.decl.is_registrable() {
            tracing::debug!(
                capability = module.decl.name,
                abstract_base = module.decl.api_url.is_none(),
                verified = module.decl.verified,
                "Capability not registered"
            );
            return false;
        }
        self.modules.push(module);
        true
    }

    /// Modules in registration order.
    #[must_use]
    pub fn modules(&self) -> &[CapabilityModule] {
        &self.modules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Registers every built-in capability module.
pub fn register_builtin(registry: &mut CapabilityRegistry) {
    for module in [
        api::apps::APPS_MODULE,
        api::capabilities::CAPABILITIES_MODULE,
        api::users::USERS_MODULE,
        api::sharee::SHAREE_MODULE,
        api::webdav::WEBDAV_MODULE,
        api::systemtags::SYSTEMTAGS_MODULE,
        api::systemtags::SYSTEMTAGS_RELATION_MODULE,
        api::trashbin::TRASHBIN_MODULE,
    ] {
        registry.register(module);
    }
}

static BUILTIN: OnceLock<CapabilityRegistry> = OnceLock::new();

/// Process-wide registry of the built-in modules.
#[must_use]
pub fn builtin_registry() -> &'static CapabilityRegistry {
    BUILTIN.get_or_init(|| {
        let mut registry = CapabilityRegistry::new();
        register_builtin(&mut registry);
        tracing::debug!(count = registry.len(), "Built-in capabilities registered");
        registry
    })
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::Arc;

    use super::*;
    use crate::capability::{
        CapabilityDecl, OCS_V2_API, OperationArgs, Outcome, Provider, WEBDAV_API,
    };
    use crate::error::{ClientError, ClientResult};
    use crate::requester::Requester;

    struct Idle;

    impl Provider for Idle {
        fn call(&self, operation: &str, _args: &OperationArgs) -> ClientResult<Outcome> {
            Err(ClientError::UnknownOperation(operation.to_owned()))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn idle(_: Arc<Requester>) -> Box<dyn Provider> {
        Box::new(Idle)
    }

    static BASE: CapabilityDecl = OCS_V2_API;
    static DRAFT: CapabilityDecl = OCS_V2_API.with_url("Draft", "/ocs/v2.php/apps/draft").unverified();
    static NOTES: CapabilityDecl = WEBDAV_API.with_url("Notes", "/remote.php/dav/notes");

    #[test_log::test]
    fn rejects_abstract_and_unverified() {
        let mut registry = CapabilityRegistry::new();
        assert!(!registry.register(CapabilityModule::new(&BASE, &[], idle)));
        assert!(!registry.register(CapabilityModule::new(&DRAFT, &[], idle)));
        assert!(registry.is_empty());

        assert!(registry.register(CapabilityModule::new(&NOTES, &["list_notes"], idle)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.modules()[0].decl.name, "Notes");
    }

    #[test]
    fn builtin_modules() {
        let names: Vec<_> = builtin_registry()
            .modules()
            .iter()
            .map(|module| module.decl.name)
            .collect();
        assert_eq!(
            names,
            [
                "Apps",
                "Capabilities",
                "Users",
                "Sharee",
                "WebDav",
                "SystemTags",
                "SystemTagsRelation",
                "WebDavTrash",
            ]
        );
    }
}
