//! Service collection and the immutable provider built from it.
//!
//! # Responsibilities
//! - Record which capabilities the process needs
//! - Collect controllers and build the route table from them
//! - Fail fast on duplicate or inconsistent registrations
//!
//! # Design Decisions
//! - `build` consumes the collection; the provider cannot be mutated afterwards
//! - Every problem is reported at once, before any socket is bound

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::docs::DocumentInfo;
use crate::registry::controller::Controller;
use crate::routing::{RouteError, RouteTable, RouteTableBuilder};

/// Something the process declares it needs at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Controller route dispatch.
    Controllers,
    /// Route metadata exploration, prerequisite of the API description.
    ApiExplorer,
    /// Machine-readable API description generation.
    ApiDescription,
}

impl Capability {
    fn requires(self) -> Option<Capability> {
        match self {
            Capability::ApiDescription => Some(Capability::ApiExplorer),
            Capability::Controllers | Capability::ApiExplorer => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Controllers => "controllers",
            Capability::ApiExplorer => "api-explorer",
            Capability::ApiDescription => "api-description",
        };
        f.write_str(name)
    }
}

/// Startup configuration errors raised by the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("capability '{0}' registered more than once")]
    DuplicateCapability(Capability),

    #[error("capability '{capability}' requires '{requires}' to be registered")]
    MissingCapability {
        capability: Capability,
        requires: Capability,
    },

    #[error("controller '{0}' added without the controllers capability")]
    ControllersNotEnabled(String),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Mutable registration surface used during startup.
#[derive(Default)]
pub struct ServiceCollection {
    capabilities: Vec<Capability>,
    controllers: Vec<Arc<dyn Controller>>,
    document_info: Option<DocumentInfo>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable controller route dispatch.
    pub fn enable_controllers(&mut self) -> &mut Self {
        self.capabilities.push(Capability::Controllers);
        self
    }

    /// Enable route metadata exploration.
    pub fn enable_api_explorer(&mut self) -> &mut Self {
        self.capabilities.push(Capability::ApiExplorer);
        self
    }

    /// Enable API description generation with the given document info.
    pub fn enable_api_description(&mut self, info: DocumentInfo) -> &mut Self {
        self.capabilities.push(Capability::ApiDescription);
        self.document_info = Some(info);
        self
    }

    /// Add a controller whose routes join the route table.
    pub fn add_controller<C: Controller>(&mut self, controller: C) -> &mut Self {
        self.controllers.push(Arc::new(controller));
        self
    }

    /// Validate registrations and freeze them into a provider.
    pub fn build(self) -> Result<ServiceProvider, Vec<RegistryError>> {
        let mut errors = Vec::new();
        let mut capabilities = BTreeSet::new();

        for capability in &self.capabilities {
            if !capabilities.insert(*capability) {
                errors.push(RegistryError::DuplicateCapability(*capability));
            }
        }
        for capability in &capabilities {
            if let Some(requires) = capability.requires() {
                if !capabilities.contains(&requires) {
                    errors.push(RegistryError::MissingCapability {
                        capability: *capability,
                        requires,
                    });
                }
            }
        }

        let controllers_enabled = capabilities.contains(&Capability::Controllers);
        let mut routes = RouteTableBuilder::new();
        for controller in &self.controllers {
            if !controllers_enabled {
                errors.push(RegistryError::ControllersNotEnabled(
                    controller.name().to_string(),
                ));
                continue;
            }
            let mut registrar = routes.registrar(controller.name());
            controller.register_routes(&mut registrar);
        }

        let route_table = match routes.build() {
            Ok(table) => table,
            Err(route_errors) => {
                errors.extend(route_errors.into_iter().map(RegistryError::Route));
                RouteTable::default()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        tracing::info!(
            capabilities = ?capabilities,
            controllers = self.controllers.len(),
            routes = route_table.len(),
            "Service registry built"
        );

        Ok(ServiceProvider {
            capabilities,
            route_table: Arc::new(route_table),
            document_info: self.document_info.map(Arc::new),
        })
    }
}

/// Immutable services consumed by pipeline construction.
#[derive(Debug, Clone)]
pub struct ServiceProvider {
    capabilities: BTreeSet<Capability>,
    route_table: Arc<RouteTable>,
    document_info: Option<Arc<DocumentInfo>>,
}

impl ServiceProvider {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn route_table(&self) -> &Arc<RouteTable> {
        &self.route_table
    }

    /// Present only when the API description capability was registered.
    pub fn document_info(&self) -> Option<&Arc<DocumentInfo>> {
        self.document_info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteRegistrar;
    use axum::http::Method;

    struct Ping;

    impl Controller for Ping {
        fn name(&self) -> &str {
            "Ping"
        }

        fn register_routes(&self, routes: &mut RouteRegistrar<'_>) {
            routes.get("/ping", || async { "pong" });
        }
    }

    fn info() -> DocumentInfo {
        DocumentInfo::new("Test", "v1")
    }

    #[test]
    fn builds_full_registry() {
        let mut services = ServiceCollection::new();
        services
            .enable_controllers()
            .enable_api_explorer()
            .enable_api_description(info())
            .add_controller(Ping);

        let provider = services.build().unwrap();
        assert!(provider.has(Capability::Controllers));
        assert!(provider.has(Capability::ApiDescription));
        assert!(provider.route_table().contains(&Method::GET, "/ping"));
        assert_eq!(provider.document_info().unwrap().title, "Test");
    }

    #[test]
    fn duplicate_capability_fails() {
        let mut services = ServiceCollection::new();
        services.enable_controllers().enable_controllers();

        let errors = services.build().unwrap_err();
        assert_eq!(errors, vec![RegistryError::DuplicateCapability(Capability::Controllers)]);
    }

    #[test]
    fn api_description_requires_explorer() {
        let mut services = ServiceCollection::new();
        services.enable_controllers().enable_api_description(info());

        let errors = services.build().unwrap_err();
        assert_eq!(
            errors,
            vec![RegistryError::MissingCapability {
                capability: Capability::ApiDescription,
                requires: Capability::ApiExplorer,
            }]
        );
    }

    #[test]
    fn controllers_need_the_capability() {
        let mut services = ServiceCollection::new();
        services.add_controller(Ping);

        let errors = services.build().unwrap_err();
        assert_eq!(errors, vec![RegistryError::ControllersNotEnabled("Ping".into())]);
    }

    #[test]
    fn route_errors_surface_through_the_registry() {
        let mut services = ServiceCollection::new();
        services.enable_controllers().add_controller(Ping).add_controller(Ping);

        let errors = services.build().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], RegistryError::Route(RouteError::Duplicate { .. })));
    }
}
