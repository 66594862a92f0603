//! Controller seam.
//!
//! Controllers live outside this crate's core. They implement [`Controller`]
//! and are handed to the service registry, which asks each one to register
//! its routes exactly once while the route table is being built.

use crate::routing::RouteRegistrar;

/// A source of routes.
pub trait Controller: Send + Sync + 'static {
    /// Name used for the API description tag and in registration errors.
    fn name(&self) -> &str;

    /// Register this controller's routes.
    fn register_routes(&self, routes: &mut RouteRegistrar<'_>);
}
