//! Liveness endpoint.

use crate::registry::Controller;
use crate::routing::RouteRegistrar;

/// `GET /health` answers `200 ok` while the process is serving.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthController;

impl Controller for HealthController {
    fn name(&self) -> &str {
        "Health"
    }

    fn register_routes(&self, routes: &mut RouteRegistrar<'_>) {
        routes
            .get("/health", || async { "ok" })
            .operation_id("get_health")
            .summary("Liveness probe");
    }
}
