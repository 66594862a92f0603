//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::Path,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use fintrack_api::controllers::HealthController;
use fintrack_api::registry::Controller;
use fintrack_api::routing::RouteRegistrar;
use fintrack_api::{Environment, HostBuilder, HostConfig};

/// A controller with path and query parameters.
pub struct AccountsController;

impl Controller for AccountsController {
    fn name(&self) -> &str {
        "Accounts"
    }

    fn register_routes(&self, routes: &mut RouteRegistrar<'_>) {
        routes
            .get("/accounts", || async { "[]" })
            .summary("List accounts")
            .query("page", false);
        routes.get("/accounts/{id}", |Path(id): Path<String>| async move { id });
        routes.delete("/accounts/{id}", || async { StatusCode::NO_CONTENT });
    }
}

/// Composed router with the health and accounts controllers.
pub fn app(environment: Environment, config: HostConfig) -> Router {
    HostBuilder::new(config, environment)
        .controller(HealthController)
        .controller(AccountsController)
        .build_router()
        .unwrap()
}

/// Send one request through `app`.
pub async fn send(app: &Router, method: &str, uri: &str, host: Option<&str>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(host) = host {
        request = request.header(header::HOST, host);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Config with loopback ephemeral listeners.
pub fn loopback_config() -> HostConfig {
    let mut config = HostConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}
