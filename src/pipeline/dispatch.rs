//! Route-dispatch stage.
//!
//! Turns the route table into an axum router. A path that matches with a
//! method that does not is a routing miss like any unknown path: both get
//! `404 Not Found`.

use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    response::Response,
    routing::MethodRouter,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::http::response;
use crate::pipeline::{StageKind, StageOutcome};
use crate::routing::RouteTable;

/// Build the dispatch router for `table`.
pub fn router(table: &RouteTable) -> Router {
    let mut router = Router::new();
    for (pattern, entries) in table.by_pattern() {
        let mut method_router = MethodRouter::new();
        for entry in entries {
            method_router = method_router.merge(entry.handler());
        }
        router = router.route(pattern, method_router.fallback(route_miss));
    }

    // axum rejects a route layer on a router without routes.
    if !table.is_empty() {
        router = router.route_layer(from_fn(mark_dispatched));
    }

    router
        .fallback(route_miss)
        .layer(CatchPanicLayer::custom(handler_fault))
}

async fn route_miss() -> Response {
    let mut response = response::not_found();
    response
        .extensions_mut()
        .insert(StageOutcome::ShortCircuited(StageKind::RouteDispatch));
    response
}

async fn mark_dispatched(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if response.extensions().get::<StageOutcome>().is_none() {
        response.extensions_mut().insert(StageOutcome::Dispatched);
    }
    response
}

fn handler_fault(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let mut response = response::internal_error(panic);
    response.extensions_mut().insert(StageOutcome::Dispatched);
    response
}
