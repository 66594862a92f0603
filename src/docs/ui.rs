//! Interactive documentation page.
//!
//! The page is rendered once when the stage is installed; the browser then
//! fetches the description document from the generator endpoint.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use minijinja::{context, Environment};

use crate::pipeline::{StageKind, StageOutcome};

const TEMPLATE_NAME: &str = "swagger_ui.html";
const TEMPLATE: &str = include_str!("templates/swagger_ui.html");

/// Render the documentation page pointing at `spec_url`.
pub fn render_page(title: &str, spec_url: &str) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    env.get_template(TEMPLATE_NAME)?
        .render(context! { title => title, spec_url => spec_url })
}

/// Shared state of the documentation UI stage.
#[derive(Debug, Clone)]
pub struct DocsUiEndpoint {
    path: Arc<str>,
    page: Arc<str>,
}

impl DocsUiEndpoint {
    /// Render the page for a UI mounted at `path`.
    pub fn new(path: &str, title: &str, spec_url: &str) -> Result<Self, minijinja::Error> {
        let page = render_page(title, spec_url)?;
        Ok(Self {
            path: Arc::from(path.trim_end_matches('/')),
            page: Arc::from(page),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `/swagger`, `/swagger/` and `/swagger/index.html` all serve the page.
    fn matches(&self, request: &Request) -> bool {
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return false;
        }
        match request.uri().path().strip_prefix(&*self.path) {
            Some(rest) => rest.is_empty() || rest == "/" || rest == "/index.html",
            None => false,
        }
    }
}

/// Pipeline stage: answer documentation page requests, pass everything else on.
pub async fn docs_ui_stage(
    State(endpoint): State<DocsUiEndpoint>,
    request: Request,
    next: Next,
) -> Response {
    if !endpoint.matches(&request) {
        return next.run(request).await;
    }

    let mut response = Html(endpoint.page.to_string()).into_response();
    response
        .extensions_mut()
        .insert(StageOutcome::ShortCircuited(StageKind::DocsUi));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, path: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn page_references_description_and_title() {
        let page = render_page("FinTrack.Api", "/swagger/v1/swagger.json").unwrap();
        assert!(page.contains("<title>FinTrack.Api - Swagger UI</title>"));
        assert!(page.contains("swagger.json"));
        assert!(page.contains("SwaggerUIBundle"));
    }

    #[test]
    fn title_is_escaped() {
        let page = render_page("<script>", "/doc.json").unwrap();
        assert!(!page.contains("<title><script>"));
    }

    #[test]
    fn matches_page_aliases_only() {
        let endpoint = DocsUiEndpoint::new("/swagger/", "T", "/swagger/v1/swagger.json").unwrap();
        assert_eq!(endpoint.path(), "/swagger");

        assert!(endpoint.matches(&request(Method::GET, "/swagger")));
        assert!(endpoint.matches(&request(Method::GET, "/swagger/")));
        assert!(endpoint.matches(&request(Method::HEAD, "/swagger/index.html")));

        assert!(!endpoint.matches(&request(Method::POST, "/swagger")));
        assert!(!endpoint.matches(&request(Method::GET, "/swaggerish")));
        assert!(!endpoint.matches(&request(Method::GET, "/swagger/v1/swagger.json")));
    }
}
