//! Transport-upgrade stage.
//!
//! Requests arriving on the plain listener are redirected to the same host,
//! path and query on the secure port. Without a resolvable secure port the
//! stage passes every request through.

use axum::{
    extract::{Request, State},
    http::{header, uri::Authority, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::pipeline::{StageKind, StageOutcome};

/// Transport a request arrived on; inserted per listener by the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Plain,
    Secure,
}

const HTTPS_DEFAULT_PORT: u16 = 443;

/// Redirect policy.
#[derive(Debug, Clone)]
pub struct HttpsRedirect {
    port: Option<u16>,
    status: StatusCode,
}

impl HttpsRedirect {
    pub fn new(port: Option<u16>, status: StatusCode) -> Self {
        Self { port, status }
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether a secure endpoint is known; an inactive policy never redirects.
    pub fn is_active(&self) -> bool {
        self.port.is_some()
    }

    /// Secure equivalent of `request`, or `None` when it should pass through.
    pub fn target(&self, request: &Request) -> Option<Uri> {
        let port = self.port?;

        let transport = request
            .extensions()
            .get::<Transport>()
            .copied()
            .unwrap_or_default();
        if transport == Transport::Secure {
            return None;
        }

        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| request.uri().authority().map(Authority::as_str))?;
        let host = host.parse::<Authority>().ok()?;

        let authority = if port == HTTPS_DEFAULT_PORT {
            host.host().to_string()
        } else {
            format!("{}:{}", host.host(), port)
        };
        let path_and_query = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        Uri::builder()
            .scheme("https")
            .authority(authority)
            .path_and_query(path_and_query)
            .build()
            .ok()
    }
}

/// Pipeline stage: redirect plain-transport requests to the secure endpoint.
pub async fn https_redirect_stage(
    State(policy): State<HttpsRedirect>,
    request: Request,
    next: Next,
) -> Response {
    let Some(location) = policy.target(&request) else {
        return next.run(request).await;
    };

    tracing::debug!(
        method = %request.method(),
        location = %location,
        status = policy.status.as_u16(),
        "Redirecting to secure transport"
    );
    let mut response = (policy.status, [(header::LOCATION, location.to_string())]).into_response();
    response
        .extensions_mut()
        .insert(StageOutcome::ShortCircuited(StageKind::HttpsRedirection));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str, host: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(host) = host {
            builder = builder.header(header::HOST, host);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn policy(port: Option<u16>) -> HttpsRedirect {
        HttpsRedirect::new(port, StatusCode::PERMANENT_REDIRECT)
    }

    #[test]
    fn keeps_host_path_and_query() {
        let target = policy(Some(5001))
            .target(&request("/accounts?page=2&size=10", Some("api.example.com:5000")))
            .unwrap();
        assert_eq!(target, "https://api.example.com:5001/accounts?page=2&size=10");
    }

    #[test]
    fn default_port_is_omitted() {
        let target = policy(Some(443))
            .target(&request("/health", Some("api.example.com")))
            .unwrap();
        assert_eq!(target, "https://api.example.com/health");
    }

    #[test]
    fn falls_back_to_uri_authority() {
        let target = policy(Some(8443))
            .target(&request("http://localhost:8080/health", None))
            .unwrap();
        assert_eq!(target, "https://localhost:8443/health");
    }

    #[test]
    fn passes_through_without_secure_port() {
        let policy = policy(None);
        assert!(!policy.is_active());
        assert!(policy.target(&request("/health", Some("example.com"))).is_none());
    }

    #[test]
    fn passes_through_secure_requests() {
        let mut req = request("/health", Some("example.com"));
        req.extensions_mut().insert(Transport::Secure);
        assert!(policy(Some(443)).target(&req).is_none());
    }

    #[test]
    fn passes_through_without_host() {
        assert!(policy(Some(443)).target(&request("/health", None)).is_none());
    }
}
