//! Route table populated by controllers.
//!
//! # Responsibilities
//! - Collect (method, pattern) → handler registrations from controllers
//! - Record route metadata consumed by the API description
//! - Surface conflicting or malformed registrations at startup
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Registration errors are collected, not panicked, so startup can report them
//! - Handlers are stored type-erased as axum method routers

use std::collections::BTreeMap;
use std::fmt;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter, MethodRouter};

use crate::routing::pattern::{PatternError, RoutePattern, Segment};

/// A query-string parameter a route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    pub required: bool,
}

/// Descriptive information attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMetadata {
    /// Name of the controller that registered the route; used as the API tag.
    pub controller: String,
    pub operation_id: String,
    pub summary: Option<String>,
    pub query_params: Vec<QueryParam>,
}

/// A registered route.
pub struct RouteEntry {
    method: Method,
    pattern: RoutePattern,
    metadata: RouteMetadata,
    handler: MethodRouter,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn metadata(&self) -> &RouteMetadata {
        &self.metadata
    }

    pub(crate) fn handler(&self) -> MethodRouter {
        self.handler.clone()
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Errors raised while controllers register routes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("controller '{controller}' registered an invalid route: {source}")]
    InvalidPattern {
        controller: String,
        #[source]
        source: PatternError,
    },

    #[error("controller '{controller}' registered unsupported method {method}")]
    UnsupportedMethod { controller: String, method: Method },

    #[error("{method} {pattern} registered by '{controller}' duplicates the route from '{existing}'")]
    Duplicate {
        method: Method,
        pattern: String,
        controller: String,
        existing: String,
    },

    #[error("{pattern} registered by '{controller}' conflicts with {existing_pattern}: captures at the same position must agree")]
    Conflict {
        pattern: String,
        existing_pattern: String,
        controller: String,
    },
}

/// Immutable mapping of (method, pattern) to handler.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Routes in registration order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a route with exactly this method and pattern was registered.
    pub fn contains(&self, method: &Method, pattern: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.method == *method && e.pattern.as_str() == pattern)
    }

    /// Routes grouped by pattern, patterns in lexical order.
    pub fn by_pattern(&self) -> BTreeMap<&str, Vec<&RouteEntry>> {
        let mut grouped: BTreeMap<&str, Vec<&RouteEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped.entry(entry.pattern.as_str()).or_default().push(entry);
        }
        grouped
    }
}

/// Accumulates registrations from all controllers.
#[derive(Default)]
pub struct RouteTableBuilder {
    entries: Vec<RouteEntry>,
    errors: Vec<RouteError>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration handle scoped to one controller.
    pub fn registrar(&mut self, controller: impl Into<String>) -> RouteRegistrar<'_> {
        RouteRegistrar {
            builder: self,
            controller: controller.into(),
        }
    }

    /// Finish registration, failing with every error encountered.
    pub fn build(self) -> Result<RouteTable, Vec<RouteError>> {
        if self.errors.is_empty() {
            Ok(RouteTable { entries: self.entries })
        } else {
            Err(self.errors)
        }
    }

    fn insert(
        &mut self,
        controller: &str,
        method: Method,
        path: &str,
        handler: Result<MethodRouter, RouteError>,
    ) -> Option<usize> {
        let pattern = match RoutePattern::parse(path) {
            Ok(p) => p,
            Err(source) => {
                self.errors.push(RouteError::InvalidPattern {
                    controller: controller.to_string(),
                    source,
                });
                return None;
            }
        };

        let handler = match handler {
            Ok(h) => h,
            Err(e) => {
                self.errors.push(e);
                return None;
            }
        };

        if let Some(existing) = self.entries.iter().find(|e| e.pattern.conflicts_with(&pattern)) {
            self.errors.push(RouteError::Conflict {
                pattern: pattern.as_str().to_string(),
                existing_pattern: existing.pattern.as_str().to_string(),
                controller: controller.to_string(),
            });
            return None;
        }

        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.method == method && e.pattern == pattern)
        {
            self.errors.push(RouteError::Duplicate {
                method,
                pattern: pattern.as_str().to_string(),
                controller: controller.to_string(),
                existing: existing.metadata.controller.clone(),
            });
            return None;
        }

        let metadata = RouteMetadata {
            controller: controller.to_string(),
            operation_id: default_operation_id(&method, &pattern),
            summary: None,
            query_params: Vec::new(),
        };
        tracing::debug!(
            controller = %controller,
            method = %method,
            pattern = %pattern,
            "Route registered"
        );
        self.entries.push(RouteEntry {
            method,
            pattern,
            metadata,
            handler,
        });
        Some(self.entries.len() - 1)
    }
}

fn default_operation_id(method: &Method, pattern: &RoutePattern) -> String {
    let mut id = method.as_str().to_ascii_lowercase();
    if pattern.segments().is_empty() {
        id.push_str("_root");
    }
    for segment in pattern.segments() {
        id.push('_');
        match segment {
            Segment::Literal(l) => id.push_str(&l.replace(|c: char| !c.is_ascii_alphanumeric(), "_")),
            Segment::Param(n) | Segment::CatchAll(n) => id.push_str(n),
        }
    }
    id
}

// CONNECT has no API description operation, so it is not routable here.
fn method_filter(method: &Method) -> Option<MethodFilter> {
    if *method == Method::CONNECT {
        return None;
    }
    MethodFilter::try_from(method.clone()).ok()
}

/// Registration handle passed to a controller.
pub struct RouteRegistrar<'a> {
    builder: &'a mut RouteTableBuilder,
    controller: String,
}

impl RouteRegistrar<'_> {
    /// Register `handler` for `method` on `path`.
    pub fn route<H, T>(&mut self, method: Method, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let method_router = method_filter(&method)
            .map(|filter| on(filter, handler))
            .ok_or_else(|| RouteError::UnsupportedMethod {
                controller: self.controller.clone(),
                method: method.clone(),
            });
        let index = self.builder.insert(&self.controller, method, path, method_router);
        RouteOptions {
            entry: index.map(|i| &mut self.builder.entries[i]),
        }
    }

    pub fn get<H, T>(&mut self, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, T>(&mut self, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, T>(&mut self, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch<H, T>(&mut self, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete<H, T>(&mut self, path: &str, handler: H) -> RouteOptions<'_>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::DELETE, path, handler)
    }
}

/// Optional metadata for a just-registered route.
///
/// A no-op when the registration itself failed; the failure is already recorded.
pub struct RouteOptions<'r> {
    entry: Option<&'r mut RouteEntry>,
}

impl RouteOptions<'_> {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        if let Some(entry) = self.entry.as_deref_mut() {
            entry.metadata.summary = Some(summary.into());
        }
        self
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        if let Some(entry) = self.entry.as_deref_mut() {
            entry.metadata.operation_id = operation_id.into();
        }
        self
    }

    pub fn query(mut self, name: impl Into<String>, required: bool) -> Self {
        if let Some(entry) = self.entry.as_deref_mut() {
            entry.metadata.query_params.push(QueryParam {
                name: name.into(),
                required,
            });
        }
        self
    }
}
