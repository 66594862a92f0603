//! Ordered stage-list builder.
//!
//! # Responsibilities
//! - Branch once at startup into a fixed, inspectable stage list
//! - Reject duplicate, misordered or unsupported stages before serving
//! - Compose the stage list into a single axum router
//!
//! # Design Decisions
//! - Stage order is fixed: description, docs UI, https redirect, dispatch
//! - The built pipeline owns only immutable, `Arc`-shared stage state
//! - Ambient layers (request ID, tracing, request tracking) wrap every stage

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::HostConfig;
use crate::docs::{description_stage, docs_ui_stage, DescriptionEndpoint, DocsUiEndpoint};
use crate::http::request::MakeRequestUuidV4;
use crate::pipeline::dispatch;
use crate::pipeline::https_redirect::{https_redirect_stage, HttpsRedirect};
use crate::pipeline::phase::track_request;
use crate::pipeline::stage::{Stage, StageKind};
use crate::registry::{Capability, ServiceProvider};

/// Startup configuration errors raised while assembling the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("stage '{0}' installed more than once")]
    DuplicateStage(StageKind),

    #[error("stage '{stage}' installed after '{after}'")]
    OutOfOrder { stage: StageKind, after: StageKind },

    #[error("stage '{stage}' requires stage '{requires}' to be installed first")]
    MissingStage { stage: StageKind, requires: StageKind },

    #[error("stage '{stage}' requires capability '{capability}'")]
    MissingCapability { stage: StageKind, capability: Capability },

    #[error("pipeline has no route dispatch stage")]
    NoRouteDispatch,

    #[error("redirect status {0} is not a redirection")]
    InvalidRedirectStatus(u16),

    #[error("documentation page template failed: {0}")]
    Template(String),
}

/// A fixed, ordered list of stages.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(Stage::kind).collect()
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.stages.iter().any(|s| s.kind() == kind)
    }

    /// Compose the stages into a router; the first stage sees requests first.
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for stage in self.stages.into_iter().rev() {
            router = match stage {
                Stage::RouteDispatch(table) => dispatch::router(&table),
                Stage::HttpsRedirection(policy) => {
                    router.layer(from_fn_with_state(policy, https_redirect_stage))
                }
                Stage::DocsUi(endpoint) => router.layer(from_fn_with_state(endpoint, docs_ui_stage)),
                Stage::ApiDescription(endpoint) => {
                    router.layer(from_fn_with_state(endpoint, description_stage))
                }
            };
        }

        router
            .layer(from_fn(track_request))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }
}

/// Collects stages in order and validates them against the registry.
pub struct PipelineBuilder<'a> {
    services: &'a ServiceProvider,
    config: &'a HostConfig,
    stages: Vec<Stage>,
    errors: Vec<PipelineError>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(services: &'a ServiceProvider, config: &'a HostConfig) -> Self {
        Self {
            services,
            config,
            stages: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Serve the machine-readable API description.
    pub fn with_api_description(&mut self) -> &mut Self {
        let stage = match self.services.document_info() {
            Some(info) => Ok(Stage::ApiDescription(DescriptionEndpoint::new(
                &self.config.docs.json_path,
                self.services.route_table().clone(),
                info.clone(),
            ))),
            None => Err(PipelineError::MissingCapability {
                stage: StageKind::ApiDescription,
                capability: Capability::ApiDescription,
            }),
        };
        self.push(StageKind::ApiDescription, stage)
    }

    /// Serve the interactive documentation page.
    pub fn with_docs_ui(&mut self) -> &mut Self {
        let stage = if !self.has(StageKind::ApiDescription) {
            Err(PipelineError::MissingStage {
                stage: StageKind::DocsUi,
                requires: StageKind::ApiDescription,
            })
        } else {
            let docs = &self.config.docs;
            let title = self
                .services
                .document_info()
                .map(|info| info.title.as_str())
                .unwrap_or(docs.title.as_str());
            DocsUiEndpoint::new(&docs.ui_path, title, &docs.json_path)
                .map(Stage::DocsUi)
                .map_err(|e| PipelineError::Template(e.to_string()))
        };
        self.push(StageKind::DocsUi, stage)
    }

    /// Redirect plain-transport requests to the secure endpoint, when one is known.
    pub fn with_https_redirection(&mut self) -> &mut Self {
        let code = self.config.https_redirection.status_code;
        let stage = match StatusCode::from_u16(code) {
            Ok(status) if status.is_redirection() => {
                let policy = HttpsRedirect::new(self.config.secure_port(), status);
                if !policy.is_active() {
                    tracing::warn!("No secure port configured; https redirection passes requests through");
                }
                Ok(Stage::HttpsRedirection(policy))
            }
            _ => Err(PipelineError::InvalidRedirectStatus(code)),
        };
        self.push(StageKind::HttpsRedirection, stage)
    }

    /// Dispatch to controller routes.
    pub fn with_route_dispatch(&mut self) -> &mut Self {
        let stage = if self.services.has(Capability::Controllers) {
            Ok(Stage::RouteDispatch(self.services.route_table().clone()))
        } else {
            Err(PipelineError::MissingCapability {
                stage: StageKind::RouteDispatch,
                capability: Capability::Controllers,
            })
        };
        self.push(StageKind::RouteDispatch, stage)
    }

    /// Validate and freeze the stage list.
    pub fn build(self) -> Result<Pipeline, Vec<PipelineError>> {
        let mut errors = self.errors;
        if !self.stages.iter().any(|s| s.kind() == StageKind::RouteDispatch) {
            errors.push(PipelineError::NoRouteDispatch);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let pipeline = Pipeline { stages: self.stages };
        tracing::info!(
            stages = ?pipeline.kinds().iter().map(|k| k.as_str()).collect::<Vec<_>>(),
            "Request pipeline built"
        );
        Ok(pipeline)
    }

    fn has(&self, kind: StageKind) -> bool {
        self.stages.iter().any(|s| s.kind() == kind)
    }

    fn push(&mut self, kind: StageKind, stage: Result<Stage, PipelineError>) -> &mut Self {
        if self.has(kind) {
            self.errors.push(PipelineError::DuplicateStage(kind));
            return self;
        }
        if let Some(last) = self.stages.last() {
            if last.kind().rank() > kind.rank() {
                self.errors.push(PipelineError::OutOfOrder {
                    stage: kind,
                    after: last.kind(),
                });
                return self;
            }
        }
        match stage {
            Ok(stage) => self.stages.push(stage),
            Err(e) => self.errors.push(e),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocumentInfo;
    use crate::registry::ServiceCollection;

    fn services(with_docs: bool) -> ServiceProvider {
        let mut services = ServiceCollection::new();
        services.enable_controllers();
        if with_docs {
            services
                .enable_api_explorer()
                .enable_api_description(DocumentInfo::new("Test", "v1"));
        }
        services.build().unwrap()
    }

    #[test]
    fn full_development_order() {
        let services = services(true);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder
            .with_api_description()
            .with_docs_ui()
            .with_https_redirection()
            .with_route_dispatch();

        let pipeline = builder.build().unwrap();
        assert_eq!(
            pipeline.kinds(),
            vec![
                StageKind::ApiDescription,
                StageKind::DocsUi,
                StageKind::HttpsRedirection,
                StageKind::RouteDispatch,
            ]
        );
    }

    #[test]
    fn production_order_skips_docs() {
        let services = services(true);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder.with_https_redirection().with_route_dispatch();

        let pipeline = builder.build().unwrap();
        assert!(!pipeline.contains(StageKind::ApiDescription));
        assert!(!pipeline.contains(StageKind::DocsUi));
        assert_eq!(pipeline.stages().len(), 2);
    }

    #[test]
    fn docs_ui_requires_description_stage() {
        let services = services(true);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder.with_docs_ui().with_route_dispatch();

        assert_eq!(
            builder.build().unwrap_err(),
            vec![PipelineError::MissingStage {
                stage: StageKind::DocsUi,
                requires: StageKind::ApiDescription,
            }]
        );
    }

    #[test]
    fn description_requires_capability() {
        let services = services(false);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder.with_api_description().with_route_dispatch();

        assert_eq!(
            builder.build().unwrap_err(),
            vec![PipelineError::MissingCapability {
                stage: StageKind::ApiDescription,
                capability: Capability::ApiDescription,
            }]
        );
    }

    #[test]
    fn rejects_duplicates_and_misordering() {
        let services = services(true);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder
            .with_https_redirection()
            .with_https_redirection()
            .with_api_description()
            .with_route_dispatch();

        assert_eq!(
            builder.build().unwrap_err(),
            vec![
                PipelineError::DuplicateStage(StageKind::HttpsRedirection),
                PipelineError::OutOfOrder {
                    stage: StageKind::ApiDescription,
                    after: StageKind::HttpsRedirection,
                },
            ]
        );
    }

    #[test]
    fn dispatch_is_mandatory() {
        let services = services(false);
        let config = HostConfig::default();
        let mut builder = PipelineBuilder::new(&services, &config);
        builder.with_https_redirection();

        assert_eq!(builder.build().unwrap_err(), vec![PipelineError::NoRouteDispatch]);
    }

    #[test]
    fn invalid_redirect_status_is_rejected() {
        let services = services(false);
        let mut config = HostConfig::default();
        config.https_redirection.status_code = 200;
        let mut builder = PipelineBuilder::new(&services, &config);
        builder.with_https_redirection().with_route_dispatch();

        assert_eq!(
            builder.build().unwrap_err(),
            vec![PipelineError::InvalidRedirectStatus(200)]
        );
    }
}
