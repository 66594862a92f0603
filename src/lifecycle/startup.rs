//! Startup orchestration.
//!
//! # Responsibilities
//! - Register the capabilities the host needs and the controllers it serves
//! - Branch on the environment once to compose the request pipeline
//! - Bind listeners and load TLS material before any request is served
//! - Run the accept loops until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Steps run in a fixed order, never concurrently
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Environment, HostConfig};
use crate::docs::DocumentInfo;
use crate::error::HostError;
use crate::http::{HttpServer, SecureListener};
use crate::lifecycle::Shutdown;
use crate::net;
use crate::observability::metrics;
use crate::pipeline::{Pipeline, PipelineBuilder, PipelineError, StageKind};
use crate::registry::{Controller, ServiceCollection, ServiceProvider};

/// Compose the stage list for `environment`.
///
/// Documentation stages exist only in Development; transport upgrade and
/// route dispatch are always installed.
pub fn compose_pipeline(
    services: &ServiceProvider,
    config: &HostConfig,
    environment: Environment,
) -> Result<Pipeline, Vec<PipelineError>> {
    let mut builder = PipelineBuilder::new(services, config);
    if environment.is_development() {
        builder.with_api_description().with_docs_ui();
    }
    builder.with_https_redirection().with_route_dispatch();
    builder.build()
}

/// Collects configuration and controllers, then builds a [`Host`].
pub struct HostBuilder {
    config: HostConfig,
    environment: Environment,
    services: ServiceCollection,
}

impl HostBuilder {
    /// Start from the standard registrations: controllers, route exploration
    /// and an API description titled from `config.docs`.
    pub fn new(config: HostConfig, environment: Environment) -> Self {
        let info = DocumentInfo::new(config.docs.title.clone(), config.docs.version.clone());
        let mut services = ServiceCollection::new();
        services
            .enable_controllers()
            .enable_api_explorer()
            .enable_api_description(info);

        Self {
            config,
            environment,
            services,
        }
    }

    /// Add a controller.
    pub fn controller<C: Controller>(mut self, controller: C) -> Self {
        self.services.add_controller(controller);
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Build the registry and pipeline without binding any socket.
    pub fn build_pipeline(self) -> Result<Pipeline, HostError> {
        let (_, pipeline) = self.compose()?;
        Ok(pipeline)
    }

    /// Build the composed router without binding any socket.
    pub fn build_router(self) -> Result<Router, HostError> {
        Ok(self.build_pipeline()?.into_router())
    }

    /// Run every startup step up to and including binding.
    pub async fn bind(self) -> Result<Host, HostError> {
        let (config, pipeline) = self.compose()?;

        let plain = net::bind(&config.listener.bind_address).await?;
        let plain_addr = plain.local_addr().map_err(HostError::Serve)?;

        let secure = match &config.tls {
            Some(tls) => {
                let rustls = net::load_tls_config(tls).await.map_err(HostError::Tls)?;
                let listener = net::bind_std(&tls.bind_address).await?;
                Some(SecureListener {
                    listener,
                    tls: rustls,
                })
            }
            None => None,
        };
        let secure_addr = match &secure {
            Some(s) => Some(s.listener.local_addr().map_err(HostError::Serve)?),
            None => None,
        };

        if config.observability.metrics_enabled {
            let address = &config.observability.metrics_address;
            let addr: SocketAddr =
                address
                    .parse()
                    .map_err(|source| net::ListenerError::InvalidAddress {
                        address: address.clone(),
                        source,
                    })?;
            metrics::init_metrics(addr)?;
        }

        Ok(Host {
            stages: pipeline.kinds(),
            router: pipeline.into_router(),
            plain,
            plain_addr,
            secure,
            secure_addr,
            shutdown: Shutdown::new(),
        })
    }

    fn compose(self) -> Result<(HostConfig, Pipeline), HostError> {
        tracing::info!(environment = %self.environment, "Composing host");
        let services = self.services.build()?;
        let pipeline = compose_pipeline(&services, &self.config, self.environment)?;
        Ok((self.config, pipeline))
    }
}

/// A host whose listeners are bound and whose pipeline is fixed.
pub struct Host {
    stages: Vec<StageKind>,
    router: Router,
    plain: TcpListener,
    plain_addr: SocketAddr,
    secure: Option<SecureListener>,
    secure_addr: Option<SocketAddr>,
    shutdown: Shutdown,
}

impl Host {
    /// Address of the plain listener.
    pub fn local_addr(&self) -> SocketAddr {
        self.plain_addr
    }

    /// Address of the secure listener, if one is bound.
    pub fn secure_addr(&self) -> Option<SocketAddr> {
        self.secure_addr
    }

    pub fn stages(&self) -> &[StageKind] {
        &self.stages
    }

    /// Handle that stops the host when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serve until shutdown, then drain in-flight requests.
    pub async fn run(self) -> Result<(), HostError> {
        tracing::info!(
            address = %self.plain_addr,
            secure_address = ?self.secure_addr,
            stages = ?self.stages.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "Host serving"
        );
        if self.shutdown.is_triggered() {
            tracing::info!("Shutdown requested before serving; stopping immediately");
        }

        HttpServer::new(self.router)
            .run(self.plain, self.secure, &self.shutdown)
            .await
            .map_err(HostError::Serve)?;

        tracing::info!("Shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::HealthController;

    #[test]
    fn development_installs_documentation_stages() {
        let pipeline = HostBuilder::new(HostConfig::default(), Environment::Development)
            .controller(HealthController)
            .build_pipeline()
            .unwrap();
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
    fn other_environments_skip_documentation_stages() {
        for environment in [Environment::Staging, Environment::Production] {
            let pipeline = HostBuilder::new(HostConfig::default(), environment)
                .build_pipeline()
                .unwrap();
            assert_eq!(
                pipeline.kinds(),
                vec![StageKind::HttpsRedirection, StageKind::RouteDispatch]
            );
        }
    }

    #[test]
    fn duplicate_controller_fails_startup() {
        let err = HostBuilder::new(HostConfig::default(), Environment::Production)
            .controller(HealthController)
            .controller(HealthController)
            .build_pipeline()
            .unwrap_err();
        assert!(matches!(err, HostError::Registry(_)));
    }

    #[tokio::test]
    async fn missing_tls_material_fails_before_serving() {
        let mut config = HostConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.tls = Some(crate::config::TlsConfig {
            bind_address: "127.0.0.1:0".to_string(),
            cert_path: "/nonexistent/cert.pem".to_string(),
            key_path: "/nonexistent/key.pem".to_string(),
        });

        let err = HostBuilder::new(config, Environment::Production)
            .bind()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HostError::Tls(_)));
    }
}
