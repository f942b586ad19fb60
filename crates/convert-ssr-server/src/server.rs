// crates/convert-ssr-server/src/server.rs
// ============================================================================
// Module: SSR Server
// Description: Server assembly from configuration.
// Purpose: Wire client, strategy, audit sink, and routes into an axum app.
// Dependencies: axum, convert-ssr-client, convert-ssr-config, convert-ssr-core, tokio
// ============================================================================

//! ## Overview
//! [`SsrServer::from_config`] turns a validated [`ConvertSsrConfig`] into
//! middleware state; [`build_router`] mounts the bootstrap middleware in
//! front of the page handler. `/healthz` is served outside the middleware.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use convert_ssr_client::HttpClientConfig;
use convert_ssr_client::HttpConversionClient;
use convert_ssr_config::AuditConfig;
use convert_ssr_config::AuditSinkKind;
use convert_ssr_config::ClientConfig;
use convert_ssr_config::ConvertSsrConfig;
use convert_ssr_config::StrategyKind;
use convert_ssr_core::ActionsStrategy;
use convert_ssr_core::BootstrapStrategy;
use convert_ssr_core::ConversionClient;
use convert_ssr_core::ConverterView;
use convert_ssr_core::FetchFirstStrategy;
use convert_ssr_core::InMemoryConversionClient;
use convert_ssr_core::View;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::middleware::BootstrapState;
use crate::middleware::bootstrap_middleware;
use crate::page::healthz;
use crate::page::render_page;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Bootstrap server instance.
pub struct SsrServer {
    /// Server configuration.
    config: ConvertSsrConfig,
    /// Middleware state built from configuration.
    state: BootstrapState,
}

impl SsrServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SsrServerError`] when validation or initialization fails.
    pub fn from_config(config: ConvertSsrConfig) -> Result<Self, SsrServerError> {
        config.validate().map_err(|err| SsrServerError::Config(err.to_string()))?;
        let client = build_client(&config.client)?;
        let view: Arc<dyn View> = Arc::new(ConverterView);
        let strategy = build_strategy(config.bootstrap.strategy, client, view);
        let audit = build_audit_sink(&config.audit)?;
        let state = BootstrapState::new(strategy, audit)
            .with_query_keys(config.bootstrap.query_key.clone(), config.bootstrap.mode_key.clone())
            .with_timeout(config.bootstrap.timeout());
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the middleware state.
    #[must_use]
    pub const fn state(&self) -> &BootstrapState {
        &self.state
    }

    /// Returns the application router.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Binds the configured address and serves until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`SsrServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), SsrServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| SsrServerError::Config(err.to_string()))?;
        if !addr.ip().is_loopback() {
            let _ = writeln!(
                std::io::stderr(),
                "convert-ssr: WARNING: binding non-loopback address {addr}; put the server \
                 behind a trusted proxy"
            );
        }
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| SsrServerError::Transport(format!("bind {addr} failed: {err}")))?;
        axum::serve(listener, self.router())
            .await
            .map_err(|err| SsrServerError::Transport(format!("http server failed: {err}")))
    }
}

/// Builds the application router around the bootstrap middleware.
pub fn build_router(state: BootstrapState) -> Router {
    let pages = Router::new()
        .route("/", get(render_page))
        .route("/{*path}", get(render_page))
        .layer(from_fn_with_state(state, bootstrap_middleware));
    Router::new().route("/healthz", get(healthz)).merge(pages)
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the conversion client from configuration.
fn build_client(config: &ClientConfig) -> Result<Arc<dyn ConversionClient>, SsrServerError> {
    match config {
        ClientConfig::Http(settings) => {
            let client = HttpConversionClient::new(&HttpClientConfig {
                base_url: settings.base_url.clone(),
                path: settings.path.clone(),
                connect_timeout: Duration::from_millis(settings.connect_timeout_ms),
                request_timeout: Duration::from_millis(settings.request_timeout_ms),
                max_response_bytes: settings.max_response_bytes,
                allow_http: settings.allow_http,
                user_agent: settings.user_agent.clone(),
            })
            .map_err(|err| SsrServerError::Init(err.to_string()))?;
            if client.endpoint().scheme() == "http" {
                emit_cleartext_warning(client.endpoint().as_str());
            }
            Ok(Arc::new(client))
        }
        ClientConfig::Static(settings) => {
            let client = settings
                .fixtures
                .iter()
                .fold(InMemoryConversionClient::new(), |client, (types, data)| {
                    client.with_fixture(types.clone(), data.clone())
                });
            Ok(Arc::new(client))
        }
    }
}

/// Builds the configured bootstrap strategy.
pub fn build_strategy(
    kind: StrategyKind,
    client: Arc<dyn ConversionClient>,
    view: Arc<dyn View>,
) -> Arc<dyn BootstrapStrategy> {
    match kind {
        StrategyKind::FetchFirst => Arc::new(FetchFirstStrategy::new(client, view)),
        StrategyKind::Actions => Arc::new(ActionsStrategy::new(client, view)),
    }
}

/// Builds the configured audit sink.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn AuditSink>, SsrServerError> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| SsrServerError::Init(format!("audit log {path}: {err}")))?;
            Ok(Arc::new(sink))
        }
        (AuditSinkKind::File, None) => {
            Err(SsrServerError::Config("audit.path is required for the file sink".to_string()))
        }
    }
}

/// Warns that the conversion client talks cleartext HTTP.
fn emit_cleartext_warning(endpoint: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "convert-ssr: WARNING: conversion endpoint {endpoint} is cleartext http; conversion \
         data travels unencrypted"
    );
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum SsrServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
