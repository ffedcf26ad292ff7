use std::sync::Arc;
use std::time::Duration;

use alloy::providers::ProviderBuilder;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use rmcp::transport::SseServer;
use rmcp::transport::sse_server::SseServerConfig;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::middleware::trace::http_trace_layer;
use crate::repository::AlloyChainTransport;
use crate::service::{RouterSwapService, TokenRegistry};
use crate::swap::SwapOrchestrator;

/// Builds the swap pipeline on a single RPC transport shared by every session.
pub fn build_orchestrator(config: &Config) -> anyhow::Result<(SwapOrchestrator, TokenRegistry)> {
    let settings = config.router.settings()?;

    let provider = ProviderBuilder::new().connect_http(config.rpc.url.parse()?);
    let transport = AlloyChainTransport::new(
        Arc::new(provider),
        settings.multicall,
        config.rpc.timeout(),
    );

    tracing::info!(
        "Router {} on {} (wrapped native {}, max hops {}, default slippage {} bps)",
        settings.router,
        config.rpc.url,
        settings.wrapped_native,
        settings.max_hops,
        settings.default_slippage_bps
    );

    let orchestrator = SwapOrchestrator::new(Arc::new(transport), &settings);
    Ok((orchestrator, TokenRegistry::new(settings.wrapped_native)))
}

pub fn build_app(cancellation_token: CancellationToken, config: Config) -> anyhow::Result<Router> {
    let addr = config.server_uri().parse()?;

    let sse_config = SseServerConfig {
        bind: addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: cancellation_token,
        sse_keep_alive: Some(Duration::from_secs(15)),
    };

    let (sse_server, sse_router) = SseServer::new(sse_config);

    let (orchestrator, token_registry) = build_orchestrator(&config)?;
    let swap_service =
        move || RouterSwapService::new(orchestrator.clone(), token_registry.clone());

    sse_server.with_service(swap_service);

    let app = Router::new()
        .route("/health", get(|| async move { StatusCode::OK }))
        .nest("/router", sse_router)
        .layer(http_trace_layer());

    Ok(app)
}
