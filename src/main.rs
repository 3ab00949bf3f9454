use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{self, EnvFilter};

use optopsy_payoff::engine::config::AnalysisConfig;
use optopsy_payoff::server::PayoffServer;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real env vars take precedence
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Arc::new(AnalysisConfig::from_env()?);
    tracing::info!(
        samples = config.samples,
        range_fraction = config.range_fraction,
        "Loaded analysis config"
    );

    if let Ok(port) = std::env::var("PORT") {
        // HTTP mode for hosted deployments
        use rmcp::transport::streamable_http_server::{
            session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
        };

        let service = StreamableHttpService::new(
            move || Ok(PayoffServer::new(config.clone())),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig::default(),
        );

        let app = axum::Router::new()
            .nest_service("/mcp", service)
            .route("/health", axum::routing::get(|| async { "ok" }));

        let addr = format!("0.0.0.0:{port}");
        tracing::info!("Starting optopsy-payoff HTTP server on {addr}");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
    } else {
        // stdio mode for local MCP clients
        tracing::info!("Starting optopsy-payoff MCP server (stdio)");

        let server = PayoffServer::new(config);
        let service = server.serve(rmcp::transport::stdio()).await?;
        service.waiting().await?;
    }

    Ok(())
}
