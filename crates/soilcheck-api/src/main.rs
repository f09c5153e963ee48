use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use soilcheck_llm::HttpInferenceClient;
use soilcheck_orchestrator::FailureClassifier;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soilcheck_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soilcheck_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    tracing::info!(
        port = config.port,
        endpoint = %config.inference.endpoint.value,
        timeout_secs = config.inference.timeout_secs.value,
        max_sessions = config.max_sessions,
        "Starting Soilcheck API server"
    );

    let client = HttpInferenceClient::from_config(&config.inference)
        .context("Failed to create inference client")?;
    let classifier = FailureClassifier::from_config(&config.inference);

    let state = Arc::new(
        AppState::new(Arc::new(client), classifier).with_max_sessions(config.max_sessions),
    );

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
