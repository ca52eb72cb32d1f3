use axum::{routing::get, Router};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;  // Import as _ since we only need the trait methods
use opentelemetry_sdk::{trace::{SdkTracerProvider, Sampler}, Resource};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use tracing_opentelemetry::OpenTelemetryLayer;

use crate::api::handlers::{db_health_handler, health_handler, level_table_handler, seller_level_handler};
use crate::api::state::AppState;
use crate::auth::AuthConfig;
use crate::db::{create_pool, DatabaseConfig, PgSellerStore};
use crate::domain::SellerLevelContext;
use crate::notify::PgNotifier;
use crate::seller_levels::{validate_levels, SellerLevelConfig};

const SERVICE_NAME: &str = "currico-seller";

pub fn init_tracing() {
    let enable_otel = env::var("OTEL_ENABLED").map(|v| v == "true").unwrap_or(false);

    let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4318/v1/traces".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(
            if !enable_otel {
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_span_events(fmt::format::FmtSpan::CLOSE) // Log span close with duration
            } else {
                // Span timing goes to the collector instead
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_span_events(fmt::format::FmtSpan::NONE)
            }
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn,h2=error"))
        );

    if enable_otel {
        match init_opentelemetry(&otel_endpoint) {
            Ok(provider) => {
                opentelemetry::global::set_tracer_provider(provider.clone());

                // global::tracer returns BoxedTracer which doesn't implement PreSampledTracer
                let tracer = provider.tracer(SERVICE_NAME);

                subscriber
                    .with(OpenTelemetryLayer::new(tracer))
                    .init();

                info!("OpenTelemetry enabled: {}", otel_endpoint);
            }
            Err(e) => {
                subscriber.init();
                tracing::error!("Failed to initialize OpenTelemetry: {}. Continuing with logs only.", e);
            }
        }
    } else {
        subscriber.init();
    }
}

fn init_opentelemetry(endpoint: &str) -> Result<SdkTracerProvider, Box<dyn std::error::Error>> {
    let environment = env::var("ENVIRONMENT")
        .unwrap_or_else(|_| "development".to_string());

    let service_name = env::var("OTEL_SERVICE_NAME")
        .unwrap_or_else(|_| SERVICE_NAME.to_string());

    let sampling_rate = env::var("OTEL_TRACE_SAMPLING_RATE")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.01)
        .clamp(0.0, 1.0);

    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", service_name))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let exporter = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build()?
    } else {
        SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?
    };

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_rate))
        .with_batch_exporter(exporter)
        .build();

    info!("OpenTelemetry sampling rate: {}%", sampling_rate * 100.0);

    Ok(provider)
}

/// Build the application state from environment variables.
/// Loads `.env` if present.
pub async fn build_state_from_env() -> Result<AppState, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let db_config = DatabaseConfig::from_env()?;
    let pool = create_pool(&db_config).await?;

    let config = SellerLevelConfig::from_env();
    validate_levels(&config.levels)?;
    info!(
        levels = config.levels.len(),
        verified_bonus_percent = config.verified_bonus_percent,
        "Loaded seller level configuration"
    );

    let levels = SellerLevelContext::new(
        Arc::new(PgSellerStore::new(pool.clone())),
        Arc::new(PgNotifier::new(pool)),
        config,
    );

    Ok(AppState::new(levels, AuthConfig::from_env()?))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/seller/level", get(seller_level_handler))
        .route("/api/seller/levels", get(level_table_handler))
        .route("/health", get(health_handler))
        .route("/health/db", get(db_health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully...");
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Currico seller service");

    let state = build_state_from_env().await?;
    let app = create_app(state);

    let port = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
