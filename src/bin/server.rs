use rotating_bloom_rs::api::create_router;
use rotating_bloom_rs::common::bits2hr;
use rotating_bloom_rs::types::AppState;
use rotating_bloom_rs::{
    FilterConfigBuilder, InMemoryStorage, RotatingBloomSeries, ServerConfig,
};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // load configuration from environment variables
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    let filter_config = FilterConfigBuilder::default()
        .capacity(Some(config.bloom_capacity))
        .false_positive_rate(Some(config.bloom_false_positive_rate))
        .resolution(config.bloom_resolution)
        .retention_limit(config.bloom_retention_limit)
        .build()
        .expect("Failed to build filter config");

    let store = Arc::new(InMemoryStorage::new());
    let series = RotatingBloomSeries::new(
        store,
        config.bloom_base_key.clone(),
        filter_config,
    )
    .expect("Failed to create filter series");
    let params = series.params();

    let state = Arc::new(AppState { series });

    // Create router with logging middleware
    let app = create_router(state).layer(
        tower_http::trace::TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    tracing::info!(
                        status = %response.status(),
                        latency = ?latency,
                        "response generated"
                    );
                },
            ),
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!(
        "Server running on http://{}; base key '{}', one bucket holds {} \
         ({} hash derivations), resolution {:?}, retention {:?}",
        addr,
        config.bloom_base_key,
        bits2hr(params.bits),
        params.hash_count,
        config.bloom_resolution,
        config.bloom_retention_limit,
    );
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.unwrap();
}
