use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore, MockIdentityProvider};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use revstream::aggregator::{AggregatorProxy, HttpAggregatorClient};
use revstream::config::AppConfig;
use revstream::error::AppError;
use revstream::funnel::OnboardingService;
use revstream::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sessions = Arc::new(InMemorySessionStore::default());
    let identity = Arc::new(MockIdentityProvider);
    let onboarding_service = Arc::new(OnboardingService::new(sessions, identity));

    let aggregator_client = Arc::new(HttpAggregatorClient::new(config.aggregator.base_url()));
    let aggregator_proxy = Arc::new(AggregatorProxy::new(
        aggregator_client,
        config.aggregator.clone(),
    ));

    let app = with_platform_routes(onboarding_service, aggregator_proxy)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "revenue-advance platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
