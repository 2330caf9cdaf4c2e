use crate::cli::ServeArgs;
use crate::infra::{seed_catalog, AppState};
use crate::routes::with_order_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use forno::config::AppConfig;
use forno::error::AppError;
use forno::ordering::{InMemoryOrderRepository, OrderService};
use forno::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
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

    let catalog = Arc::new(seed_catalog()?);
    let (products, addons) = catalog.len();
    let repository = Arc::new(InMemoryOrderRepository::default());
    let service = Arc::new(OrderService::new(
        repository,
        catalog,
        config.ordering,
    ));

    let app = with_order_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        products,
        addons,
        "ordering service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
