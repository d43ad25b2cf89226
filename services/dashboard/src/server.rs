use crate::cli::ServeArgs;
use crate::infra::{load_directory, report_cache, AppState, ReportState};
use crate::routes::with_report_routes;
use account_insight::config::AppConfig;
use account_insight::error::AppError;
use account_insight::telemetry;
use account_insight::workflows::account_report::AccountReportBuilder;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let directory = Arc::new(load_directory(config.directory.fixture_path.as_deref())?);
    let builder = AccountReportBuilder::new(directory, report_cache(&config.report));
    if config.directory.credential.is_none() {
        warn!("DIRECTORY_CREDENTIAL is not set; report requests will be refused");
    }
    let report_state = ReportState::new(builder, config.directory.credential.take());

    let app = with_report_routes(report_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cache_capacity = config.report.cache_capacity.get(),
        cache_ttl_secs = config.report.cache_ttl.as_secs(),
        "account insight dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
