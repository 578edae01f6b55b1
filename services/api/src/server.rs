use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryComplianceRecords, InMemoryScheduleSettings};
use crate::routes::with_compliance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hr_compliance::compliance::{ComplianceService, ReportOptions};
use hr_compliance::config::AppConfig;
use hr_compliance::error::AppError;
use hr_compliance::telemetry;
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

    let settings = Arc::new(InMemoryScheduleSettings::default());
    let records = Arc::new(InMemoryComplianceRecords::default());
    let compliance_service = Arc::new(ComplianceService::new(settings, records));
    let report_options = ReportOptions {
        rows_per_page: config.report.rows_per_page,
    };

    let app = with_compliance_routes(compliance_service, report_options)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        rows_per_page = report_options.rows_per_page,
        "hr compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
