use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use hr_compliance::compliance::{
    compliance_router, today_utc, ComplianceListView, ComplianceRecordSource, ComplianceReport,
    ComplianceService, DocumentCategory, ListQuery, ReportOptions, ScheduleSettingsProvider,
    SortOrder,
};
use hr_compliance::error::AppError;
use hr_compliance::import::ComplianceCsvImporter;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Ad-hoc report over an uploaded export, independent of stored records.
#[derive(Debug, Deserialize)]
pub(crate) struct CsvReportRequest {
    pub(crate) category: DocumentCategory,
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) threshold_days: Option<u32>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) rows_per_page: Option<usize>,
    #[serde(default)]
    pub(crate) sort: Option<SortOrder>,
}

pub(crate) fn with_compliance_routes<S, R>(
    service: Arc<ComplianceService<S, R>>,
    report: ReportOptions,
) -> axum::Router
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    compliance_router(service, report)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/compliance/report",
            axum::routing::post(csv_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn csv_report_endpoint(
    Json(payload): Json<CsvReportRequest>,
) -> Result<Json<ComplianceReport>, AppError> {
    let CsvReportRequest {
        category,
        csv,
        threshold_days,
        today,
        rows_per_page,
        sort,
    } = payload;

    let records = ComplianceCsvImporter::from_reader(Cursor::new(csv.into_bytes()), category)?;
    let today = today.unwrap_or_else(today_utc);
    let threshold = threshold_days.unwrap_or_else(|| category.default_threshold_days());
    let view = ComplianceListView::build(
        category,
        records,
        threshold,
        today,
        &ListQuery {
            sort: sort.unwrap_or_default(),
            ..ListQuery::default()
        },
    );
    let options = rows_per_page
        .map(|rows_per_page| ReportOptions { rows_per_page })
        .unwrap_or_default();

    Ok(Json(ComplianceReport::from_view(&view, options)))
}
