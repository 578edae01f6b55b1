use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CompanyId, DocumentCategory, EmployeeId};
use super::evaluator::{days_until, evaluate, today_utc, BadgeTone, ComplianceStatus};
use super::listing::{ListQuery, SortOrder};
use super::report::{ComplianceReport, ReportOptions};
use super::repository::{ComplianceRecordSource, RecordUpdate, RepositoryError};
use super::schedule::{ScheduleInterval, ScheduleSettingsProvider};
use super::service::{ComplianceService, ComplianceServiceError};

pub(crate) struct RouterState<S, R> {
    pub(crate) service: Arc<ComplianceService<S, R>>,
    pub(crate) report: ReportOptions,
}

/// Router exposing evaluation, list screens, updates, schedules, and reports.
pub fn compliance_router<S, R>(
    service: Arc<ComplianceService<S, R>>,
    report: ReportOptions,
) -> Router
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let state = Arc::new(RouterState { service, report });

    Router::new()
        .route("/api/v1/compliance/evaluate", post(evaluate_handler))
        .route(
            "/api/v1/companies/:company_id/compliance",
            get(overview_handler::<S, R>),
        )
        .route(
            "/api/v1/companies/:company_id/compliance/:category",
            get(list_handler::<S, R>),
        )
        .route(
            "/api/v1/companies/:company_id/reports/:category",
            get(report_handler::<S, R>),
        )
        .route(
            "/api/v1/companies/:company_id/compliance/:category/:subject_id",
            patch(update_handler::<S, R>),
        )
        .route(
            "/api/v1/companies/:company_id/schedule",
            get(schedule_handler::<S, R>).put(replace_schedule_handler::<S, R>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(default)]
    pub(crate) relevant_date: Option<NaiveDate>,
    pub(crate) threshold_days: u32,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) category: Option<DocumentCategory>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) status: ComplianceStatus,
    pub(crate) status_label: &'static str,
    pub(crate) badge: BadgeTone,
    pub(crate) today: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) days_remaining: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) status: Option<ComplianceStatus>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<SortOrder>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

impl ListParams {
    fn query(&self) -> ListQuery {
        ListQuery {
            status: self.status,
            search: self.search.clone(),
            sort: self.sort.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportParams {
    #[serde(default)]
    pub(crate) rows_per_page: Option<usize>,
    #[serde(default)]
    pub(crate) sort: Option<SortOrder>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayParam {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleBody {
    pub(crate) thresholds: BTreeMap<DocumentCategory, u32>,
}

pub(crate) async fn evaluate_handler(Json(request): Json<EvaluateRequest>) -> Response {
    let today = request.today.unwrap_or_else(today_utc);
    let status = evaluate(request.relevant_date, request.threshold_days, today);
    let category = request.category.unwrap_or(DocumentCategory::Passport);

    let response = EvaluateResponse {
        status,
        status_label: status.label(category),
        badge: status.badge(),
        today,
        days_remaining: request
            .relevant_date
            .map(|relevant| days_until(relevant, today)),
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn overview_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path(company_id): Path<String>,
    Query(params): Query<TodayParam>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let today = params.today.unwrap_or_else(today_utc);
    let overview = state.service.overview(&CompanyId(company_id), today);
    (StatusCode::OK, Json(overview)).into_response()
}

pub(crate) async fn list_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path((company_id, category)): Path<(String, String)>,
    Query(params): Query<ListParams>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let category = match category.parse::<DocumentCategory>() {
        Ok(category) => category,
        Err(err) => return not_found(err.to_string()),
    };

    let today = params.today.unwrap_or_else(today_utc);
    let outcome = state
        .service
        .list(&CompanyId(company_id), category, today, &params.query());
    (StatusCode::OK, Json(outcome)).into_response()
}

pub(crate) async fn report_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path((company_id, category)): Path<(String, String)>,
    Query(params): Query<ReportParams>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let category = match category.parse::<DocumentCategory>() {
        Ok(category) => category,
        Err(err) => return not_found(err.to_string()),
    };

    let today = params.today.unwrap_or_else(today_utc);
    let query = ListQuery {
        sort: params.sort.unwrap_or_default(),
        ..ListQuery::default()
    };
    let outcome = state
        .service
        .list(&CompanyId(company_id), category, today, &query);

    let options = ReportOptions {
        rows_per_page: params
            .rows_per_page
            .filter(|rows| *rows > 0)
            .unwrap_or(state.report.rows_per_page),
    };
    let report = ComplianceReport::from_view(&outcome.view, options);
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn update_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path((company_id, category, subject_id)): Path<(String, String, String)>,
    Query(params): Query<TodayParam>,
    Json(update): Json<RecordUpdate>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let category = match category.parse::<DocumentCategory>() {
        Ok(category) => category,
        Err(err) => return not_found(err.to_string()),
    };

    let today = params.today.unwrap_or_else(today_utc);
    match state.service.update(
        &CompanyId(company_id),
        category,
        &EmployeeId(subject_id),
        update,
        today,
    ) {
        Ok(row) => (StatusCode::OK, Json(row)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn schedule_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path(company_id): Path<String>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let schedule = state.service.schedule(&CompanyId(company_id));
    (StatusCode::OK, Json(schedule)).into_response()
}

pub(crate) async fn replace_schedule_handler<S, R>(
    State(state): State<Arc<RouterState<S, R>>>,
    Path(company_id): Path<String>,
    Json(body): Json<ScheduleBody>,
) -> Response
where
    S: ScheduleSettingsProvider + 'static,
    R: ComplianceRecordSource + 'static,
{
    let interval = ScheduleInterval {
        company_id: CompanyId(company_id),
        thresholds: body.thresholds,
    };
    match state.service.replace_schedule(interval) {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(err) => service_error(err),
    }
}

fn not_found(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn service_error(err: ComplianceServiceError) -> Response {
    let status = match &err {
        ComplianceServiceError::Update(_) | ComplianceServiceError::Settings(
            super::schedule::SettingsError::ThresholdOutOfRange { .. },
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        ComplianceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ComplianceServiceError::Repository(RepositoryError::Unavailable(_))
        | ComplianceServiceError::Settings(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
