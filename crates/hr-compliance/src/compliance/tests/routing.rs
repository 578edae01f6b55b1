use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::compliance::domain::{DocumentCategory, EmployeeId};
use crate::compliance::repository::ComplianceRecordSource;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn evaluate_route_applies_the_zero_threshold_rule() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/compliance/evaluate",
            json!({ "relevant_date": "2025-06-15", "threshold_days": 0, "today": "2025-06-15" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("active"));
    assert_eq!(payload["badge"], json!("green"));
    assert_eq!(payload["days_remaining"], json!(0));
}

#[tokio::test]
async fn evaluate_route_uses_scheduling_labels_for_spot_checks() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/compliance/evaluate",
            json!({ "threshold_days": 30, "today": "2025-06-15", "category": "spot_check" }),
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("missing"));
    assert_eq!(payload["status_label"], json!("Not Scheduled"));
    assert!(payload.get("days_remaining").is_none());
}

#[tokio::test]
async fn list_route_filters_by_status() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/companies/acme/compliance/passport?status=expired&today=2025-06-15",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["subject_id"], json!("emp-001"));
    assert_eq!(payload["counts"]["expiring_soon"], json!(1));
    assert_eq!(payload["degraded"], json!(false));
}

#[tokio::test]
async fn list_route_accepts_scheduling_status_aliases() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/companies/acme/compliance/spot-check?status=not_scheduled&today=2025-06-15",
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status_label"], json!("Not Scheduled"));
    assert_eq!(rows[0]["action"], json!("renew"));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request("/api/v1/companies/acme/compliance/visa"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_route_requires_supporting_document() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            "/api/v1/companies/acme/compliance/passport/emp-001",
            json!({ "relevant_date": "2030-01-01" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("supporting document"));
}

#[tokio::test]
async fn update_route_returns_reevaluated_row() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            "/api/v1/companies/acme/compliance/passport/emp-001?today=2025-06-15",
            json!({
                "relevant_date": "2025-07-01",
                "supporting_document": { "file_name": "passport.pdf" }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("expiring_soon"));
    assert_eq!(payload["days_remaining"], json!(16));
    assert_eq!(
        payload["record"]["supporting_document"]["content_type"],
        json!("application/pdf")
    );
}

#[tokio::test]
async fn schedule_routes_round_trip_thresholds() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/companies/acme/schedule",
            json!({ "thresholds": { "dbs": 60, "immigration": 14 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get_request("/api/v1/companies/acme/schedule"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["company_id"], json!("acme"));
    assert_eq!(payload["thresholds"]["dbs"], json!(60));
    assert_eq!(payload["thresholds"]["immigration"], json!(14));
    assert_eq!(payload["thresholds"]["passport"], json!(0));
    assert_eq!(payload["thresholds"]["spot_check"], json!(30));
}

#[tokio::test]
async fn schedule_route_rejects_out_of_range_thresholds() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/companies/acme/schedule",
            json!({ "thresholds": { "passport": 99999 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn report_route_paginates_with_router_default() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/companies/acme/reports/passport?today=2025-06-15",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let pages = payload["pages"].as_array().expect("pages array");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1]["footer"], json!("Page 2 of 2"));
    assert_eq!(payload["total_rows"], json!(4));
}

#[tokio::test]
async fn overview_route_reports_each_category() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get_request(
            "/api/v1/companies/acme/compliance?today=2025-06-15",
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let categories = payload["categories"].as_array().expect("categories array");
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[0]["category"], json!("passport"));
    assert_eq!(categories[0]["counts"]["expired"], json!(1));
}

#[tokio::test]
async fn employee_named_report_can_be_updated() {
    let (service, _, records) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PATCH",
            "/api/v1/companies/acme/compliance/dbs/report?today=2025-06-15",
            json!({
                "relevant_date": "2026-06-15",
                "subject_name": "Rhea Port",
                "supporting_document": { "file_name": "dbs.png" }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["subject_id"], json!("report"));
    assert_eq!(payload["status"], json!("active"));
    assert!(records
        .fetch(
            &company(),
            DocumentCategory::Dbs,
            &EmployeeId("report".to_string())
        )
        .expect("fetch")
        .is_some());
}
