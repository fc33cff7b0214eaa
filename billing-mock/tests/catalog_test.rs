//! Service and usage-type integration tests.

mod common;

use common::{error_code, TestApp};
use serde_json::json;

#[tokio::test]
async fn service_is_visible_after_creation() {
    let app = TestApp::spawn().await;

    let created = app
        .admin(
            "create_service_m",
            json!({
                "client_service_id": "minutes",
                "service_name": "Voice minutes",
                "service_type": "Usage-Based",
                "taxable_ind": 1
            }),
        )
        .await;
    assert_eq!(error_code(&created), 0);
    let service_no = created["service_no"].as_i64().unwrap();

    let details = app
        .admin("get_service_details_m", json!({"client_service_id": "minutes"}))
        .await;
    assert_eq!(details["service_no"], service_no);
    assert_eq!(details["service_name"], "Voice minutes");
    assert_eq!(details["taxable_ind"], 1);
}

#[tokio::test]
async fn unknown_service_and_bad_type_are_rejected() {
    let app = TestApp::spawn().await;

    let unknown = app
        .admin("get_service_details_m", json!({"client_service_id": "nope"}))
        .await;
    assert_eq!(error_code(&unknown), 1009);

    let bad_type = app
        .admin(
            "create_service_m",
            json!({
                "client_service_id": "minutes",
                "service_name": "Voice minutes",
                "service_type": "Quarterly"
            }),
        )
        .await;
    assert_eq!(error_code(&bad_type), 1009);
    assert_eq!(app.stats().await.services, 0);
}

#[tokio::test]
async fn service_created_by_form_is_readable_over_json() {
    let app = TestApp::spawn().await;

    let created = app
        .admin_form(
            "create_service_m",
            &[
                ("client_service_id", "sms"),
                ("name", "Text messages"),
                ("service_type", "Usage-Based"),
            ],
        )
        .await;
    assert_eq!(error_code(&created), 0, "{}", created);

    let details = app
        .core("get_service_details_m", json!({"client_service_id": "sms"}))
        .await;
    assert_eq!(details["service_name"], "Text messages");
}

#[tokio::test]
async fn usage_type_update_keeps_its_number() {
    let app = TestApp::spawn().await;

    let created = app
        .admin(
            "create_usage_type_m",
            json!({
                "usage_type_code": "calls",
                "usage_type_name": "Calls",
                "usage_unit_type": "minute"
            }),
        )
        .await;
    assert_eq!(error_code(&created), 0);
    let usage_type_no = created["usage_type_no"].as_i64().unwrap();

    let updated = app
        .admin(
            "update_usage_type_m",
            json!({"usage_type_code": "calls", "usage_type_name": "Voice calls"}),
        )
        .await;
    assert_eq!(updated["usage_type_no"], usage_type_no);

    let details = app
        .admin("get_usage_type_details_m", json!({"usage_type_code": "calls"}))
        .await;
    assert_eq!(details["usage_type_name"], "Voice calls");
    assert_eq!(details["usage_unit_type"], "minute");
    assert_eq!(app.stats().await.usage_types, 1);
}

#[tokio::test]
async fn usage_type_lookup_creates_unknown_codes() {
    let app = TestApp::spawn().await;

    let first = app
        .admin_form("get_usage_type_details_m", &[("usage_type_code", "gb")])
        .await;
    assert_eq!(error_code(&first), 0);
    let second = app
        .core("get_usage_type_details_m", json!({"usage_type_code": "gb"}))
        .await;

    assert_eq!(first["usage_type_no"], second["usage_type_no"]);
    assert_eq!(app.stats().await.usage_types, 1);

    let blank = app
        .admin("get_usage_type_details_m", json!({"usage_type_code": ""}))
        .await;
    assert_eq!(error_code(&blank), 1009);
}

#[tokio::test]
async fn unknown_rest_call_is_a_decode_error() {
    let app = TestApp::spawn().await;

    let body = app.admin("launch_rocket_m", json!({})).await;
    assert_eq!(error_code(&body), 1001);

    let missing = app
        .raw("/admin", "application/json", r#"{"client_no": 1}"#)
        .await;
    assert_eq!(error_code(&missing), 1001);
}
