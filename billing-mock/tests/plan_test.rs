//! Plan catalog and plan assignment integration tests.

mod common;

use billing_mock::config::ResponseMode;
use common::{error_code, TestApp};
use serde_json::json;

#[tokio::test]
async fn plan_lifecycle_create_deactivate_delete() {
    let app = TestApp::spawn().await;
    let plan_no = app.create_plan("gold", "Gold").await;

    let details = app
        .admin("get_plan_details_m", json!({"client_plan_id": "gold"}))
        .await;
    assert_eq!(error_code(&details), 0);
    assert_eq!(details["plan_no"], plan_no);
    assert_eq!(details["active_ind"], 1);
    assert_eq!(details["currency_cd"], "usd");

    let deactivated = app
        .admin(
            "edit_plan_m",
            json!({
                "client_plan_id": "gold",
                "plan_name": "Gold",
                "edit_directives": 2,
                "active": 0
            }),
        )
        .await;
    assert_eq!(error_code(&deactivated), 0);
    assert_eq!(deactivated["plan_no"], plan_no);

    let listed = app.admin("get_client_plans_all_m", json!({})).await;
    assert!(listed["all_client_plan_dtls"].as_array().unwrap().is_empty());
    let stats = app.stats().await;
    assert_eq!(stats.plans, 1);
    assert_eq!(stats.active_plans, 0);

    let deleted = app
        .admin("delete_plans_m", json!({"plan_nos": [plan_no]}))
        .await;
    assert_eq!(error_code(&deleted), 0);
    assert_eq!(app.stats().await.plans, 0);

    let gone = app
        .admin("get_plan_details_m", json!({"client_plan_id": "gold"}))
        .await;
    assert_eq!(error_code(&gone), 1009);
}

#[tokio::test]
async fn deleting_an_unknown_plan_removes_nothing() {
    let app = TestApp::spawn().await;
    let plan_no = app.create_plan("gold", "Gold").await;

    let body = app
        .admin("delete_plans_m", json!({"plan_nos": [plan_no, 99999]}))
        .await;
    assert_eq!(error_code(&body), 1009);
    assert_eq!(app.stats().await.plans, 1);
}

#[tokio::test]
async fn active_plan_names_and_ids_are_unique() {
    let app = TestApp::spawn().await;
    app.create_plan("gold", "Gold").await;

    let same_name = app
        .admin(
            "create_new_plan_m",
            json!({
                "plan_name": "Gold",
                "client_plan_id": "gold-2",
                "plan_type": "Master Recurring Plan",
                "currency": "usd"
            }),
        )
        .await;
    assert_eq!(error_code(&same_name), 1009);

    let bad_type = app
        .admin(
            "create_new_plan_m",
            json!({
                "plan_name": "Silver",
                "client_plan_id": "silver",
                "plan_type": "Weekly Plan",
                "currency": "usd"
            }),
        )
        .await;
    assert_eq!(error_code(&bad_type), 1009);
    assert_eq!(app.stats().await.plans, 1);
}

#[tokio::test]
async fn deactivated_plan_id_can_be_reused() {
    let app = TestApp::spawn().await;
    let first = app.create_plan("gold", "Gold").await;
    app.admin(
        "edit_plan_m",
        json!({
            "client_plan_id": "gold",
            "plan_name": "Gold",
            "edit_directives": 2,
            "active": 0
        }),
    )
    .await;

    let second = app.create_plan("gold", "Gold").await;
    assert_ne!(first, second);
    assert_eq!(app.stats().await.active_plans, 1);
}

#[tokio::test]
async fn edit_requires_replace_directive_and_matching_name() {
    let app = TestApp::spawn().await;
    app.create_plan("gold", "Gold").await;

    let no_directive = app
        .admin(
            "edit_plan_m",
            json!({"client_plan_id": "gold", "plan_name": "Gold", "active": 0}),
        )
        .await;
    assert_eq!(error_code(&no_directive), 1009);

    let wrong_name = app
        .admin(
            "edit_plan_m",
            json!({
                "client_plan_id": "gold",
                "plan_name": "Platinum",
                "edit_directives": 2,
                "active": 0
            }),
        )
        .await;
    assert_eq!(error_code(&wrong_name), 1009);
    assert_eq!(app.stats().await.active_plans, 1);
}

#[tokio::test]
async fn form_encoded_plan_calls_are_accepted() {
    let app = TestApp::spawn().await;

    let created = app
        .admin_form(
            "create_new_plan_m",
            &[
                ("plan_name", "Compute"),
                ("client_plan_id", "compute"),
                ("plan_type", "Master Usage-Based Plan"),
                ("currency", "USD"),
                ("service[0][client_service_id]", "compute.hours"),
                ("service[0][name]", "Compute hours"),
                ("service[0][service_type]", "Usage-Based"),
                ("service[0][tier][0][schedule][0][from]", "1"),
                ("service[0][tier][0][schedule][0][amount]", "0.25"),
            ],
        )
        .await;
    assert_eq!(error_code(&created), 0, "{}", created);
    let plan_no = created["plan_no"].as_i64().unwrap();

    let details = app
        .admin("get_plan_details_m", json!({"client_plan_id": "compute"}))
        .await;
    assert_eq!(details["currency_cd"], "usd");
    assert_eq!(
        details["plan_services"][0]["client_service_id"],
        "compute.hours"
    );

    let plan_no_text = plan_no.to_string();
    let deleted = app
        .admin_form("delete_plans_m", &[("plan_nos[0]", plan_no_text.as_str())])
        .await;
    assert_eq!(error_code(&deleted), 0);
    assert_eq!(app.stats().await.plans, 0);
}

#[tokio::test]
async fn client_plans_filter_by_id() {
    let app = TestApp::spawn().await;
    app.create_plan("gold", "Gold").await;
    app.create_plan("silver", "Silver").await;

    let all = app.admin("get_client_plans_all_m", json!({})).await;
    assert_eq!(all["all_client_plan_dtls"].as_array().unwrap().len(), 2);

    let one = app
        .admin("get_client_plans_all_m", json!({"client_plan_id": "silver"}))
        .await;
    let plans = one["all_client_plan_dtls"].as_array().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["plan_name"], "Silver");

    let unknown = app
        .admin("get_client_plans_all_m", json!({"client_plan_id": "bronze"}))
        .await;
    assert_eq!(error_code(&unknown), 1009);
}

#[tokio::test]
async fn service_rates_follow_response_mode() {
    let strict = TestApp::spawn().await;
    strict.create_plan("gold", "Gold").await;
    let rates = strict
        .admin(
            "get_client_plan_service_rates_m",
            json!({"client_plan_id": "gold", "client_service_id": "gold.monthly"}),
        )
        .await;
    assert_eq!(error_code(&rates), 0);
    assert_eq!(rates["plan_service_rates"][0]["rate_per_unit"], 10.0);

    let foreign = strict
        .admin(
            "get_client_plan_service_rates_m",
            json!({"client_plan_id": "gold", "client_service_id": "other"}),
        )
        .await;
    assert_eq!(error_code(&foreign), 1009);

    let loose = TestApp::spawn_with_mode(ResponseMode::Loose).await;
    loose.create_plan("gold", "Gold").await;
    let rates = loose
        .admin(
            "get_client_plan_service_rates_m",
            json!({"client_plan_id": "gold", "client_service_id": "gold.monthly"}),
        )
        .await;
    assert_eq!(rates, json!({"error_code": 0, "error_msg": "OK"}));
}

#[tokio::test]
async fn assigned_plans_are_listed_for_the_account() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;
    let plan_no = app.create_plan("gold", "Gold").await;
    app.create_plan("silver", "Silver").await;

    for plan in ["gold", "silver"] {
        let assigned = app
            .core(
                "assign_acct_plan_m",
                json!({"acct_no": acct_no, "new_client_plan_id": plan}),
            )
            .await;
        assert_eq!(error_code(&assigned), 0);
        assert!(assigned["plan_instance_no"].as_i64().unwrap() > 0);
    }

    let all = app
        .core("get_acct_plans_all_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(all["all_acct_plans_m"].as_array().unwrap().len(), 2);

    let filtered = app
        .core(
            "get_acct_plans_m",
            json!({
                "acct_no": acct_no,
                "product_catalog_plan_filter": [{"client_plan_id": "gold"}]
            }),
        )
        .await;
    let rows = filtered["acct_plans_m"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["plan_no"], plan_no);
    assert_eq!(rows[0]["plan_name"], "Gold");
    assert_eq!(app.stats().await.plan_assignments, 2);
}

#[tokio::test]
async fn inactive_plan_cannot_be_assigned() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;
    app.create_plan("gold", "Gold").await;
    app.admin(
        "edit_plan_m",
        json!({
            "client_plan_id": "gold",
            "plan_name": "Gold",
            "edit_directives": 2,
            "active": 0
        }),
    )
    .await;

    let body = app
        .core(
            "assign_acct_plan_m",
            json!({"acct_no": acct_no, "new_client_plan_id": "gold"}),
        )
        .await;
    assert_eq!(error_code(&body), 1009);
    assert_eq!(app.stats().await.plan_assignments, 0);
}
