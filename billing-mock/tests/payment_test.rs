//! Payment method, collections group and session integration tests.

mod common;

use common::{error_code, TestApp};
use serde_json::{json, Value};

fn card(acct_no: i64, billing_group: &str, number: &str, year: i64) -> Value {
    json!({
        "acct_no": acct_no,
        "client_billing_group_id": billing_group,
        "cc_number": number,
        "cc_expire_mm": 12,
        "cc_expire_yyyy": year,
        "cvv": 123
    })
}

#[tokio::test]
async fn payment_method_lifecycle() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let added = app
        .core(
            "add_acct_payment_method_m",
            card(acct_no, "acme-1.billing_group", "4111111111111111", 2099),
        )
        .await;
    assert_eq!(error_code(&added), 0, "{}", added);
    let payment_method_no = added["payment_method_no"].as_i64().unwrap();

    let listed = app
        .core(
            "get_acct_payment_methods_and_terms_m",
            json!({"acct_no": acct_no}),
        )
        .await;
    let methods = listed["account_payment_methods"].as_array().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["cc_suffix"], "1111");

    let removed = app
        .core(
            "remove_acct_payment_method_m",
            json!({"acct_no": acct_no, "payment_method_no": payment_method_no}),
        )
        .await;
    assert_eq!(removed, json!({"error_code": 0, "error_msg": "OK"}));

    let active = app
        .core(
            "get_acct_payment_methods_and_terms_m",
            json!({"acct_no": acct_no}),
        )
        .await;
    assert!(active["account_payment_methods"]
        .as_array()
        .unwrap()
        .is_empty());

    let everything = app
        .core(
            "get_acct_payment_methods_and_terms_m",
            json!({"acct_no": acct_no, "filter_status": 0}),
        )
        .await;
    assert_eq!(
        everything["account_payment_methods"]
            .as_array()
            .unwrap()
            .len(),
        1
    );

    let again = app
        .core(
            "remove_acct_payment_method_m",
            json!({"acct_no": acct_no, "payment_method_no": payment_method_no}),
        )
        .await;
    assert_eq!(error_code(&again), 1009);
}

#[tokio::test]
async fn bad_cards_are_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let expired = app
        .core(
            "add_acct_payment_method_m",
            card(acct_no, "acme-1.billing_group", "4111111111111111", 2020),
        )
        .await;
    assert_eq!(error_code(&expired), 1004);

    let letters = app
        .core(
            "add_acct_payment_method_m",
            card(acct_no, "acme-1.billing_group", "4111abcd11111111", 2099),
        )
        .await;
    assert_eq!(error_code(&letters), 1004);

    let unknown_group = app
        .core(
            "add_acct_payment_method_m",
            card(acct_no, "nope", "4111111111111111", 2099),
        )
        .await;
    assert_eq!(error_code(&unknown_group), 1009);

    assert_eq!(app.stats().await.payment_methods, 0);
}

#[tokio::test]
async fn payments_returned_limits_the_listing() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;
    for number in ["4111111111111111", "5555555555554444"] {
        let added = app
            .core(
                "add_acct_payment_method_m",
                card(acct_no, "acme-1.billing_group", number, 2099),
            )
            .await;
        assert_eq!(error_code(&added), 0);
    }

    let listed = app
        .core(
            "get_acct_payment_methods_and_terms_m",
            json!({"acct_no": acct_no, "payments_returned": 1}),
        )
        .await;
    assert_eq!(listed["account_payment_methods"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn billing_group_update_attaches_primary_card() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let updated = app
        .core(
            "update_acct_billing_group_m",
            card(acct_no, "acme-1.billing_group", "4111111111111111", 2099),
        )
        .await;
    assert_eq!(error_code(&updated), 0, "{}", updated);
    let payment_method_no = updated["payment_method_no"].as_i64().unwrap();

    let groups = app
        .core(
            "get_acct_billing_group_details_m",
            json!({"acct_no": acct_no}),
        )
        .await;
    assert_eq!(
        groups["billing_group_details"][0]["primary_payment_method_no"],
        payment_method_no
    );
}

#[tokio::test]
async fn collections_group_cannot_be_assigned_twice() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;
    let request = json!({"acct_no": acct_no, "client_acct_group_id": "collections-eu"});

    let first = app
        .core("assign_collections_acct_group_m", request.clone())
        .await;
    assert_eq!(error_code(&first), 0);

    let second = app.core("assign_collections_acct_group_m", request).await;
    assert_eq!(error_code(&second), 12004);
}

#[tokio::test]
async fn session_requires_known_account() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let opened = app.core("set_session_m", json!({"acct_no": acct_no})).await;
    assert_eq!(error_code(&opened), 0);
    let session_id = opened["session_id"].as_str().unwrap();
    assert_eq!(session_id.len(), 32);

    let by_user = app.core("set_session_m", json!({"user_id": "u-1"})).await;
    assert_eq!(error_code(&by_user), 0);
    assert_ne!(by_user["session_id"], opened["session_id"]);

    let unknown = app
        .core("set_session_m", json!({"acct_no": acct_no + 1}))
        .await;
    assert_eq!(error_code(&unknown), 1002);
    assert_eq!(app.stats().await.sessions, 2);
}
