//! Account and billing/dunning group integration tests.

mod common;

use billing_mock::config::ResponseMode;
use common::{error_code, TestApp};
use serde_json::json;

#[tokio::test]
async fn created_account_is_visible_to_get_account() {
    let app = TestApp::spawn().await;

    let created = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [{"client_acct_id": "acme-1", "userid": "u-1"}]}),
        )
        .await;
    assert_eq!(error_code(&created), 0);
    assert_eq!(created["error_msg"], "OK");
    let acct_no = created["out_acct"][0]["acct_no"].as_i64().unwrap();

    let details = app
        .core("get_acct_details_all_m", json!({"client_acct_id": "acme-1"}))
        .await;
    assert_eq!(error_code(&details), 0);
    assert_eq!(details["client_acct_id"], "acme-1");
    assert_eq!(details["acct_no"], acct_no);
    assert!(!details["billing_groups_info"].as_array().unwrap().is_empty());
    assert!(!details["dunning_groups_info"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_lookups_do_not_drift() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    for _ in 0..3 {
        let details = app
            .core("get_acct_details_all_m", json!({"client_acct_id": "acme-1"}))
            .await;
        assert_eq!(details["acct_no"], acct_no);
        assert_eq!(details["acct_currency"], "usd");
    }
}

#[tokio::test]
async fn reused_client_id_or_userid_is_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    app.create_account("acme-1", "u-1").await;
    let before = app.stats().await;

    let same_client = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [{"client_acct_id": "acme-1", "userid": "u-2"}]}),
        )
        .await;
    assert_eq!(error_code(&same_client), 1004);

    let same_user = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [{"client_acct_id": "acme-2", "userid": "u-1"}]}),
        )
        .await;
    assert_eq!(error_code(&same_user), 1004);

    assert_eq!(app.stats().await, before);
}

#[tokio::test]
async fn batch_with_internal_duplicate_creates_nothing() {
    let app = TestApp::spawn().await;

    let body = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [
                {"client_acct_id": "a-1", "userid": "u-1"},
                {"client_acct_id": "a-1", "userid": "u-2"}
            ]}),
        )
        .await;
    assert_eq!(error_code(&body), 1004);
    assert_eq!(app.stats().await.accounts, 0);
}

#[tokio::test]
async fn account_with_master_plan_reports_assignment() {
    let app = TestApp::spawn().await;
    app.create_plan("gold", "Gold").await;

    let body = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [{
                "client_acct_id": "acme-1",
                "userid": "u-1",
                "acct_currency": "usd",
                "billing_group": [{"client_billing_group_id": "acme-1.bg"}],
                "master_plans_detail": [{
                    "client_plan_id": "gold",
                    "client_plan_instance_id": "acme-1.gold",
                    "billing_group_idx": 1
                }]
            }]}),
        )
        .await;
    assert_eq!(error_code(&body), 0);

    let assigned = &body["out_acct"][0]["master_plans_assigned"][0];
    assert_eq!(assigned["client_plan_instance_id"], "acme-1.gold");
    assert_eq!(
        body["out_acct"][0]["acct_billing_groups"][0]["client_billing_group_id"],
        "acme-1.bg"
    );

    let unknown_plan = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [{
                "client_acct_id": "acme-2",
                "userid": "u-2",
                "master_plans_detail": [{"client_plan_id": "platinum"}]
            }]}),
        )
        .await;
    assert_eq!(error_code(&unknown_plan), 1009);
}

#[tokio::test]
async fn unknown_account_lookup_fails_with_1004() {
    let app = TestApp::spawn().await;
    let body = app
        .core("get_acct_details_all_m", json!({"client_acct_id": "ghost"}))
        .await;
    assert_eq!(error_code(&body), 1004);
}

#[tokio::test]
async fn loose_mode_answers_with_bare_envelope() {
    let app = TestApp::spawn_with_mode(ResponseMode::Loose).await;
    app.create_account("acme-1", "u-1").await;

    let details = app
        .core("get_acct_details_all_m", json!({"client_acct_id": "acme-1"}))
        .await;
    assert_eq!(details, json!({"error_code": 0, "error_msg": "OK"}));
}

#[tokio::test]
async fn senior_account_appears_in_hierarchy() {
    let app = TestApp::spawn().await;
    let parent = app.create_account("parent", "u-parent").await;
    let child = app.create_account("child", "u-child").await;

    let updated = app
        .core(
            "update_acct_complete_m",
            json!({"acct_no": child, "senior_acct_no": parent}),
        )
        .await;
    assert_eq!(error_code(&updated), 0);

    let hierarchy = app
        .core("get_acct_hierarchy_details_m", json!({"acct_no": parent}))
        .await;
    let rows = hierarchy["acct_hierarchy_dtls"].as_array().unwrap();
    assert_eq!(rows[0]["acct_no"], parent);
    assert_eq!(rows[0]["child_acct_no"], json!([child]));
    assert_eq!(rows[1]["senior_acct_no"], parent);

    let missing_senior = app
        .core(
            "update_acct_complete_m",
            json!({"acct_no": child, "senior_acct_no": 42}),
        )
        .await;
    assert_eq!(error_code(&missing_senior), 1009);
}

#[tokio::test]
async fn status_update_checks_allow_list() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let ok = app
        .core("update_acct_status_m", json!({"acct_no": acct_no, "status_cd": -1}))
        .await;
    assert_eq!(error_code(&ok), 0);

    let bad = app
        .core("update_acct_status_m", json!({"acct_no": acct_no, "status_cd": 5}))
        .await;
    assert_eq!(error_code(&bad), 1009);

    let details = app
        .core("get_acct_details_all_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(details["status_cd"], -1);
}

#[tokio::test]
async fn userid_resolves_to_account_number() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let found = app
        .core("get_acct_no_from_user_id_m", json!({"user_id": "u-1"}))
        .await;
    assert_eq!(found["acct_no"], acct_no);

    let missing = app
        .core("get_acct_no_from_user_id_m", json!({"user_id": "nobody"}))
        .await;
    assert_eq!(error_code(&missing), 1009);
}

#[tokio::test]
async fn notification_template_group_round_trips() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let set = app
        .core(
            "set_acct_notify_tmplt_grp_m",
            json!({"acct_no": acct_no, "notification_template_group_id": "tmpl-9"}),
        )
        .await;
    assert_eq!(error_code(&set), 0);

    let details = app
        .core("get_acct_notification_details_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(
        details["account_notification_details"][0]["notification_template_group_id"],
        "tmpl-9"
    );

    let empty = app
        .core("set_acct_notify_tmplt_grp_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(error_code(&empty), 1004);
}

#[tokio::test]
async fn contact_update_changes_email() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let body = app
        .core(
            "update_contact_m",
            json!({"acct_no": acct_no, "email": "billing@acme.test"}),
        )
        .await;
    assert_eq!(error_code(&body), 0);

    let details = app
        .core("get_acct_details_all_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(details["email"], "billing@acme.test");
}

#[tokio::test]
async fn billing_group_for_unknown_account_is_not_created() {
    let app = TestApp::spawn().await;
    let before = app.stats().await;

    let body = app
        .core(
            "create_acct_billing_group_m",
            json!({"client_acct_id": "ghost", "client_billing_group_id": "bg-x"}),
        )
        .await;
    assert_eq!(error_code(&body), 1009);
    assert_eq!(app.stats().await.billing_groups, before.billing_groups);
}

#[tokio::test]
async fn groups_are_listed_per_account() {
    let app = TestApp::spawn().await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let billing = app
        .core(
            "create_acct_billing_group_m",
            json!({"acct_no": acct_no, "client_billing_group_id": "acme-1.bg2"}),
        )
        .await;
    assert_eq!(error_code(&billing), 0);
    let billing_group_no = billing["billing_group_no"].as_i64().unwrap();

    let dunning = app
        .core(
            "create_acct_dunning_group_m",
            json!({"acct_no": acct_no, "client_dunning_group_id": "acme-1.dg2"}),
        )
        .await;
    assert!(dunning["dunning_group_no"].as_i64().is_some());

    let billing_details = app
        .core("get_acct_billing_group_details_m", json!({"acct_no": acct_no}))
        .await;
    let groups = billing_details["billing_group_details"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert!(groups
        .iter()
        .any(|g| g["billing_group_no"] == billing_group_no));

    let dunning_details = app
        .core("get_acct_dunning_group_details_m", json!({"acct_no": acct_no}))
        .await;
    assert_eq!(
        dunning_details["dunning_group_details"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn loose_dunning_group_creation_returns_envelope_only() {
    let app = TestApp::spawn_with_mode(ResponseMode::Loose).await;
    let acct_no = app.create_account("acme-1", "u-1").await;

    let body = app
        .core(
            "create_acct_dunning_group_m",
            json!({"acct_no": acct_no, "client_dunning_group_id": "dg-1"}),
        )
        .await;
    assert_eq!(body, json!({"error_code": 0, "error_msg": "OK"}));
    assert_eq!(app.stats().await.dunning_groups, 2);
}

#[tokio::test]
async fn dunning_group_update_requires_ownership() {
    let app = TestApp::spawn().await;
    let owner = app.create_account("acme-1", "u-1").await;
    let other = app.create_account("acme-2", "u-2").await;
    app.core(
        "create_acct_dunning_group_m",
        json!({"acct_no": owner, "client_dunning_group_id": "dg-1"}),
    )
    .await;

    let body = app
        .core(
            "update_acct_dunning_group_m",
            json!({
                "acct_no": other,
                "client_dunning_group_id": "dg-1",
                "client_dunning_process_id": "proc-2"
            }),
        )
        .await;
    assert_eq!(error_code(&body), 1009);
}

#[tokio::test]
async fn batch_default_groups_never_take_ids_named_by_later_accounts() {
    let app = TestApp::spawn().await;

    let created = app
        .core(
            "create_acct_complete_m",
            json!({"acct": [
                {"client_acct_id": "a", "userid": "ua"},
                {
                    "client_acct_id": "b",
                    "userid": "ub",
                    "billing_group": [{"client_billing_group_id": "a.billing_group"}],
                    "dunning_group": [{"client_dunning_group_id": "a.dunning_group"}]
                }
            ]}),
        )
        .await;
    assert_eq!(error_code(&created), 0, "{}", created);
    let a = created["out_acct"][0]["acct_no"].as_i64().unwrap();
    let b = created["out_acct"][1]["acct_no"].as_i64().unwrap();

    for (acct_no, taken_by_b) in [(a, false), (b, true)] {
        let billing = app
            .core("get_acct_billing_group_details_m", json!({"acct_no": acct_no}))
            .await;
        let billing = billing["billing_group_details"].as_array().unwrap();
        assert_eq!(billing.len(), 1);
        assert_eq!(
            billing[0]["client_billing_group_id"] == "a.billing_group",
            taken_by_b
        );

        let dunning = app
            .core("get_acct_dunning_group_details_m", json!({"acct_no": acct_no}))
            .await;
        let dunning = dunning["dunning_group_details"].as_array().unwrap();
        assert_eq!(dunning.len(), 1);
        assert_eq!(
            dunning[0]["client_dunning_group_id"] == "a.dunning_group",
            taken_by_b
        );
    }

    let details = app
        .core("get_acct_details_all_m", json!({"acct_no": a}))
        .await;
    assert!(!details["billing_groups_info"].as_array().unwrap().is_empty());
    assert!(!details["dunning_groups_info"].as_array().unwrap().is_empty());

    let stats = app.stats().await;
    assert_eq!(stats.billing_groups, 2);
    assert_eq!(stats.dunning_groups, 2);
}
