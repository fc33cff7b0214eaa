//! Test helper module for billing-mock integration tests.
//!
//! Every `TestApp` owns a fresh in-process server on a random port, so
//! tests never share entity state.

#![allow(dead_code)]

use billing_mock::config::{MockConfig, ResponseMode};
use billing_mock::services::{init_metrics, StoreStats};
use billing_mock::startup::Application;
use reqwest::Client;
use serde_json::{json, Value};

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub client: Client,
}

impl TestApp {
    /// Spawn a strict-mode application.
    pub async fn spawn() -> Self {
        Self::spawn_with_mode(ResponseMode::Strict).await
    }

    /// Spawn a new test application on a random port.
    pub async fn spawn_with_mode(mode: ResponseMode) -> Self {
        init_metrics();

        let app = Application::build(MockConfig::for_tests(mode))
            .await
            .expect("Failed to build test application");
        let http_port = app.http_port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
            client,
        }
    }

    /// POST a JSON vendor call to `/v1/core`.
    pub async fn core(&self, rest_call: &str, fields: Value) -> Value {
        self.post_json("/v1/core", rest_call, fields).await
    }

    /// POST a JSON vendor call to `/admin`.
    pub async fn admin(&self, rest_call: &str, fields: Value) -> Value {
        self.post_json("/admin", rest_call, fields).await
    }

    async fn post_json(&self, path: &str, rest_call: &str, fields: Value) -> Value {
        let mut body = json!({
            "rest_call": rest_call,
            "client_no": 7000001,
            "auth_key": "test-auth-key",
            "output_format": "json"
        });
        if let (Some(target), Value::Object(extra)) = (body.as_object_mut(), fields) {
            target.extend(extra);
        }

        let response = self
            .client
            .post(format!("{}{}", self.http_address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    /// POST a form-encoded vendor call to `/admin`.
    pub async fn admin_form(&self, rest_call: &str, pairs: &[(&str, &str)]) -> Value {
        let mut form = vec![("rest_call", rest_call)];
        form.extend_from_slice(pairs);

        let response = self
            .client
            .post(format!("{}/admin", self.http_address))
            .form(&form)
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    /// POST raw bytes to a vendor path.
    pub async fn raw(&self, path: &str, content_type: &str, body: &'static str) -> Value {
        let response = self
            .client
            .post(format!("{}{}", self.http_address, path))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn stats(&self) -> StoreStats {
        let response = self
            .client
            .get(format!("{}/mock/stats", self.http_address))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
        let stats: Value = response.json().await.expect("Failed to parse JSON");
        serde_json::from_value(stats).expect("Unexpected stats shape")
    }

    pub async fn reset(&self) {
        let response = self
            .client
            .post(format!("{}/mock/reset", self.http_address))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
    }

    /// Create one account and return its number.
    pub async fn create_account(&self, client_acct_id: &str, userid: &str) -> i64 {
        let body = self
            .core(
                "create_acct_complete_m",
                json!({"acct": [{"client_acct_id": client_acct_id, "userid": userid}]}),
            )
            .await;
        assert_eq!(body["error_code"], 0, "create failed: {}", body);
        body["out_acct"][0]["acct_no"]
            .as_i64()
            .expect("acct_no missing")
    }

    /// Create an active master plan with one recurring service.
    pub async fn create_plan(&self, client_plan_id: &str, plan_name: &str) -> i64 {
        let body = self
            .admin(
                "create_new_plan_m",
                json!({
                    "plan_name": plan_name,
                    "client_plan_id": client_plan_id,
                    "plan_type": "Master Recurring Plan",
                    "currency": "usd",
                    "service": [{
                        "client_service_id": format!("{}.monthly", client_plan_id),
                        "name": format!("{} monthly", plan_name),
                        "service_type": "Recurring",
                        "tier": [{"schedule": [{"from": 1, "amount": 10.0}]}]
                    }]
                }),
            )
            .await;
        assert_eq!(body["error_code"], 0, "create plan failed: {}", body);
        body["plan_no"].as_i64().expect("plan_no missing")
    }
}

pub fn error_code(body: &Value) -> i64 {
    body["error_code"].as_i64().expect("error_code missing")
}
