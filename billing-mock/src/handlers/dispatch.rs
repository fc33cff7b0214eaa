//! Vendor call dispatch.
//!
//! `POST /v1/core` and `POST /admin` share one table keyed by the body's
//! `rest_call`. Every answer, success or failure, is HTTP 200 with the
//! vendor envelope in the body.

use super::{accounts, catalog, credits, groups, payments, plans};
use crate::dtos::{Payload, Reply, RestRequest};
use crate::error::{fallback_body, MockError};
use crate::services::{
    record_error, record_rest_call, record_rest_call_duration, Synthesizer, Tables,
};
use crate::startup::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Instant;
use tracing::{error, warn};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Metric label for bodies whose `rest_call` is missing or not served.
const UNKNOWN_CALL: &str = "unknown";

#[tracing::instrument(skip(state, headers, body), fields(rest_call))]
pub async fn vendor_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    let (label, result) = match decode(content_type, &body) {
        Ok((rest_call, payload)) => {
            tracing::Span::current().record("rest_call", rest_call.as_str());
            let mut tables = state.store.lock().await;
            match route(&rest_call, payload, &mut tables, &state.synth) {
                Some(result) => (rest_call, result),
                None => (
                    UNKNOWN_CALL.to_string(),
                    Err(MockError::decode(format!("unknown rest_call {}", rest_call))),
                ),
            }
        }
        Err(e) => (UNKNOWN_CALL.to_string(), Err(e)),
    };

    let bytes = match result {
        Ok(bytes) => {
            record_rest_call(&label, "ok");
            bytes
        }
        Err(err) => {
            warn!(
                rest_call = %label,
                error_code = err.code(),
                error_msg = %err,
                "Vendor call rejected"
            );
            record_rest_call(&label, "error");
            record_error(&label, err.code());
            encode(&err.envelope())
        }
    };
    record_rest_call_duration(&label, started.elapsed().as_secs_f64());

    ([(CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response()
}

fn decode(content_type: Option<&str>, body: &[u8]) -> Result<(String, Payload), MockError> {
    let payload = Payload::decode(content_type, body)?;
    let rest_call = payload.rest_call()?;
    Ok((rest_call, payload))
}

/// Run the named operation. `None` when no operation has that name.
pub fn route(
    rest_call: &str,
    payload: Payload,
    tables: &mut Tables,
    synth: &Synthesizer,
) -> Option<Result<Vec<u8>, MockError>> {
    let result = match rest_call {
        // Accounts
        "create_acct_complete_m" => run(payload, tables, synth, accounts::create_acct_complete),
        "get_acct_details_all_m" => run(payload, tables, synth, accounts::get_acct_details_all),
        "update_acct_complete_m" => run(payload, tables, synth, accounts::update_acct_complete),
        "update_acct_status_m" => run(payload, tables, synth, accounts::update_acct_status),
        "get_acct_no_from_user_id_m" => {
            run(payload, tables, synth, accounts::get_acct_no_from_user_id)
        }
        "get_acct_hierarchy_details_m" => {
            run(payload, tables, synth, accounts::get_acct_hierarchy_details)
        }
        "set_acct_notify_tmplt_grp_m" => {
            run(payload, tables, synth, accounts::set_acct_notify_tmplt_grp)
        }
        "get_acct_notification_details_m" => {
            run(payload, tables, synth, accounts::get_acct_notification_details)
        }
        "update_contact_m" => run(payload, tables, synth, accounts::update_contact),

        // Billing and dunning groups
        "create_acct_billing_group_m" => {
            run(payload, tables, synth, groups::create_acct_billing_group)
        }
        "create_acct_dunning_group_m" => {
            run(payload, tables, synth, groups::create_acct_dunning_group)
        }
        "get_acct_billing_group_details_m" => {
            run(payload, tables, synth, groups::get_acct_billing_group_details)
        }
        "get_acct_dunning_group_details_m" => {
            run(payload, tables, synth, groups::get_acct_dunning_group_details)
        }
        "update_acct_billing_group_m" => {
            run(payload, tables, synth, groups::update_acct_billing_group)
        }
        "update_acct_dunning_group_m" => {
            run(payload, tables, synth, groups::update_acct_dunning_group)
        }

        // Plans
        "create_new_plan_m" => run(payload, tables, synth, plans::create_new_plan),
        "edit_plan_m" => run(payload, tables, synth, plans::edit_plan),
        "delete_plans_m" => run(payload, tables, synth, plans::delete_plans),
        "get_plan_details_m" => run(payload, tables, synth, plans::get_plan_details),
        "get_client_plans_all_m" => run(payload, tables, synth, plans::get_client_plans_all),
        "get_client_plan_service_rates_m" => {
            run(payload, tables, synth, plans::get_client_plan_service_rates)
        }
        "assign_acct_plan_m" => run(payload, tables, synth, plans::assign_acct_plan),
        "get_acct_plans_all_m" => run(payload, tables, synth, plans::get_acct_plans_all),
        "get_acct_plans_m" => run(payload, tables, synth, plans::get_acct_plans),

        // Services and usage types
        "create_service_m" => run(payload, tables, synth, catalog::create_service),
        "get_service_details_m" => run(payload, tables, synth, catalog::get_service_details),
        "create_usage_type_m" | "update_usage_type_m" => {
            run(payload, tables, synth, catalog::upsert_usage_type)
        }
        "get_usage_type_details_m" => {
            run(payload, tables, synth, catalog::get_usage_type_details)
        }

        // Credits
        "create_advanced_service_credit_m" => {
            run(payload, tables, synth, credits::create_advanced_service_credit)
        }
        "get_acct_credits_m" => run(payload, tables, synth, credits::get_acct_credits),
        "get_credit_details_m" => run(payload, tables, synth, credits::get_credit_details),
        "get_unapplied_service_credits_m" => {
            run(payload, tables, synth, credits::get_unapplied_service_credits)
        }

        // Payments and sessions
        "assign_collections_acct_group_m" => {
            run(payload, tables, synth, payments::assign_collections_acct_group)
        }
        "add_acct_payment_method_m" => {
            run(payload, tables, synth, payments::add_acct_payment_method)
        }
        "get_acct_payment_methods_and_terms_m" => {
            run(payload, tables, synth, payments::get_acct_payment_methods_and_terms)
        }
        "remove_acct_payment_method_m" => {
            run(payload, tables, synth, payments::remove_acct_payment_method)
        }
        "set_session_m" => run(payload, tables, synth, payments::set_session),

        _ => return None,
    };
    Some(result)
}

/// Bind the payload, run the operation, encode its reply.
fn run<Req, Body, F>(
    payload: Payload,
    tables: &mut Tables,
    synth: &Synthesizer,
    op: F,
) -> Result<Vec<u8>, MockError>
where
    Req: RestRequest,
    Body: Serialize,
    F: FnOnce(&mut Tables, &Synthesizer, Req) -> Result<Reply<Body>, MockError>,
{
    let request = payload.into_request::<Req>()?;
    let reply = op(tables, synth, request)?;
    Ok(encode(&reply))
}

fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_else(|e| {
        error!(error = %e, "Failed to encode vendor response");
        fallback_body(&e)
    })
}
