//! Service credit calls.

use super::{AccountTarget, RestRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateCreditRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    #[serde(alias = "credit_amount")]
    pub amount: f64,
    pub reason_code: Option<i64>,
    pub comments: Option<String>,
    pub credit_expiry_date: Option<String>,
}

impl RestRequest for CreateCreditRequest {}

/// Shared by the credit listing calls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AcctCreditsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
}

impl RestRequest for AcctCreditsRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetCreditDetailsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub credit_no: i64,
}

impl RestRequest for GetCreditDetailsRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct CreditIdBody {
    pub credit_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllCreditsBody {
    pub all_credits: Vec<AllCredit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllCredit {
    pub out_acct_no: i64,
    pub credit_no: i64,
    pub credit_type: String,
    pub amount: f64,
    pub applied_amount: f64,
    pub unapplied_amount: f64,
    pub reason_cd: i64,
    pub reason_text: String,
    pub comments: String,
    pub create_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditDetailsBody {
    pub credit_no: i64,
    pub acct_no: i64,
    pub amount: f64,
    pub applied_amount: f64,
    pub unapplied_amount: f64,
    pub reason_code: i64,
    pub comments: String,
    pub expiry_date: Option<String>,
    pub create_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnappliedCreditsBody {
    pub unapplied_service_credits_details: Vec<UnappliedCredit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnappliedCredit {
    pub credit_id: i64,
    pub initial_amount: f64,
    pub amount_left_to_apply: f64,
    pub reason_cd: i64,
    pub comments: String,
    pub create_date: String,
    pub expiry_date: Option<String>,
}
