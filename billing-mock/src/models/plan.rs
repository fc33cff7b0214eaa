//! Plan model and plan-to-account assignments.

use chrono::{DateTime, Utc};

/// Plan types the vendor accepts.
pub const PLAN_TYPES: &[&str] = &[
    "Master Recurring Plan",
    "Master Non-Recurring Plan",
    "Master Usage-Based Plan",
    "Supplemental Recurring Plan",
    "Supplemental Non-Recurring Plan",
    "Supplemental Usage-Based Plan",
];

const CURRENCIES: &[&str] = &["usd", "eur", "gbp", "cad", "aud", "jpy", "inr", "cny"];

pub fn is_known_currency(code: &str) -> bool {
    CURRENCIES.contains(&code.to_lowercase().as_str())
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub plan_no: i64,
    pub client_plan_id: String,
    pub plan_name: String,
    pub plan_type: String,
    pub currency: String,
    pub description: Option<String>,
    pub active: bool,
    pub services: Vec<PlanService>,
    pub supplemental_fields: Vec<(String, Vec<String>)>,
    pub created_utc: DateTime<Utc>,
}

/// A service offered by a plan, with its rate tiers.
#[derive(Debug, Clone)]
pub struct PlanService {
    pub service_no: i64,
    pub client_service_id: String,
    pub rate_type: Option<String>,
    pub tiers: Vec<RateTier>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTier {
    pub from: i64,
    pub to: Option<i64>,
    pub amount: f64,
}

/// A plan instance assigned to an account.
#[derive(Debug, Clone)]
pub struct PlanAssignment {
    pub plan_instance_no: i64,
    pub client_plan_instance_id: String,
    pub acct_no: i64,
    pub plan_no: i64,
    pub client_plan_id: String,
    pub status_cd: i64,
    pub units: i64,
    pub billing_group_no: Option<i64>,
    pub dunning_group_no: Option<i64>,
    pub assigned_utc: DateTime<Utc>,
}
