//! Plan catalogue and plan assignment calls.

use super::{AccountTarget, FormFields, RestRequest};
use crate::error::MockError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// Body of `create_new_plan_m` and `edit_plan_m`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    pub plan_no: Option<i64>,
    pub plan_name: String,
    pub plan_type: String,
    pub client_plan_id: String,
    #[serde(alias = "currency_cd")]
    pub currency: String,
    #[serde(alias = "plan_desc")]
    pub plan_description: Option<String>,
    pub active: Option<i64>,
    pub edit_directives: Option<i64>,
    pub service: Vec<ServiceSpec>,
    pub schedule: Vec<ScheduleSpec>,
    pub supplemental_obj_field: Vec<SupplementalObjField>,
}

impl RestRequest for PlanRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            plan_no: fields.int("plan_no")?,
            plan_name: fields.string("plan_name"),
            plan_type: fields.string("plan_type"),
            client_plan_id: fields.string("client_plan_id"),
            currency: fields
                .str("currency")
                .or_else(|| fields.str("currency_cd"))
                .unwrap_or_default()
                .to_string(),
            plan_description: fields
                .str("plan_description")
                .or_else(|| fields.str("plan_desc"))
                .map(str::to_string),
            active: fields.int("active")?,
            edit_directives: fields.int("edit_directives")?,
            service: fields
                .indices("service")
                .into_iter()
                .map(|i| ServiceSpec::from_fields(&fields.nested("service", i)))
                .collect::<Result<_, _>>()?,
            schedule: fields
                .indices("schedule")
                .into_iter()
                .map(|i| ScheduleSpec::from_fields(&fields.nested("schedule", i)))
                .collect::<Result<_, _>>()?,
            supplemental_obj_field: fields
                .indices("supplemental_obj_field")
                .into_iter()
                .map(|i| {
                    SupplementalObjField::from_fields(&fields.nested("supplemental_obj_field", i))
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSpec {
    pub client_service_id: String,
    #[serde(alias = "service_name")]
    pub name: String,
    pub service_type: String,
    pub gl_cd: String,
    pub usage_type: Option<i64>,
    pub rate_type: Option<String>,
    pub pricing_rule: Option<String>,
    pub taxable_ind: Option<i64>,
    pub tier: Vec<TierSpec>,
}

impl ServiceSpec {
    fn from_fields(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            client_service_id: fields.string("client_service_id"),
            name: fields
                .str("name")
                .or_else(|| fields.str("service_name"))
                .unwrap_or_default()
                .to_string(),
            service_type: fields.string("service_type"),
            gl_cd: fields.string("gl_cd"),
            usage_type: fields.int("usage_type")?,
            rate_type: fields.str("rate_type").map(str::to_string),
            pricing_rule: fields.str("pricing_rule").map(str::to_string),
            taxable_ind: fields.int("taxable_ind")?,
            tier: fields
                .indices("tier")
                .into_iter()
                .map(|i| TierSpec::from_fields(&fields.nested("tier", i)))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TierSpec {
    pub schedule: Vec<TierSchedule>,
}

impl TierSpec {
    fn from_fields(fields: &FormFields) -> Result<Self, MockError> {
        let schedule = fields
            .indices("schedule")
            .into_iter()
            .map(|i| {
                let entry = fields.nested("schedule", i);
                Ok(TierSchedule {
                    from: entry.int("from")?.unwrap_or(1),
                    to: entry.int("to")?,
                    amount: entry.float("amount")?.unwrap_or_default(),
                })
            })
            .collect::<Result<_, MockError>>()?;
        Ok(Self { schedule })
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct TierSchedule {
    pub from: i64,
    pub to: Option<i64>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleSpec {
    pub schedule_name: String,
    pub client_rate_schedule_id: Option<String>,
    pub currency_cd: String,
    pub is_default: Option<i64>,
}

impl ScheduleSpec {
    fn from_fields(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            schedule_name: fields.string("schedule_name"),
            client_rate_schedule_id: fields.str("client_rate_schedule_id").map(str::to_string),
            currency_cd: fields.string("currency_cd"),
            is_default: fields.int("is_default")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SupplementalObjField {
    pub field_name: String,
    pub field_value: Vec<String>,
}

impl SupplementalObjField {
    fn from_fields(fields: &FormFields) -> Self {
        Self {
            field_name: fields.string("field_name"),
            field_value: fields.str_list("field_value"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeletePlansRequest {
    pub plan_nos: Vec<i64>,
}

impl RestRequest for DeletePlansRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            plan_nos: fields.int_list("plan_nos")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetPlanDetailsRequest {
    pub client_plan_id: String,
    pub plan_no: Option<i64>,
}

impl RestRequest for GetPlanDetailsRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            client_plan_id: fields.string("client_plan_id"),
            plan_no: fields.int("plan_no")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetClientPlansAllRequest {
    pub client_plan_id: Option<String>,
    pub promo_code: Option<String>,
}

impl RestRequest for GetClientPlansAllRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            client_plan_id: fields.str("client_plan_id").map(str::to_string),
            promo_code: fields.str("promo_code").map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetClientPlanServiceRatesRequest {
    pub client_plan_id: String,
    pub client_service_id: String,
}

impl RestRequest for GetClientPlanServiceRatesRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignAcctPlanRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub new_client_plan_id: String,
    pub client_plan_instance_id: String,
    pub plan_units: Option<i64>,
    pub existing_client_billing_group_id: Option<String>,
    pub existing_client_def_dunning_group_id: Option<String>,
    pub plan_status_cd: Option<i64>,
}

impl RestRequest for AssignAcctPlanRequest {}

/// Body of `get_acct_plans_all_m` and `get_acct_plans_m`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetAcctPlansRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_plan_id: Option<String>,
    pub product_catalog_plan_filter: Vec<PlanFilter>,
}

impl GetAcctPlansRequest {
    /// Client plan ids to keep; empty keeps everything.
    pub fn plan_filter(&self) -> Vec<&str> {
        self.client_plan_id
            .iter()
            .map(String::as_str)
            .chain(
                self.product_catalog_plan_filter
                    .iter()
                    .map(|f| f.client_plan_id.as_str()),
            )
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl RestRequest for GetAcctPlansRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlanFilter {
    pub client_plan_id: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PlanNoBody {
    pub plan_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePlansBody {
    pub plan_nos: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDetailsBody {
    pub plan_no: i64,
    pub client_plan_id: String,
    pub plan_name: String,
    pub plan_type: String,
    pub currency_cd: String,
    pub active_ind: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_services: Option<Vec<PlanServiceDtl>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplemental_obj_field: Option<Vec<SupplementalObjField>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientPlansAllBody {
    pub all_client_plan_dtls: Vec<ClientPlanDtl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientPlanDtl {
    pub plan_no: i64,
    pub client_plan_id: String,
    pub plan_name: String,
    pub plan_desc: String,
    pub plan_type: String,
    pub currency_cd: String,
    pub active_ind: i64,
    pub plan_services: Vec<PlanServiceDtl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanServiceDtl {
    pub service_no: i64,
    pub client_service_id: String,
    pub service_desc: String,
    pub service_type: String,
    pub plan_service_rates: Vec<PlanServiceRate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanServiceRate {
    pub rate_seq_no: i64,
    pub from_unit: i64,
    pub to_unit: Option<i64>,
    pub rate_per_unit: f64,
    pub client_rate_schedule_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRatesBody {
    pub plan_service_rates: Vec<PlanServiceRate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanInstanceBody {
    pub plan_instance_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcctPlansAllBody {
    pub all_acct_plans_m: Vec<AcctPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcctPlansBody {
    pub acct_plans_m: Vec<AcctPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcctPlan {
    pub plan_instance_no: i64,
    pub client_plan_instance_id: String,
    pub plan_no: i64,
    pub client_plan_id: String,
    pub plan_name: String,
    pub plan_instance_status_cd: i64,
    pub plan_units: i64,
    pub plan_date: String,
}
