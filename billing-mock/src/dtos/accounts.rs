//! Account, hierarchy, notification and billing/dunning group calls.

use super::payments::CardDetails;
use super::{AccountTarget, RestRequest};
use crate::models::SuppField;
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAcctCompleteRequest {
    pub acct: Vec<AcctSpec>,
}

impl RestRequest for CreateAcctCompleteRequest {}

/// One account to create, with its groups and master plans.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AcctSpec {
    pub client_acct_id: String,
    pub userid: String,
    #[serde(alias = "currency_cd")]
    pub acct_currency: String,
    pub notify_method: i64,
    pub status_cd: Option<i64>,
    pub senior_acct_no: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub master_plans_detail: Vec<MasterPlanDetail>,
    pub billing_group: Vec<BillingGroupSpec>,
    pub dunning_group: Vec<DunningGroupSpec>,
    pub supp_field: Vec<SuppField>,
    pub functional_acct_group: Vec<FunctionalAcctGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MasterPlanDetail {
    pub client_plan_id: String,
    pub client_plan_instance_id: String,
    pub plan_instance_units: Option<i64>,
    pub plan_instance_status: Option<i64>,
    /// 1-based position in the request's `billing_group` list.
    pub billing_group_idx: Option<i64>,
    /// 1-based position in the request's `dunning_group` list.
    pub dunning_group_idx: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BillingGroupSpec {
    pub client_billing_group_id: String,
    #[serde(alias = "name")]
    pub billing_group_name: String,
    #[serde(alias = "description")]
    pub billing_group_description: Option<String>,
    pub notify_method: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DunningGroupSpec {
    pub client_dunning_group_id: String,
    #[serde(alias = "name")]
    pub dunning_group_name: String,
    pub client_dunning_process_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FunctionalAcctGroup {
    pub client_functional_acct_group_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetAcctDetailsAllRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
}

impl RestRequest for GetAcctDetailsAllRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAcctCompleteRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub senior_acct_no: Option<i64>,
    pub email: Option<String>,
    pub status_cd: Option<i64>,
}

impl RestRequest for UpdateAcctCompleteRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAcctStatusRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub status_cd: Option<i64>,
}

impl RestRequest for UpdateAcctStatusRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetAcctNoFromUserIdRequest {
    #[serde(alias = "userid")]
    pub user_id: String,
}

impl RestRequest for GetAcctNoFromUserIdRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetAcctHierarchyDetailsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub hierarchy_filter: Option<i64>,
}

impl RestRequest for GetAcctHierarchyDetailsRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetAcctNotifyTmpltGrpRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    #[serde(alias = "notify_tmplt_grp_id")]
    pub notification_template_group_id: String,
}

impl RestRequest for SetAcctNotifyTmpltGrpRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetAcctNotificationDetailsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
}

impl RestRequest for GetAcctNotificationDetailsRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateContactRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_ind: Option<i64>,
}

impl RestRequest for UpdateContactRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBillingGroupRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_billing_group_id: String,
    #[serde(alias = "name")]
    pub billing_group_name: String,
    #[serde(alias = "description")]
    pub billing_group_description: Option<String>,
    pub notify_method: i64,
}

impl RestRequest for CreateBillingGroupRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateDunningGroupRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_dunning_group_id: String,
    #[serde(alias = "name")]
    pub dunning_group_name: String,
    pub client_dunning_process_id: String,
}

impl RestRequest for CreateDunningGroupRequest {}

/// Shared by the billing and dunning group detail lookups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupDetailsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
}

impl RestRequest for GroupDetailsRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBillingGroupRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_billing_group_id: String,
    pub billing_group_no: Option<i64>,
    pub primary_payment_method_no: Option<i64>,
    pub client_primary_payment_method_id: Option<String>,
    pub client_payment_method_id: Option<String>,
    pub pay_method_type: Option<i64>,
    #[serde(flatten)]
    pub card: CardDetails,
}

impl RestRequest for UpdateBillingGroupRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateDunningGroupRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_dunning_group_id: String,
    pub client_dunning_process_id: Option<String>,
}

impl RestRequest for UpdateDunningGroupRequest {}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateAcctBody {
    pub out_acct: Vec<OutAcct>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutAcct {
    pub acct_no: i64,
    pub userid: String,
    pub client_acct_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acct_billing_groups: Option<Vec<BillingGroupRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acct_dunning_groups: Option<Vec<DunningGroupRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_plans_assigned: Option<Vec<MasterPlanAssigned>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acct_locale_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingGroupRef {
    pub billing_group_no: i64,
    pub client_billing_group_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DunningGroupRef {
    pub dunning_group_no: i64,
    pub client_dunning_group_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterPlanAssigned {
    pub plan_instance_no: i64,
    pub client_plan_instance_id: String,
    pub plan_no: i64,
    pub client_plan_id: String,
}

/// Full account fixture returned by `get_acct_details_all_m` in strict mode.
#[derive(Debug, Clone, Serialize)]
pub struct AccountDetails {
    pub acct_no: i64,
    pub client_acct_id: String,
    pub userid: String,
    pub acct_currency: String,
    pub status_cd: i64,
    pub notify_method: i64,
    pub senior_acct_no: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address1: String,
    pub city: String,
    pub country: String,
    pub postal_cd: String,
    pub phone: String,
    pub notify_tmplt_grp_id: Option<String>,
    pub acct_create_date: String,
    pub billing_groups_info: Vec<BillingGroupInfo>,
    pub master_plans_info: Vec<MasterPlanInfo>,
    pub dunning_groups_info: Vec<DunningGroupInfo>,
    pub supp_field: Vec<SuppField>,
    pub functional_acct_groups: Vec<String>,
    pub chief_acct_info: Vec<ChiefAcctInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingGroupInfo {
    pub billing_group_no: i64,
    pub client_billing_group_id: String,
    pub billing_group_name: String,
    pub billing_group_description: String,
    pub notify_method: i64,
    pub primary_payment_method_no: Option<i64>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DunningGroupInfo {
    pub dunning_group_no: i64,
    pub client_dunning_group_id: String,
    pub dunning_group_name: String,
    pub client_dunning_process_id: String,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterPlanInfo {
    pub plan_instance_no: i64,
    pub client_plan_instance_id: String,
    pub plan_no: i64,
    pub client_plan_id: String,
    pub plan_name: String,
    pub plan_instance_status_cd: i64,
    pub plan_units: i64,
    pub billing_group_no: Option<i64>,
    pub dunning_group_no: Option<i64>,
    pub plan_date: String,
}

/// Top of the senior-account chain the account belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ChiefAcctInfo {
    pub chief_acct_no: i64,
    pub chief_client_acct_id: String,
    pub chief_acct_userid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcctNoBody {
    pub acct_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HierarchyBody {
    pub acct_hierarchy_dtls: Vec<AcctHierarchyDtl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcctHierarchyDtl {
    pub acct_no: i64,
    pub client_acct_id: String,
    pub userid: String,
    pub senior_acct_no: i64,
    pub child_acct_no: Vec<i64>,
    pub master_plans_info: Vec<MasterPlanInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationBody {
    pub account_notification_details: Vec<AccountNotificationDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountNotificationDetail {
    pub notification_template_group_id: String,
    pub notify_method: i64,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingGroupNoBody {
    pub billing_group_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DunningGroupNoBody {
    pub dunning_group_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingGroupDetailsBody {
    pub billing_group_details: Vec<BillingGroupInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DunningGroupDetailsBody {
    pub dunning_group_details: Vec<DunningGroupInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBillingGroupBody {
    pub billing_group_no: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_no: Option<i64>,
}
