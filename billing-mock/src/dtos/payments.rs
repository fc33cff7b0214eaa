//! Payment method, collections group and session calls.

use super::{AccountTarget, RestRequest};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Card fields as the vendor receives them. Absent when `cc_number` is empty.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CardDetails {
    #[serde(deserialize_with = "card_number")]
    #[validate(length(min = 13, max = 19))]
    pub cc_number: String,
    #[serde(alias = "cc_expire_month")]
    #[validate(range(min = 1, max = 12))]
    pub cc_expire_mm: Option<i64>,
    #[serde(alias = "cc_expire_year")]
    pub cc_expire_yyyy: Option<i64>,
    #[serde(alias = "ccv", alias = "cvv_code")]
    #[validate(range(min = 100, max = 999))]
    pub cvv: Option<i64>,
}

impl CardDetails {
    pub fn is_present(&self) -> bool {
        !self.cc_number.is_empty()
    }

    pub fn suffix(&self) -> String {
        let skip = self.cc_number.chars().count().saturating_sub(4);
        self.cc_number.chars().skip(skip).collect()
    }
}

/// Card numbers arrive as JSON numbers from some clients and strings from others.
fn card_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text.trim().to_string(),
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddPaymentMethodRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub client_billing_group_id: String,
    pub billing_group_no: Option<i64>,
    pub client_payment_method_id: String,
    pub pay_method_type: Option<i64>,
    #[serde(flatten)]
    pub card: CardDetails,
}

impl RestRequest for AddPaymentMethodRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetPaymentMethodsRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    /// 0 includes disabled methods; anything else returns active ones only.
    pub filter_status: Option<i64>,
    pub payments_returned: Option<i64>,
}

impl RestRequest for GetPaymentMethodsRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemovePaymentMethodRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    pub payment_method_no: i64,
}

impl RestRequest for RemovePaymentMethodRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignCollectionsGroupRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    #[serde(alias = "client_group_id")]
    pub client_acct_group_id: String,
}

impl RestRequest for AssignCollectionsGroupRequest {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetSessionRequest {
    #[serde(flatten)]
    pub account: AccountTarget,
    #[serde(alias = "userid")]
    pub user_id: Option<String>,
}

impl RestRequest for SetSessionRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct AddPaymentMethodBody {
    pub payment_method_no: i64,
    pub billing_group_no: i64,
    pub contact_no: i64,
    pub proc_cvv_response: String,
    pub proc_avs_response: String,
    pub proc_auth_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodsBody {
    pub account_payment_methods: Vec<AccountPaymentMethod>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountPaymentMethod {
    pub payment_method_no: i64,
    pub client_payment_method_id: String,
    pub pay_method_type: i64,
    pub cc_suffix: String,
    pub cc_expire_mm: i64,
    pub cc_expire_yyyy: i64,
    pub billing_group_no: i64,
    pub status: i64,
    pub from_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionBody {
    pub session_id: String,
}
