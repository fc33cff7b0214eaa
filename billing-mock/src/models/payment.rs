//! Payment methods and payment-form sessions.

use chrono::{DateTime, Utc};

/// A card on file. Numbered 1, 2, ... per account in creation order.
#[derive(Debug, Clone)]
pub struct PaymentMethod {
    pub acct_no: i64,
    pub payment_method_no: i64,
    pub client_payment_method_id: String,
    pub billing_group_no: i64,
    pub pay_method_type: i64,
    pub cc_suffix: String,
    pub cc_expire_mm: i64,
    pub cc_expire_yyyy: i64,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub acct_no: i64,
    pub created_utc: DateTime<Utc>,
}
