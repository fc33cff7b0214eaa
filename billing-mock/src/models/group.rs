//! Billing and dunning groups: per-account payment and delinquency grouping.

#[derive(Debug, Clone)]
pub struct BillingGroup {
    pub billing_group_no: i64,
    pub client_billing_group_id: String,
    pub acct_no: i64,
    pub name: String,
    pub description: Option<String>,
    pub notify_method: i64,
    pub primary_payment_method_no: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct DunningGroup {
    pub dunning_group_no: i64,
    pub client_dunning_group_id: String,
    pub acct_no: i64,
    pub name: String,
    pub client_dunning_process_id: String,
}
