//! Service credit model.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Credit {
    pub credit_no: i64,
    pub acct_no: i64,
    pub amount: f64,
    pub applied_amount: f64,
    pub reason_code: i64,
    pub comments: String,
    pub expiry_date: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Credit {
    pub fn unapplied(&self) -> f64 {
        (self.amount - self.applied_amount).max(0.0)
    }
}
