//! Account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status codes the vendor accepts on `status_cd`.
pub const ACCOUNT_STATUS_CODES: &[i64] = &[1, 0, -1, -2, -3, -99, 2];

/// A vendor account, keyed by the caller's client account id.
#[derive(Debug, Clone)]
pub struct Account {
    pub acct_no: i64,
    pub client_acct_id: String,
    pub userid: String,
    pub currency: String,
    pub status_cd: i64,
    pub notify_method: i64,
    pub senior_acct_no: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub notify_tmplt_grp_id: Option<String>,
    pub collections_group_id: Option<String>,
    pub supp_fields: Vec<SuppField>,
    pub functional_acct_groups: Vec<String>,
    pub created_utc: DateTime<Utc>,
}

/// Free-form supplemental field attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppField {
    #[serde(default)]
    pub supp_field_name: String,
    #[serde(default)]
    pub supp_field_value: String,
}

/// How a request points at an account: generated number or client id.
///
/// A zero account number counts as absent, matching clients that send
/// zero-valued defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountRef<'a> {
    pub acct_no: Option<i64>,
    pub client_acct_id: Option<&'a str>,
}

impl<'a> AccountRef<'a> {
    pub fn new(acct_no: Option<i64>, client_acct_id: Option<&'a str>) -> Self {
        Self {
            acct_no: acct_no.filter(|n| *n != 0),
            client_acct_id: client_acct_id.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.acct_no.is_none() && self.client_acct_id.is_none()
    }
}

impl std::fmt::Display for AccountRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.acct_no, self.client_acct_id) {
            (Some(no), _) => write!(f, "acct_no {}", no),
            (None, Some(id)) => write!(f, "client_acct_id {}", id),
            (None, None) => f.write_str("account (no identifier supplied)"),
        }
    }
}
