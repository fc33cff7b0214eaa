//! Per-operation rule checks.
//!
//! Every function here only reads the store. Checks run in a fixed order and
//! stop at the first failure; on success they hand back whatever they
//! resolved so the operation does not look it up twice.

use crate::dtos::accounts::{
    AcctSpec, CreateAcctCompleteRequest, UpdateAcctCompleteRequest, UpdateBillingGroupRequest,
};
use crate::dtos::catalog::CreateServiceRequest;
use crate::dtos::payments::{AddPaymentMethodRequest, CardDetails, SetSessionRequest};
use crate::dtos::plans::{AssignAcctPlanRequest, PlanRequest, ServiceSpec};
use crate::dtos::AccountTarget;
use crate::error::MockError;
use crate::models::{
    is_known_currency, Account, BillingGroup, DunningGroup, Plan, ACCOUNT_STATUS_CODES,
    PLAN_TYPES, SERVICE_TYPES,
};
use crate::services::store::Tables;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use validator::Validate;

/// `edit_directives` value the vendor requires on `edit_plan_m`.
pub const EDIT_DIRECTIVE_REPLACE: i64 = 2;

const CARD_NUMBER_DIGITS: std::ops::RangeInclusive<usize> = 13..=19;

// ============================================================================
// Accounts
// ============================================================================

/// Resolve the account a call is scoped to.
pub fn account<'t>(tables: &'t Tables, target: &AccountTarget) -> Result<&'t Account, MockError> {
    let account_ref = target.account_ref();
    tables
        .account(account_ref)
        .ok_or_else(|| MockError::missing(format!("{} does not exist", account_ref)))
}

/// `get_acct_details_all_m` reports an unknown account as an invalid value.
pub fn account_for_details<'t>(
    tables: &'t Tables,
    target: &AccountTarget,
) -> Result<&'t Account, MockError> {
    let account_ref = target.account_ref();
    tables
        .account(account_ref)
        .ok_or_else(|| MockError::invalid(format!("{} not found", account_ref)))
}

pub fn create_accounts(tables: &Tables, req: &CreateAcctCompleteRequest) -> Result<(), MockError> {
    if req.acct.is_empty() {
        return Err(MockError::invalid("acct is required"));
    }

    let mut client_ids = HashSet::new();
    let mut userids = HashSet::new();
    let mut billing_group_ids = HashSet::new();
    let mut dunning_group_ids = HashSet::new();

    for spec in &req.acct {
        if spec.client_acct_id.is_empty() {
            return Err(MockError::invalid("client_acct_id is required"));
        }
        if spec.userid.is_empty() {
            return Err(MockError::invalid("userid is required"));
        }
        if tables.contains_client_acct_id(&spec.client_acct_id)
            || !client_ids.insert(spec.client_acct_id.as_str())
        {
            return Err(MockError::in_use("client_acct_id", &spec.client_acct_id));
        }
        if tables.contains_userid(&spec.userid) || !userids.insert(spec.userid.as_str()) {
            return Err(MockError::in_use("userid", &spec.userid));
        }
        if !spec.acct_currency.is_empty() && !is_known_currency(&spec.acct_currency) {
            return Err(MockError::missing(format!(
                "invalid currency {}",
                spec.acct_currency
            )));
        }
        if let Some(status_cd) = spec.status_cd {
            status_code(status_cd)?;
        }
        if let Some(senior) = spec.senior_acct_no.filter(|n| *n != 0) {
            if !tables.contains_acct_no(senior) {
                return Err(MockError::missing(format!(
                    "senior acct_no {} does not exist",
                    senior
                )));
            }
        }

        for group in &spec.billing_group {
            let id = group.client_billing_group_id.as_str();
            if id.is_empty() {
                return Err(MockError::invalid("client_billing_group_id is required"));
            }
            if tables.billing_group(id).is_some() || !billing_group_ids.insert(id) {
                return Err(MockError::in_use("client_billing_group_id", id));
            }
        }
        for group in &spec.dunning_group {
            let id = group.client_dunning_group_id.as_str();
            if id.is_empty() {
                return Err(MockError::invalid("client_dunning_group_id is required"));
            }
            if tables.dunning_group(id).is_some() || !dunning_group_ids.insert(id) {
                return Err(MockError::in_use("client_dunning_group_id", id));
            }
        }

        master_plans(tables, spec)?;
    }
    Ok(())
}

fn master_plans(tables: &Tables, spec: &AcctSpec) -> Result<(), MockError> {
    let mut instance_ids = HashSet::new();
    for detail in &spec.master_plans_detail {
        if tables.active_plan(&detail.client_plan_id).is_none() {
            return Err(MockError::missing(format!(
                "client_plan_id {} does not exist",
                detail.client_plan_id
            )));
        }
        if !detail.client_plan_instance_id.is_empty()
            && !instance_ids.insert(detail.client_plan_instance_id.as_str())
        {
            return Err(MockError::in_use(
                "client_plan_instance_id",
                &detail.client_plan_instance_id,
            ));
        }
        group_index(detail.billing_group_idx, spec.billing_group.len(), "billing_group_idx")?;
        group_index(detail.dunning_group_idx, spec.dunning_group.len(), "dunning_group_idx")?;
    }
    Ok(())
}

/// A 1-based group index must point into the request's group list. An
/// index of 1 is also accepted when the list is empty, since the account
/// receives a default group.
fn group_index(idx: Option<i64>, len: usize, field: &str) -> Result<(), MockError> {
    match idx {
        None => Ok(()),
        Some(i) if i >= 1 && (i as usize <= len || (len == 0 && i == 1)) => Ok(()),
        Some(i) => Err(MockError::invalid(format!("invalid {} {}", field, i))),
    }
}

pub fn status_code(status_cd: i64) -> Result<(), MockError> {
    if ACCOUNT_STATUS_CODES.contains(&status_cd) {
        Ok(())
    } else {
        Err(MockError::missing(format!("invalid status_cd {}", status_cd)))
    }
}

/// Resolves the account and, when given, its new senior account number.
pub fn update_account<'t>(
    tables: &'t Tables,
    req: &UpdateAcctCompleteRequest,
) -> Result<(&'t Account, Option<i64>), MockError> {
    let account = account(tables, &req.account)?;
    let senior = match req.senior_acct_no.filter(|n| *n != 0) {
        None => None,
        Some(senior) if senior == account.acct_no => {
            return Err(MockError::invalid("account cannot be its own senior account"));
        }
        Some(senior) => {
            let parent = tables.account_by_no(senior).ok_or_else(|| {
                MockError::missing(format!("senior acct_no {} does not exist", senior))
            })?;
            Some(parent.acct_no)
        }
    };
    if let Some(status_cd) = req.status_cd {
        status_code(status_cd)?;
    }
    Ok((account, senior))
}

pub fn account_by_userid<'t>(tables: &'t Tables, user_id: &str) -> Result<&'t Account, MockError> {
    tables
        .account_by_userid(user_id)
        .ok_or_else(|| MockError::missing(format!("user_id {} does not exist", user_id)))
}

// ============================================================================
// Billing and dunning groups
// ============================================================================

pub fn new_billing_group_id(tables: &Tables, client_billing_group_id: &str) -> Result<(), MockError> {
    if client_billing_group_id.is_empty() {
        return Err(MockError::invalid("client_billing_group_id is required"));
    }
    if tables.billing_group(client_billing_group_id).is_some() {
        return Err(MockError::in_use(
            "client_billing_group_id",
            client_billing_group_id,
        ));
    }
    Ok(())
}

pub fn new_dunning_group_id(tables: &Tables, client_dunning_group_id: &str) -> Result<(), MockError> {
    if client_dunning_group_id.is_empty() {
        return Err(MockError::invalid("client_dunning_group_id is required"));
    }
    if tables.dunning_group(client_dunning_group_id).is_some() {
        return Err(MockError::in_use(
            "client_dunning_group_id",
            client_dunning_group_id,
        ));
    }
    Ok(())
}

/// Find a billing group of `acct_no` by client id, falling back to number.
pub fn billing_group_of<'t>(
    tables: &'t Tables,
    acct_no: i64,
    client_billing_group_id: &str,
    billing_group_no: Option<i64>,
) -> Result<&'t BillingGroup, MockError> {
    let found = Some(client_billing_group_id)
        .filter(|id| !id.is_empty())
        .and_then(|id| tables.billing_group(id))
        .or_else(|| billing_group_no.and_then(|no| tables.billing_group_by_no(no)))
        .filter(|g| g.acct_no == acct_no);

    found.ok_or_else(|| {
        let label = match billing_group_no {
            Some(no) if client_billing_group_id.is_empty() => format!("billing_group_no {}", no),
            _ => format!("client_billing_group_id {}", client_billing_group_id),
        };
        MockError::missing(format!("{} does not exist for acct_no {}", label, acct_no))
    })
}

pub fn dunning_group_of<'t>(
    tables: &'t Tables,
    acct_no: i64,
    client_dunning_group_id: &str,
) -> Result<&'t DunningGroup, MockError> {
    tables
        .dunning_group(client_dunning_group_id)
        .filter(|g| g.acct_no == acct_no)
        .ok_or_else(|| {
            MockError::missing(format!(
                "client_dunning_group_id {} does not exist for acct_no {}",
                client_dunning_group_id, acct_no
            ))
        })
}

/// Resolves `(acct_no, billing_group_no)` for `update_acct_billing_group_m`.
pub fn update_billing_group(
    tables: &Tables,
    req: &UpdateBillingGroupRequest,
    today: NaiveDate,
) -> Result<(i64, i64), MockError> {
    let acct_no = account(tables, &req.account)?.acct_no;
    let group = billing_group_of(
        tables,
        acct_no,
        &req.client_billing_group_id,
        req.billing_group_no,
    )?;

    if let Some(no) = req.primary_payment_method_no.filter(|n| *n != 0) {
        active_payment_method(tables, acct_no, no)?;
    }
    if req.card.is_present() {
        card(&req.card, today)?;
    }
    Ok((acct_no, group.billing_group_no))
}

// ============================================================================
// Plans
// ============================================================================

pub fn create_plan(tables: &Tables, req: &PlanRequest) -> Result<(), MockError> {
    if req.plan_name.is_empty() {
        return Err(MockError::missing("plan_name is required"));
    }
    if req.client_plan_id.is_empty() {
        return Err(MockError::missing("client_plan_id is required"));
    }
    plan_type(&req.plan_type)?;
    currency(&req.currency)?;
    services(&req.service)?;

    if tables.active_plan(&req.client_plan_id).is_some() {
        return Err(MockError::missing(format!(
            "client_plan_id {} already exists",
            req.client_plan_id
        )));
    }
    if tables.active_plans().any(|p| p.plan_name == req.plan_name) {
        return Err(MockError::missing(format!(
            "plan_name {} already exists",
            req.plan_name
        )));
    }
    Ok(())
}

pub fn edit_plan<'t>(tables: &'t Tables, req: &PlanRequest) -> Result<&'t Plan, MockError> {
    let plan = tables.plan(&req.client_plan_id).ok_or_else(|| {
        MockError::missing(format!(
            "client_plan_id {} does not exist",
            req.client_plan_id
        ))
    })?;
    if req.plan_name != plan.plan_name {
        return Err(MockError::missing(format!(
            "plan_name {} does not match client_plan_id {}",
            req.plan_name, req.client_plan_id
        )));
    }
    if req.edit_directives != Some(EDIT_DIRECTIVE_REPLACE) {
        return Err(MockError::missing(format!(
            "edit_directives must be {}",
            EDIT_DIRECTIVE_REPLACE
        )));
    }
    if !req.plan_type.is_empty() {
        plan_type(&req.plan_type)?;
    }
    if !req.currency.is_empty() {
        currency(&req.currency)?;
    }
    services(&req.service)?;

    let reactivating = !plan.active && req.active.map_or(false, |a| a != 0);
    if reactivating && tables.active_plans().any(|p| p.plan_name == plan.plan_name) {
        return Err(MockError::missing(format!(
            "plan_name {} already exists",
            plan.plan_name
        )));
    }
    Ok(plan)
}

fn plan_type(value: &str) -> Result<(), MockError> {
    if PLAN_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(MockError::missing(format!("invalid plan_type {}", value)))
    }
}

fn currency(value: &str) -> Result<(), MockError> {
    if is_known_currency(value) {
        Ok(())
    } else {
        Err(MockError::missing(format!("invalid currency {}", value)))
    }
}

fn services(services: &[ServiceSpec]) -> Result<(), MockError> {
    for service in services {
        service_type(&service.service_type)?;
    }
    Ok(())
}

fn service_type(value: &str) -> Result<(), MockError> {
    if SERVICE_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(MockError::missing(format!("invalid service_type {}", value)))
    }
}

/// Every listed plan number must exist before any is removed.
pub fn delete_plans(tables: &Tables, plan_nos: &[i64]) -> Result<(), MockError> {
    if plan_nos.is_empty() {
        return Err(MockError::missing("plan_nos is required"));
    }
    match plan_nos.iter().find(|no| tables.plan_by_no(**no).is_none()) {
        Some(no) => Err(MockError::missing(format!("plan_no {} does not exist", no))),
        None => Ok(()),
    }
}

/// Look a plan up by client plan id, or by number when no id is given.
pub fn plan<'t>(
    tables: &'t Tables,
    client_plan_id: &str,
    plan_no: Option<i64>,
) -> Result<&'t Plan, MockError> {
    let found = if client_plan_id.is_empty() {
        plan_no.and_then(|no| tables.plan_by_no(no))
    } else {
        tables.plan(client_plan_id)
    };
    found.ok_or_else(|| {
        MockError::missing(format!("client_plan_id {} does not exist", client_plan_id))
    })
}

pub fn active_plan<'t>(tables: &'t Tables, client_plan_id: &str) -> Result<&'t Plan, MockError> {
    tables.active_plan(client_plan_id).ok_or_else(|| {
        MockError::missing(format!("client_plan_id {} does not exist", client_plan_id))
    })
}

/// Resolves `(acct_no, plan)` and the optional existing groups for `assign_acct_plan_m`.
pub fn assign_plan<'t>(
    tables: &'t Tables,
    req: &AssignAcctPlanRequest,
) -> Result<PlanAssignmentTarget<'t>, MockError> {
    let acct_no = account(tables, &req.account)?.acct_no;
    let plan = active_plan(tables, &req.new_client_plan_id)?;

    if !req.client_plan_instance_id.is_empty()
        && tables
            .assignments_for(acct_no)
            .iter()
            .any(|a| a.client_plan_instance_id == req.client_plan_instance_id)
    {
        return Err(MockError::in_use(
            "client_plan_instance_id",
            &req.client_plan_instance_id,
        ));
    }

    let billing_group_no = match req.existing_client_billing_group_id.as_deref() {
        Some(id) if !id.is_empty() => {
            Some(billing_group_of(tables, acct_no, id, None)?.billing_group_no)
        }
        _ => None,
    };
    let dunning_group_no = match req.existing_client_def_dunning_group_id.as_deref() {
        Some(id) if !id.is_empty() => {
            Some(dunning_group_of(tables, acct_no, id)?.dunning_group_no)
        }
        _ => None,
    };

    Ok(PlanAssignmentTarget {
        acct_no,
        plan,
        billing_group_no,
        dunning_group_no,
    })
}

pub struct PlanAssignmentTarget<'t> {
    pub acct_no: i64,
    pub plan: &'t Plan,
    pub billing_group_no: Option<i64>,
    pub dunning_group_no: Option<i64>,
}

// ============================================================================
// Services and usage types
// ============================================================================

pub fn create_service(tables: &Tables, req: &CreateServiceRequest) -> Result<(), MockError> {
    service_type(&req.service_type)?;
    if tables
        .service_by_name_and_type(&req.service_name, &req.service_type)
        .is_some()
    {
        return Err(MockError::missing(format!(
            "service {} of type {} already exists",
            req.service_name, req.service_type
        )));
    }
    if req.client_service_id.is_empty() {
        return Err(MockError::missing("client_service_id is required"));
    }
    if tables.service(&req.client_service_id).is_some() {
        return Err(MockError::missing(format!(
            "client_service_id {} already exists",
            req.client_service_id
        )));
    }
    Ok(())
}

pub fn usage_type_code(code: &str) -> Result<(), MockError> {
    if code.trim().is_empty() {
        return Err(MockError::missing("usage_type_code is required"));
    }
    Ok(())
}

// ============================================================================
// Credits
// ============================================================================

pub fn credit_amount(amount: f64) -> Result<(), MockError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(MockError::invalid(format!("invalid credit amount {}", amount)))
    }
}

// ============================================================================
// Payment methods, collections and sessions
// ============================================================================

/// Card checks: ranges first, then expiry against `today`.
pub fn card(card: &CardDetails, today: NaiveDate) -> Result<(), MockError> {
    card.validate()?;

    if !card.cc_number.chars().all(|c| c.is_ascii_digit())
        || !CARD_NUMBER_DIGITS.contains(&card.cc_number.len())
    {
        return Err(MockError::invalid("invalid credit card number"));
    }
    let month = card
        .cc_expire_mm
        .ok_or_else(|| MockError::invalid("cc_expire_mm is required"))?;
    let year = card
        .cc_expire_yyyy
        .ok_or_else(|| MockError::invalid("cc_expire_yyyy is required"))?;
    if card.cvv.is_none() {
        return Err(MockError::invalid("cvv is required"));
    }

    let current_year = i64::from(today.year());
    if year < current_year {
        return Err(MockError::invalid(format!("invalid cc_expire_yyyy {}", year)));
    }
    if year == current_year && month < i64::from(today.month()) {
        return Err(MockError::invalid("credit card has expired"));
    }
    Ok(())
}

/// Resolves `(acct_no, billing_group_no)` for `add_acct_payment_method_m`.
pub fn add_payment_method(
    tables: &Tables,
    req: &AddPaymentMethodRequest,
    today: NaiveDate,
) -> Result<(i64, i64), MockError> {
    let acct_no = account(tables, &req.account)?.acct_no;
    let group = billing_group_of(
        tables,
        acct_no,
        &req.client_billing_group_id,
        req.billing_group_no,
    )?;
    if !req.card.is_present() {
        return Err(MockError::invalid("cc_number is required"));
    }
    card(&req.card, today)?;
    Ok((acct_no, group.billing_group_no))
}

pub fn active_payment_method(
    tables: &Tables,
    acct_no: i64,
    payment_method_no: i64,
) -> Result<(), MockError> {
    match tables.payment_method(acct_no, payment_method_no) {
        Some(method) if method.active => Ok(()),
        _ => Err(MockError::missing(format!(
            "payment_method_no {} does not exist for acct_no {}",
            payment_method_no, acct_no
        ))),
    }
}

pub fn collections_group(account: &Account, group_id: &str) -> Result<(), MockError> {
    if group_id.is_empty() {
        return Err(MockError::missing("client_acct_group_id is required"));
    }
    if account.collections_group_id.as_deref() == Some(group_id) {
        return Err(MockError::AlreadyAssigned(format!(
            "acct_no {} is already assigned to collections group {}",
            account.acct_no, group_id
        )));
    }
    Ok(())
}

/// A session can only be opened for a known account.
pub fn session_account<'t>(
    tables: &'t Tables,
    req: &SetSessionRequest,
) -> Result<&'t Account, MockError> {
    tables
        .account(req.account.account_ref())
        .or_else(|| {
            req.user_id
                .as_deref()
                .filter(|u| !u.is_empty())
                .and_then(|u| tables.account_by_userid(u))
        })
        .ok_or_else(|| {
            MockError::SessionRejected(format!(
                "{} does not exist",
                req.account.account_ref()
            ))
        })
}
