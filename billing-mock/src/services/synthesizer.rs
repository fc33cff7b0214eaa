//! Response synthesis.
//!
//! Builders here assume the operation already succeeded. Strict mode fills
//! the fields the vendor would return, pulling cross-referenced rows from
//! the store and inventing filler for anything the store does not model.
//! Loose mode keeps only what a caller needs to continue.

use crate::config::ResponseMode;
use crate::dtos::accounts::{
    AccountDetails, AccountNotificationDetail, AcctHierarchyDtl, BillingGroupInfo, ChiefAcctInfo,
    DunningGroupInfo, MasterPlanInfo,
};
use crate::dtos::credits::{AllCredit, CreditDetailsBody, UnappliedCredit};
use crate::dtos::payments::{AccountPaymentMethod, AddPaymentMethodBody};
use crate::dtos::plans::{
    AcctPlan, ClientPlanDtl, PlanDetailsBody, PlanServiceDtl, PlanServiceRate,
    SupplementalObjField,
};
use crate::models::{
    Account, BillingGroup, Credit, DunningGroup, PaymentMethod, Plan, PlanAssignment, PlanService,
    RateTier,
};
use crate::services::ids;
use crate::services::store::Tables;
use chrono::{DateTime, Utc};

const FILLER_FIRST_NAME: &str = "Mock";
const FILLER_LAST_NAME: &str = "Customer";
const FILLER_ADDRESS: &str = "100 Main Street";
const FILLER_CITY: &str = "Springfield";
const FILLER_COUNTRY: &str = "US";
const FILLER_POSTAL_CD: &str = "00000";
const FILLER_LOCALE: &str = "en-US";
const PHONE_DIGITS: usize = 10;
const AUTH_CODE_LEN: usize = 6;

/// Senior chains longer than this are treated as cyclic.
const MAX_HIERARCHY_DEPTH: usize = 32;

const CREDIT_TYPE_SERVICE: &str = "S";
const FIXTURE_CREDIT_AMOUNT: f64 = 100.0;
const FIXTURE_REASON_CD: i64 = 1;
const STATUS_ACTIVE: i64 = 1;
const STATUS_INACTIVE: i64 = 0;

pub fn vendor_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    mode: ResponseMode,
}

impl Synthesizer {
    pub fn new(mode: ResponseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    /// Build a strict-only part of a response; `None` in loose mode.
    pub fn strict<T>(&self, build: impl FnOnce() -> T) -> Option<T> {
        if self.mode.is_strict() {
            Some(build())
        } else {
            None
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn account_details(&self, tables: &Tables, account: &Account) -> AccountDetails {
        AccountDetails {
            acct_no: account.acct_no,
            client_acct_id: account.client_acct_id.clone(),
            userid: account.userid.clone(),
            acct_currency: account.currency.clone(),
            status_cd: account.status_cd,
            notify_method: account.notify_method,
            senior_acct_no: account.senior_acct_no,
            first_name: account
                .first_name
                .clone()
                .unwrap_or_else(|| FILLER_FIRST_NAME.to_string()),
            last_name: account
                .last_name
                .clone()
                .unwrap_or_else(|| FILLER_LAST_NAME.to_string()),
            email: account
                .email
                .clone()
                .unwrap_or_else(|| format!("{}@example.com", account.userid)),
            address1: FILLER_ADDRESS.to_string(),
            city: FILLER_CITY.to_string(),
            country: FILLER_COUNTRY.to_string(),
            postal_cd: FILLER_POSTAL_CD.to_string(),
            phone: ids::digits(PHONE_DIGITS),
            notify_tmplt_grp_id: account.notify_tmplt_grp_id.clone(),
            acct_create_date: vendor_date(account.created_utc),
            billing_groups_info: tables
                .billing_groups_for(account.acct_no)
                .into_iter()
                .map(billing_group_info)
                .collect(),
            master_plans_info: self.master_plans(tables, account.acct_no),
            dunning_groups_info: tables
                .dunning_groups_for(account.acct_no)
                .into_iter()
                .map(dunning_group_info)
                .collect(),
            supp_field: account.supp_fields.clone(),
            functional_acct_groups: account.functional_acct_groups.clone(),
            chief_acct_info: vec![chief_account(tables, account)],
        }
    }

    pub fn locale_name(&self) -> String {
        FILLER_LOCALE.to_string()
    }

    pub fn master_plans(&self, tables: &Tables, acct_no: i64) -> Vec<MasterPlanInfo> {
        tables
            .assignments_for(acct_no)
            .into_iter()
            .map(|a| master_plan_info(tables, a))
            .collect()
    }

    /// The account followed by its direct children.
    pub fn hierarchy(&self, tables: &Tables, account: &Account) -> Vec<AcctHierarchyDtl> {
        std::iter::once(account)
            .chain(tables.child_accounts(account.acct_no))
            .map(|a| AcctHierarchyDtl {
                acct_no: a.acct_no,
                client_acct_id: a.client_acct_id.clone(),
                userid: a.userid.clone(),
                senior_acct_no: a.senior_acct_no.unwrap_or(0),
                child_acct_no: tables
                    .child_accounts(a.acct_no)
                    .iter()
                    .map(|c| c.acct_no)
                    .collect(),
                master_plans_info: self.master_plans(tables, a.acct_no),
            })
            .collect()
    }

    pub fn notification_details(&self, account: &Account) -> Vec<AccountNotificationDetail> {
        account
            .notify_tmplt_grp_id
            .iter()
            .map(|group_id| AccountNotificationDetail {
                notification_template_group_id: group_id.clone(),
                notify_method: account.notify_method,
                email: account.email.clone(),
            })
            .collect()
    }

    // =========================================================================
    // Plans
    // =========================================================================

    pub fn plan_details(&self, tables: &Tables, plan: &Plan) -> PlanDetailsBody {
        PlanDetailsBody {
            plan_no: plan.plan_no,
            client_plan_id: plan.client_plan_id.clone(),
            plan_name: plan.plan_name.clone(),
            plan_type: plan.plan_type.clone(),
            currency_cd: plan.currency.clone(),
            active_ind: active_ind(plan.active),
            plan_desc: self.strict(|| plan_description(plan)),
            plan_services: self.strict(|| plan_services(tables, plan)),
            supplemental_obj_field: self.strict(|| {
                plan.supplemental_fields
                    .iter()
                    .map(|(name, values)| SupplementalObjField {
                        field_name: name.clone(),
                        field_value: values.clone(),
                    })
                    .collect()
            }),
        }
    }

    pub fn client_plan(&self, tables: &Tables, plan: &Plan) -> ClientPlanDtl {
        ClientPlanDtl {
            plan_no: plan.plan_no,
            client_plan_id: plan.client_plan_id.clone(),
            plan_name: plan.plan_name.clone(),
            plan_desc: plan_description(plan),
            plan_type: plan.plan_type.clone(),
            currency_cd: plan.currency.clone(),
            active_ind: active_ind(plan.active),
            plan_services: self
                .strict(|| plan_services(tables, plan))
                .unwrap_or_default(),
        }
    }

    pub fn acct_plan(&self, tables: &Tables, assignment: &PlanAssignment) -> AcctPlan {
        AcctPlan {
            plan_instance_no: assignment.plan_instance_no,
            client_plan_instance_id: assignment.client_plan_instance_id.clone(),
            plan_no: assignment.plan_no,
            client_plan_id: assignment.client_plan_id.clone(),
            plan_name: plan_name(tables, assignment),
            plan_instance_status_cd: assignment.status_cd,
            plan_units: assignment.units,
            plan_date: vendor_date(assignment.assigned_utc),
        }
    }

    // =========================================================================
    // Credits
    // =========================================================================

    pub fn all_credit(&self, credit: &Credit) -> AllCredit {
        AllCredit {
            out_acct_no: credit.acct_no,
            credit_no: credit.credit_no,
            credit_type: CREDIT_TYPE_SERVICE.to_string(),
            amount: credit.amount,
            applied_amount: credit.applied_amount,
            unapplied_amount: credit.unapplied(),
            reason_cd: credit.reason_code,
            reason_text: reason_text(credit.reason_code),
            comments: credit.comments.clone(),
            create_date: vendor_date(credit.created_utc),
        }
    }

    /// Stand-in credit for an account with none on record.
    pub fn fixture_credit(&self, acct_no: i64) -> AllCredit {
        AllCredit {
            out_acct_no: acct_no,
            credit_no: ids::number(ids::CREDIT_NO_DIGITS),
            credit_type: CREDIT_TYPE_SERVICE.to_string(),
            amount: FIXTURE_CREDIT_AMOUNT,
            applied_amount: 0.0,
            unapplied_amount: FIXTURE_CREDIT_AMOUNT,
            reason_cd: FIXTURE_REASON_CD,
            reason_text: reason_text(FIXTURE_REASON_CD),
            comments: ids::filler(16),
            create_date: vendor_date(Utc::now()),
        }
    }

    pub fn credit_details(&self, credit: &Credit) -> CreditDetailsBody {
        CreditDetailsBody {
            credit_no: credit.credit_no,
            acct_no: credit.acct_no,
            amount: credit.amount,
            applied_amount: credit.applied_amount,
            unapplied_amount: credit.unapplied(),
            reason_code: credit.reason_code,
            comments: credit.comments.clone(),
            expiry_date: credit.expiry_date.clone(),
            create_date: vendor_date(credit.created_utc),
        }
    }

    pub fn unapplied_credit(&self, credit: &Credit) -> UnappliedCredit {
        UnappliedCredit {
            credit_id: credit.credit_no,
            initial_amount: credit.amount,
            amount_left_to_apply: credit.unapplied(),
            reason_cd: credit.reason_code,
            comments: credit.comments.clone(),
            create_date: vendor_date(credit.created_utc),
            expiry_date: credit.expiry_date.clone(),
        }
    }

    // =========================================================================
    // Payment methods
    // =========================================================================

    pub fn payment_method(&self, method: &PaymentMethod) -> AccountPaymentMethod {
        AccountPaymentMethod {
            payment_method_no: method.payment_method_no,
            client_payment_method_id: method.client_payment_method_id.clone(),
            pay_method_type: method.pay_method_type,
            cc_suffix: method.cc_suffix.clone(),
            cc_expire_mm: method.cc_expire_mm,
            cc_expire_yyyy: method.cc_expire_yyyy,
            billing_group_no: method.billing_group_no,
            status: if method.active {
                STATUS_ACTIVE
            } else {
                STATUS_INACTIVE
            },
            from_date: vendor_date(method.created_utc),
        }
    }

    pub fn added_payment_method(&self, method: &PaymentMethod) -> Option<AddPaymentMethodBody> {
        self.strict(|| AddPaymentMethodBody {
            payment_method_no: method.payment_method_no,
            billing_group_no: method.billing_group_no,
            contact_no: ids::number(ids::CONTACT_NO_DIGITS),
            proc_cvv_response: "M".to_string(),
            proc_avs_response: "Y".to_string(),
            proc_auth_code: ids::digits(AUTH_CODE_LEN),
        })
    }
}

pub fn billing_group_info(group: &BillingGroup) -> BillingGroupInfo {
    BillingGroupInfo {
        billing_group_no: group.billing_group_no,
        client_billing_group_id: group.client_billing_group_id.clone(),
        billing_group_name: group.name.clone(),
        billing_group_description: group.description.clone().unwrap_or_default(),
        notify_method: group.notify_method,
        primary_payment_method_no: group.primary_payment_method_no,
        status: STATUS_ACTIVE,
    }
}

pub fn dunning_group_info(group: &DunningGroup) -> DunningGroupInfo {
    DunningGroupInfo {
        dunning_group_no: group.dunning_group_no,
        client_dunning_group_id: group.client_dunning_group_id.clone(),
        dunning_group_name: group.name.clone(),
        client_dunning_process_id: group.client_dunning_process_id.clone(),
        status: STATUS_ACTIVE,
    }
}

fn master_plan_info(tables: &Tables, assignment: &PlanAssignment) -> MasterPlanInfo {
    MasterPlanInfo {
        plan_instance_no: assignment.plan_instance_no,
        client_plan_instance_id: assignment.client_plan_instance_id.clone(),
        plan_no: assignment.plan_no,
        client_plan_id: assignment.client_plan_id.clone(),
        plan_name: plan_name(tables, assignment),
        plan_instance_status_cd: assignment.status_cd,
        plan_units: assignment.units,
        billing_group_no: assignment.billing_group_no,
        dunning_group_no: assignment.dunning_group_no,
        plan_date: vendor_date(assignment.assigned_utc),
    }
}

fn plan_name(tables: &Tables, assignment: &PlanAssignment) -> String {
    tables
        .plan(&assignment.client_plan_id)
        .map(|p| p.plan_name.clone())
        .unwrap_or_default()
}

/// Walk senior accounts to the top of the chain.
fn chief_account(tables: &Tables, account: &Account) -> ChiefAcctInfo {
    let mut chief = account;
    for _ in 0..MAX_HIERARCHY_DEPTH {
        match chief.senior_acct_no.and_then(|no| tables.account_by_no(no)) {
            Some(senior) => chief = senior,
            None => break,
        }
    }
    ChiefAcctInfo {
        chief_acct_no: chief.acct_no,
        chief_client_acct_id: chief.client_acct_id.clone(),
        chief_acct_userid: chief.userid.clone(),
    }
}

fn active_ind(active: bool) -> i64 {
    if active {
        STATUS_ACTIVE
    } else {
        STATUS_INACTIVE
    }
}

fn plan_description(plan: &Plan) -> String {
    plan.description
        .clone()
        .unwrap_or_else(|| format!("{} ({})", plan.plan_name, plan.plan_type))
}

fn plan_services(tables: &Tables, plan: &Plan) -> Vec<PlanServiceDtl> {
    plan.services
        .iter()
        .map(|service| {
            let registered = tables.service_by_no(service.service_no);
            PlanServiceDtl {
                service_no: service.service_no,
                client_service_id: service.client_service_id.clone(),
                service_desc: registered
                    .map(|s| s.service_name.clone())
                    .unwrap_or_else(|| service.client_service_id.clone()),
                service_type: registered
                    .map(|s| s.service_type.clone())
                    .unwrap_or_default(),
                plan_service_rates: service_rates(plan, service),
            }
        })
        .collect()
}

/// Rate rows for one service of a plan. A service priced without tiers
/// reports a single free tier from unit 1.
pub fn service_rates(plan: &Plan, service: &PlanService) -> Vec<PlanServiceRate> {
    let fallback = [RateTier {
        from: 1,
        to: None,
        amount: 0.0,
    }];
    let tiers = if service.tiers.is_empty() {
        &fallback[..]
    } else {
        &service.tiers[..]
    };
    let schedule_id = match service.rate_type.as_deref() {
        Some(rate_type) if !rate_type.is_empty() => format!("{}.{}", plan.client_plan_id, rate_type),
        _ => format!("{}.default", plan.client_plan_id),
    };

    tiers
        .iter()
        .enumerate()
        .map(|(seq, tier)| PlanServiceRate {
            rate_seq_no: seq as i64 + 1,
            from_unit: tier.from,
            to_unit: tier.to,
            rate_per_unit: tier.amount,
            client_rate_schedule_id: schedule_id.clone(),
        })
        .collect()
}

fn reason_text(reason_code: i64) -> String {
    match reason_code {
        1 => "Service credit".to_string(),
        2 => "Goodwill credit".to_string(),
        other => format!("Reason {}", other),
    }
}
