//! Account operations.

use crate::dtos::accounts::{
    AccountDetails, AcctNoBody, AcctSpec, BillingGroupRef, BillingGroupSpec, CreateAcctBody,
    CreateAcctCompleteRequest, DunningGroupRef, DunningGroupSpec, GetAcctDetailsAllRequest,
    GetAcctHierarchyDetailsRequest, GetAcctNoFromUserIdRequest,
    GetAcctNotificationDetailsRequest, HierarchyBody, MasterPlanAssigned, NotificationBody,
    OutAcct, SetAcctNotifyTmpltGrpRequest, UpdateAcctCompleteRequest, UpdateAcctStatusRequest,
    UpdateContactRequest,
};
use crate::dtos::{Empty, Reply};
use crate::error::MockError;
use crate::models::{Account, BillingGroup, DunningGroup, PlanAssignment};
use crate::services::validation;
use crate::services::{ids, Synthesizer, Tables};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::info;

const DEFAULT_CURRENCY: &str = "usd";
const DEFAULT_STATUS_CD: i64 = 1;
const DEFAULT_PLAN_UNITS: i64 = 1;
const DEFAULT_DUNNING_PROCESS_ID: &str = "default";
const GROUP_ID_SUFFIX_LEN: usize = 6;

/// Group ids named explicitly anywhere in one create request. Defaults
/// generated for earlier accounts of the batch must not claim them.
struct ReservedGroupIds {
    billing: HashSet<String>,
    dunning: HashSet<String>,
}

impl ReservedGroupIds {
    fn from_request(req: &CreateAcctCompleteRequest) -> Self {
        Self {
            billing: req
                .acct
                .iter()
                .flat_map(|a| &a.billing_group)
                .map(|g| g.client_billing_group_id.clone())
                .collect(),
            dunning: req
                .acct
                .iter()
                .flat_map(|a| &a.dunning_group)
                .map(|g| g.client_dunning_group_id.clone())
                .collect(),
        }
    }
}

pub fn create_acct_complete(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: CreateAcctCompleteRequest,
) -> Result<Reply<CreateAcctBody>, MockError> {
    validation::create_accounts(tables, &req)?;

    let now = Utc::now();
    let reserved = ReservedGroupIds::from_request(&req);
    let out_acct: Vec<OutAcct> = req
        .acct
        .into_iter()
        .map(|spec| create_account(tables, synth, spec, &reserved, now))
        .collect();

    Ok(Reply::ok(CreateAcctBody { out_acct }))
}

fn create_account(
    tables: &mut Tables,
    synth: &Synthesizer,
    spec: AcctSpec,
    reserved: &ReservedGroupIds,
    now: DateTime<Utc>,
) -> OutAcct {
    let acct_no = tables.next_acct_no();
    let currency = if spec.acct_currency.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        spec.acct_currency.to_lowercase()
    };

    tables.insert_account(Account {
        acct_no,
        client_acct_id: spec.client_acct_id.clone(),
        userid: spec.userid.clone(),
        currency,
        status_cd: spec.status_cd.unwrap_or(DEFAULT_STATUS_CD),
        notify_method: spec.notify_method,
        senior_acct_no: spec.senior_acct_no.filter(|n| *n != 0),
        email: spec.email.clone(),
        first_name: spec.first_name.clone(),
        last_name: spec.last_name.clone(),
        notify_tmplt_grp_id: None,
        collections_group_id: None,
        supp_fields: spec.supp_field.clone(),
        functional_acct_groups: spec
            .functional_acct_group
            .iter()
            .map(|g| g.client_functional_acct_group_id.clone())
            .collect(),
        created_utc: now,
    });

    let billing_specs = if spec.billing_group.is_empty() {
        vec![default_billing_group(tables, &reserved.billing, &spec)]
    } else {
        spec.billing_group.clone()
    };
    let billing_groups: Vec<BillingGroupRef> = billing_specs
        .into_iter()
        .map(|group| {
            let billing_group_no = tables.next_billing_group_no();
            let client_billing_group_id = group.client_billing_group_id.clone();
            tables.insert_billing_group(BillingGroup {
                billing_group_no,
                client_billing_group_id: group.client_billing_group_id,
                acct_no,
                name: group.billing_group_name,
                description: group.billing_group_description,
                notify_method: group.notify_method,
                primary_payment_method_no: None,
            });
            BillingGroupRef {
                billing_group_no,
                client_billing_group_id,
            }
        })
        .collect();

    let dunning_specs = if spec.dunning_group.is_empty() {
        vec![default_dunning_group(tables, &reserved.dunning, &spec)]
    } else {
        spec.dunning_group.clone()
    };
    let dunning_groups: Vec<DunningGroupRef> = dunning_specs
        .into_iter()
        .map(|group| {
            let dunning_group_no = tables.next_dunning_group_no();
            let client_dunning_group_id = group.client_dunning_group_id.clone();
            tables.insert_dunning_group(DunningGroup {
                dunning_group_no,
                client_dunning_group_id: group.client_dunning_group_id,
                acct_no,
                name: group.dunning_group_name,
                client_dunning_process_id: group.client_dunning_process_id,
            });
            DunningGroupRef {
                dunning_group_no,
                client_dunning_group_id,
            }
        })
        .collect();

    let mut instance_ids: HashSet<String> = spec
        .master_plans_detail
        .iter()
        .map(|d| d.client_plan_instance_id.clone())
        .filter(|id| !id.is_empty())
        .collect();
    let mut assigned = Vec::with_capacity(spec.master_plans_detail.len());
    for detail in &spec.master_plans_detail {
        let Some(plan_no) = tables
            .active_plan(&detail.client_plan_id)
            .map(|p| p.plan_no)
        else {
            continue;
        };
        let plan_instance_no = tables.next_plan_instance_no();
        let client_plan_instance_id = if detail.client_plan_instance_id.is_empty() {
            let base = format!("{}.{}", spec.client_acct_id, detail.client_plan_id);
            let id = unused_id(base, |id| instance_ids.contains(id));
            instance_ids.insert(id.clone());
            id
        } else {
            detail.client_plan_instance_id.clone()
        };

        tables.insert_assignment(PlanAssignment {
            plan_instance_no,
            client_plan_instance_id: client_plan_instance_id.clone(),
            acct_no,
            plan_no,
            client_plan_id: detail.client_plan_id.clone(),
            status_cd: detail.plan_instance_status.unwrap_or(DEFAULT_STATUS_CD),
            units: detail.plan_instance_units.unwrap_or(DEFAULT_PLAN_UNITS),
            billing_group_no: pick_group(detail.billing_group_idx, &billing_groups)
                .map(|g| g.billing_group_no),
            dunning_group_no: pick_group(detail.dunning_group_idx, &dunning_groups)
                .map(|g| g.dunning_group_no),
            assigned_utc: now,
        });
        assigned.push(MasterPlanAssigned {
            plan_instance_no,
            client_plan_instance_id,
            plan_no,
            client_plan_id: detail.client_plan_id.clone(),
        });
    }

    info!(
        acct_no = acct_no,
        client_acct_id = %spec.client_acct_id,
        master_plans = assigned.len(),
        "Account created"
    );

    let strict = synth.mode().is_strict();
    OutAcct {
        acct_no,
        userid: spec.userid,
        client_acct_id: spec.client_acct_id,
        acct_billing_groups: strict.then_some(billing_groups),
        acct_dunning_groups: strict.then_some(dunning_groups),
        master_plans_assigned: strict.then_some(assigned),
        acct_locale_name: synth.strict(|| synth.locale_name()),
    }
}

/// 1-based index into the groups created with the account; first group otherwise.
fn pick_group<T>(idx: Option<i64>, groups: &[T]) -> Option<&T> {
    match idx {
        Some(i) if i >= 1 => groups.get(i as usize - 1),
        _ => groups.first(),
    }
}

fn default_billing_group(
    tables: &Tables,
    reserved: &HashSet<String>,
    spec: &AcctSpec,
) -> BillingGroupSpec {
    let base = format!("{}.billing_group", spec.client_acct_id);
    let client_billing_group_id = unused_id(base, |id| {
        reserved.contains(id) || tables.billing_group(id).is_some()
    });
    BillingGroupSpec {
        client_billing_group_id,
        billing_group_name: format!("{} billing group", spec.client_acct_id),
        billing_group_description: None,
        notify_method: spec.notify_method,
    }
}

fn default_dunning_group(
    tables: &Tables,
    reserved: &HashSet<String>,
    spec: &AcctSpec,
) -> DunningGroupSpec {
    let base = format!("{}.dunning_group", spec.client_acct_id);
    let client_dunning_group_id = unused_id(base, |id| {
        reserved.contains(id) || tables.dunning_group(id).is_some()
    });
    DunningGroupSpec {
        client_dunning_group_id,
        dunning_group_name: format!("{} dunning group", spec.client_acct_id),
        client_dunning_process_id: DEFAULT_DUNNING_PROCESS_ID.to_string(),
    }
}

fn unused_id(base: String, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = base.clone();
    while taken(&candidate) {
        candidate = format!("{}.{}", base, ids::filler(GROUP_ID_SUFFIX_LEN));
    }
    candidate
}

pub fn get_acct_details_all(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetAcctDetailsAllRequest,
) -> Result<Reply<Option<AccountDetails>>, MockError> {
    let account = validation::account_for_details(tables, &req.account)?;
    Ok(Reply::ok(
        synth.strict(|| synth.account_details(tables, account)),
    ))
}

pub fn update_acct_complete(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: UpdateAcctCompleteRequest,
) -> Result<Reply<Option<AcctNoBody>>, MockError> {
    let (acct_no, senior) = {
        let (account, senior) = validation::update_account(tables, &req)?;
        (account.acct_no, senior)
    };

    if let Some(account) = tables.account_mut(acct_no) {
        if senior.is_some() {
            account.senior_acct_no = senior;
        }
        if let Some(email) = req.email.filter(|e| !e.is_empty()) {
            account.email = Some(email);
        }
        if let Some(status_cd) = req.status_cd {
            account.status_cd = status_cd;
        }
    }
    info!(acct_no = acct_no, senior_acct_no = ?senior, "Account updated");

    Ok(Reply::ok(synth.strict(|| AcctNoBody { acct_no })))
}

pub fn update_acct_status(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: UpdateAcctStatusRequest,
) -> Result<Reply<Empty>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let status_cd = req
        .status_cd
        .ok_or_else(|| MockError::missing("status_cd is required"))?;
    validation::status_code(status_cd)?;

    if let Some(account) = tables.account_mut(acct_no) {
        account.status_cd = status_cd;
    }
    info!(acct_no = acct_no, status_cd = status_cd, "Account status updated");

    Ok(Reply::bare())
}

pub fn get_acct_no_from_user_id(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: GetAcctNoFromUserIdRequest,
) -> Result<Reply<AcctNoBody>, MockError> {
    let acct_no = validation::account_by_userid(tables, &req.user_id)?.acct_no;
    Ok(Reply::ok(AcctNoBody { acct_no }))
}

pub fn get_acct_hierarchy_details(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetAcctHierarchyDetailsRequest,
) -> Result<Reply<Option<HierarchyBody>>, MockError> {
    let account = validation::account(tables, &req.account)?;
    Ok(Reply::ok(synth.strict(|| HierarchyBody {
        acct_hierarchy_dtls: synth.hierarchy(tables, account),
    })))
}

pub fn set_acct_notify_tmplt_grp(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: SetAcctNotifyTmpltGrpRequest,
) -> Result<Reply<Empty>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    if req.notification_template_group_id.is_empty() {
        return Err(MockError::invalid(
            "notification_template_group_id is required",
        ));
    }

    if let Some(account) = tables.account_mut(acct_no) {
        account.notify_tmplt_grp_id = Some(req.notification_template_group_id.clone());
    }
    info!(
        acct_no = acct_no,
        template_group = %req.notification_template_group_id,
        "Notification template group set"
    );

    Ok(Reply::bare())
}

pub fn get_acct_notification_details(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetAcctNotificationDetailsRequest,
) -> Result<Reply<NotificationBody>, MockError> {
    let account = validation::account(tables, &req.account)?;
    Ok(Reply::ok(NotificationBody {
        account_notification_details: synth.notification_details(account),
    }))
}

pub fn update_contact(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: UpdateContactRequest,
) -> Result<Reply<Empty>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;

    if let Some(account) = tables.account_mut(acct_no) {
        if let Some(email) = req.email.filter(|e| !e.is_empty()) {
            account.email = Some(email);
        }
        if let Some(first_name) = req.first_name {
            account.first_name = Some(first_name);
        }
        if let Some(last_name) = req.last_name {
            account.last_name = Some(last_name);
        }
    }
    info!(acct_no = acct_no, "Account contact updated");

    Ok(Reply::bare())
}
