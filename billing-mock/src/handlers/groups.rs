//! Billing and dunning group operations.

use super::payments::add_card;
use crate::dtos::accounts::{
    BillingGroupDetailsBody, BillingGroupNoBody, CreateBillingGroupRequest,
    CreateDunningGroupRequest, DunningGroupDetailsBody, DunningGroupNoBody, GroupDetailsRequest,
    UpdateBillingGroupBody, UpdateBillingGroupRequest, UpdateDunningGroupRequest,
};
use crate::dtos::{Empty, Reply};
use crate::error::MockError;
use crate::models::{BillingGroup, DunningGroup};
use crate::services::synthesizer::{billing_group_info, dunning_group_info};
use crate::services::validation;
use crate::services::{Synthesizer, Tables};
use chrono::Utc;
use tracing::info;

pub fn create_acct_billing_group(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: CreateBillingGroupRequest,
) -> Result<Reply<BillingGroupNoBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    validation::new_billing_group_id(tables, &req.client_billing_group_id)?;

    let billing_group_no = tables.next_billing_group_no();
    tables.insert_billing_group(BillingGroup {
        billing_group_no,
        client_billing_group_id: req.client_billing_group_id.clone(),
        acct_no,
        name: req.billing_group_name,
        description: req.billing_group_description,
        notify_method: req.notify_method,
        primary_payment_method_no: None,
    });
    info!(
        acct_no = acct_no,
        billing_group_no = billing_group_no,
        client_billing_group_id = %req.client_billing_group_id,
        "Billing group created"
    );

    Ok(Reply::ok(BillingGroupNoBody { billing_group_no }))
}

pub fn create_acct_dunning_group(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: CreateDunningGroupRequest,
) -> Result<Reply<Option<DunningGroupNoBody>>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    validation::new_dunning_group_id(tables, &req.client_dunning_group_id)?;

    let dunning_group_no = tables.next_dunning_group_no();
    tables.insert_dunning_group(DunningGroup {
        dunning_group_no,
        client_dunning_group_id: req.client_dunning_group_id.clone(),
        acct_no,
        name: req.dunning_group_name,
        client_dunning_process_id: req.client_dunning_process_id,
    });
    info!(
        acct_no = acct_no,
        dunning_group_no = dunning_group_no,
        client_dunning_group_id = %req.client_dunning_group_id,
        "Dunning group created"
    );

    Ok(Reply::ok(synth.strict(|| DunningGroupNoBody { dunning_group_no })))
}

pub fn get_acct_billing_group_details(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: GroupDetailsRequest,
) -> Result<Reply<BillingGroupDetailsBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let billing_group_details = tables
        .billing_groups_for(acct_no)
        .into_iter()
        .map(billing_group_info)
        .collect();
    Ok(Reply::ok(BillingGroupDetailsBody {
        billing_group_details,
    }))
}

pub fn get_acct_dunning_group_details(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: GroupDetailsRequest,
) -> Result<Reply<DunningGroupDetailsBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let dunning_group_details = tables
        .dunning_groups_for(acct_no)
        .into_iter()
        .map(dunning_group_info)
        .collect();
    Ok(Reply::ok(DunningGroupDetailsBody {
        dunning_group_details,
    }))
}

/// Attach a new card or re-point the group's primary payment method.
pub fn update_acct_billing_group(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: UpdateBillingGroupRequest,
) -> Result<Reply<UpdateBillingGroupBody>, MockError> {
    let today = Utc::now().date_naive();
    let (acct_no, billing_group_no) = validation::update_billing_group(tables, &req, today)?;

    let mut added = None;
    if req.card.is_present() {
        let client_id = req
            .client_payment_method_id
            .as_deref()
            .or(req.client_primary_payment_method_id.as_deref());
        let method = add_card(
            tables,
            acct_no,
            billing_group_no,
            client_id,
            req.pay_method_type,
            &req.card,
            true,
        );
        added = Some(method.payment_method_no);
    } else if let Some(primary) = req.primary_payment_method_no.filter(|n| *n != 0) {
        let group_id = tables
            .billing_group_by_no(billing_group_no)
            .map(|g| g.client_billing_group_id.clone());
        if let Some(group) = group_id.and_then(|id| tables.billing_group_mut(&id)) {
            group.primary_payment_method_no = Some(primary);
        }
        info!(
            acct_no = acct_no,
            billing_group_no = billing_group_no,
            payment_method_no = primary,
            "Primary payment method changed"
        );
    }

    Ok(Reply::ok(UpdateBillingGroupBody {
        billing_group_no,
        payment_method_no: added.filter(|_| synth.mode().is_strict()),
    }))
}

pub fn update_acct_dunning_group(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: UpdateDunningGroupRequest,
) -> Result<Reply<Empty>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    validation::dunning_group_of(tables, acct_no, &req.client_dunning_group_id)?;

    if let Some(process_id) = req.client_dunning_process_id.filter(|p| !p.is_empty()) {
        if let Some(group) = tables.dunning_group_mut(&req.client_dunning_group_id) {
            group.client_dunning_process_id = process_id;
        }
    }
    info!(
        acct_no = acct_no,
        client_dunning_group_id = %req.client_dunning_group_id,
        "Dunning group updated"
    );

    Ok(Reply::bare())
}
