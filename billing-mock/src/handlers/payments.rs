//! Payment method, collections group and payment-form session operations.

use crate::dtos::payments::{
    AddPaymentMethodBody, AddPaymentMethodRequest, AssignCollectionsGroupRequest, CardDetails,
    GetPaymentMethodsRequest, PaymentMethodsBody, RemovePaymentMethodRequest, SessionBody,
    SetSessionRequest,
};
use crate::dtos::{Empty, Reply};
use crate::error::MockError;
use crate::models::{PaymentMethod, Session};
use crate::services::validation;
use crate::services::{ids, Synthesizer, Tables};
use chrono::Utc;
use tracing::info;

const DEFAULT_PAY_METHOD_TYPE: i64 = 1;
const FILTER_ALL: i64 = 0;

/// Store a validated card against a billing group.
///
/// The card becomes the group's primary method when the group has none, or
/// whenever `make_primary` is set.
pub(crate) fn add_card(
    tables: &mut Tables,
    acct_no: i64,
    billing_group_no: i64,
    client_payment_method_id: Option<&str>,
    pay_method_type: Option<i64>,
    card: &CardDetails,
    make_primary: bool,
) -> PaymentMethod {
    let payment_method_no = tables.next_payment_method_no(acct_no);
    let client_payment_method_id = client_payment_method_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.pm{}", acct_no, payment_method_no));

    let method = PaymentMethod {
        acct_no,
        payment_method_no,
        client_payment_method_id,
        billing_group_no,
        pay_method_type: pay_method_type.unwrap_or(DEFAULT_PAY_METHOD_TYPE),
        cc_suffix: card.suffix(),
        cc_expire_mm: card.cc_expire_mm.unwrap_or_default(),
        cc_expire_yyyy: card.cc_expire_yyyy.unwrap_or_default(),
        active: true,
        created_utc: Utc::now(),
    };
    tables.insert_payment_method(method.clone());

    let group_id = tables
        .billing_group_by_no(billing_group_no)
        .map(|g| g.client_billing_group_id.clone());
    if let Some(group) = group_id.and_then(|id| tables.billing_group_mut(&id)) {
        if make_primary || group.primary_payment_method_no.is_none() {
            group.primary_payment_method_no = Some(payment_method_no);
        }
    }

    info!(
        acct_no = acct_no,
        payment_method_no = payment_method_no,
        billing_group_no = billing_group_no,
        "Payment method added"
    );
    method
}

pub fn add_acct_payment_method(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: AddPaymentMethodRequest,
) -> Result<Reply<Option<AddPaymentMethodBody>>, MockError> {
    let today = Utc::now().date_naive();
    let (acct_no, billing_group_no) = validation::add_payment_method(tables, &req, today)?;

    let method = add_card(
        tables,
        acct_no,
        billing_group_no,
        Some(&req.client_payment_method_id),
        req.pay_method_type,
        &req.card,
        false,
    );

    Ok(Reply::ok(synth.added_payment_method(&method)))
}

pub fn get_acct_payment_methods_and_terms(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetPaymentMethodsRequest,
) -> Result<Reply<PaymentMethodsBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let include_inactive = req.filter_status == Some(FILTER_ALL);
    let limit = req
        .payments_returned
        .filter(|n| *n > 0)
        .map_or(usize::MAX, |n| n as usize);

    let account_payment_methods = tables
        .payment_methods_for(acct_no)
        .into_iter()
        .filter(|m| include_inactive || m.active)
        .take(limit)
        .map(|m| synth.payment_method(m))
        .collect();

    Ok(Reply::ok(PaymentMethodsBody {
        account_payment_methods,
    }))
}

pub fn remove_acct_payment_method(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: RemovePaymentMethodRequest,
) -> Result<Reply<Empty>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    validation::active_payment_method(tables, acct_no, req.payment_method_no)?;

    if let Some(method) = tables.payment_method_mut(acct_no, req.payment_method_no) {
        method.active = false;
    }
    tables.clear_primary_payment_method(acct_no, req.payment_method_no);
    info!(
        acct_no = acct_no,
        payment_method_no = req.payment_method_no,
        "Payment method disabled"
    );

    Ok(Reply::bare())
}

pub fn assign_collections_acct_group(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: AssignCollectionsGroupRequest,
) -> Result<Reply<Empty>, MockError> {
    let account = validation::account(tables, &req.account)?;
    validation::collections_group(account, &req.client_acct_group_id)?;
    let acct_no = account.acct_no;

    if let Some(account) = tables.account_mut(acct_no) {
        account.collections_group_id = Some(req.client_acct_group_id.clone());
    }
    info!(
        acct_no = acct_no,
        group_id = %req.client_acct_group_id,
        "Collections group assigned"
    );

    Ok(Reply::bare())
}

pub fn set_session(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: SetSessionRequest,
) -> Result<Reply<SessionBody>, MockError> {
    let acct_no = validation::session_account(tables, &req)?.acct_no;

    let mut session_id = ids::filler(ids::SESSION_ID_LEN);
    while tables.session(&session_id).is_some() {
        session_id = ids::filler(ids::SESSION_ID_LEN);
    }
    tables.insert_session(Session {
        session_id: session_id.clone(),
        acct_no,
        created_utc: Utc::now(),
    });
    info!(acct_no = acct_no, "Payment session opened");

    Ok(Reply::ok(SessionBody { session_id }))
}
