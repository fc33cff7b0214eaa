//! Service credit operations.

use crate::dtos::credits::{
    AcctCreditsRequest, AllCreditsBody, CreateCreditRequest, CreditDetailsBody, CreditIdBody,
    GetCreditDetailsRequest, UnappliedCreditsBody,
};
use crate::dtos::Reply;
use crate::error::MockError;
use crate::models::Credit;
use crate::services::validation;
use crate::services::{Synthesizer, Tables};
use chrono::Utc;
use tracing::info;

const DEFAULT_REASON_CODE: i64 = 1;

pub fn create_advanced_service_credit(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: CreateCreditRequest,
) -> Result<Reply<CreditIdBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    validation::credit_amount(req.amount)?;

    let credit_no = tables.next_credit_no();
    tables.insert_credit(Credit {
        credit_no,
        acct_no,
        amount: req.amount,
        applied_amount: 0.0,
        reason_code: req.reason_code.unwrap_or(DEFAULT_REASON_CODE),
        comments: req.comments.unwrap_or_default(),
        expiry_date: req.credit_expiry_date.filter(|d| !d.is_empty()),
        created_utc: Utc::now(),
    });
    info!(
        acct_no = acct_no,
        credit_no = credit_no,
        amount = req.amount,
        "Service credit created"
    );

    Ok(Reply::ok(CreditIdBody {
        credit_id: credit_no,
    }))
}

/// Strict mode always lists at least one credit, inventing one when the
/// account has none.
pub fn get_acct_credits(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: AcctCreditsRequest,
) -> Result<Reply<Option<AllCreditsBody>>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;

    Ok(Reply::ok(synth.strict(|| {
        let credits = tables.credits_for(acct_no);
        let all_credits = if credits.is_empty() {
            vec![synth.fixture_credit(acct_no)]
        } else {
            credits.into_iter().map(|c| synth.all_credit(c)).collect()
        };
        AllCreditsBody { all_credits }
    })))
}

pub fn get_credit_details(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetCreditDetailsRequest,
) -> Result<Reply<CreditDetailsBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let credit = tables
        .credit(req.credit_no)
        .filter(|c| c.acct_no == acct_no)
        .ok_or_else(|| {
            MockError::missing(format!(
                "credit_no {} does not exist for acct_no {}",
                req.credit_no, acct_no
            ))
        })?;

    Ok(Reply::ok(synth.credit_details(credit)))
}

pub fn get_unapplied_service_credits(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: AcctCreditsRequest,
) -> Result<Reply<UnappliedCreditsBody>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let unapplied_service_credits_details = tables
        .credits_for(acct_no)
        .into_iter()
        .filter(|c| c.unapplied() > 0.0)
        .map(|c| synth.unapplied_credit(c))
        .collect();

    Ok(Reply::ok(UnappliedCreditsBody {
        unapplied_service_credits_details,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseMode;
    use crate::dtos::accounts::CreateAcctCompleteRequest;
    use crate::handlers::accounts::create_acct_complete;

    fn account(tables: &mut Tables, synth: &Synthesizer, client_acct_id: &str) -> i64 {
        let req: CreateAcctCompleteRequest = serde_json::from_value(serde_json::json!({
            "acct": [{"client_acct_id": client_acct_id, "userid": client_acct_id}]
        }))
        .unwrap();
        create_acct_complete(tables, synth, req).unwrap().body.out_acct[0].acct_no
    }

    fn credit(acct_no: i64, amount: f64) -> CreateCreditRequest {
        serde_json::from_value(serde_json::json!({"acct_no": acct_no, "amount": amount})).unwrap()
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let mut tables = Tables::default();
        let synth = Synthesizer::new(ResponseMode::Strict);
        let acct_no = account(&mut tables, &synth, "a");

        let err = create_advanced_service_credit(&mut tables, &synth, credit(acct_no, 0.0))
            .unwrap_err();
        assert_eq!(err.code(), 1004);
        assert!(tables.credits_for(acct_no).is_empty());
    }

    #[test]
    fn strict_listing_invents_a_credit_for_empty_accounts() {
        let mut tables = Tables::default();
        let synth = Synthesizer::new(ResponseMode::Strict);
        let acct_no = account(&mut tables, &synth, "a");

        let req: AcctCreditsRequest =
            serde_json::from_value(serde_json::json!({"acct_no": acct_no})).unwrap();
        let body = get_acct_credits(&mut tables, &synth, req).unwrap().body.unwrap();
        assert_eq!(body.all_credits.len(), 1);
        assert_eq!(body.all_credits[0].out_acct_no, acct_no);
        assert!(tables.credits_for(acct_no).is_empty());
    }

    #[test]
    fn credit_of_another_account_is_not_found() {
        let mut tables = Tables::default();
        let synth = Synthesizer::new(ResponseMode::Loose);
        let owner = account(&mut tables, &synth, "a");
        let other = account(&mut tables, &synth, "b");
        let credit_no = create_advanced_service_credit(&mut tables, &synth, credit(owner, 5.0))
            .unwrap()
            .body
            .credit_id;

        let req: GetCreditDetailsRequest = serde_json::from_value(
            serde_json::json!({"acct_no": other, "credit_no": credit_no}),
        )
        .unwrap();
        assert_eq!(get_credit_details(&mut tables, &synth, req).unwrap_err().code(), 1009);

        let req: AcctCreditsRequest =
            serde_json::from_value(serde_json::json!({"acct_no": owner})).unwrap();
        let body = get_unapplied_service_credits(&mut tables, &synth, req)
            .unwrap()
            .body;
        assert_eq!(body.unapplied_service_credits_details.len(), 1);
        assert_eq!(body.unapplied_service_credits_details[0].amount_left_to_apply, 5.0);
    }
}
