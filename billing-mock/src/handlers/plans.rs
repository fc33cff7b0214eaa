//! Plan catalog and plan assignment operations.

use crate::dtos::plans::{
    AcctPlan, AcctPlansAllBody, AcctPlansBody, AssignAcctPlanRequest, ClientPlansAllBody,
    DeletePlansBody, DeletePlansRequest, GetAcctPlansRequest, GetClientPlanServiceRatesRequest,
    GetClientPlansAllRequest, GetPlanDetailsRequest, PlanDetailsBody, PlanInstanceBody,
    PlanNoBody, PlanRequest, ServiceRatesBody, ServiceSpec, SupplementalObjField,
};
use crate::dtos::Reply;
use crate::error::MockError;
use crate::models::{Plan, PlanAssignment, PlanService, RateTier, Service};
use crate::services::synthesizer::service_rates;
use crate::services::validation;
use crate::services::{Synthesizer, Tables};
use chrono::Utc;
use tracing::info;

const DEFAULT_PLAN_UNITS: i64 = 1;
const DEFAULT_PLAN_STATUS_CD: i64 = 1;

pub fn create_new_plan(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: PlanRequest,
) -> Result<Reply<PlanNoBody>, MockError> {
    validation::create_plan(tables, &req)?;

    let plan_no = tables.next_plan_no();
    let services = register_plan_services(tables, &req.client_plan_id, &req.service);
    tables.insert_plan(Plan {
        plan_no,
        client_plan_id: req.client_plan_id.clone(),
        plan_name: req.plan_name.clone(),
        plan_type: req.plan_type,
        currency: req.currency.to_lowercase(),
        description: req.plan_description,
        active: req.active != Some(0),
        services,
        supplemental_fields: supplemental_fields(req.supplemental_obj_field),
        created_utc: Utc::now(),
    });
    info!(
        plan_no = plan_no,
        client_plan_id = %req.client_plan_id,
        plan_name = %req.plan_name,
        "Plan created"
    );

    Ok(Reply::ok(PlanNoBody { plan_no }))
}

/// Resolve each plan service to a catalog service, creating the ones the
/// catalog does not know yet.
fn register_plan_services(
    tables: &mut Tables,
    client_plan_id: &str,
    specs: &[ServiceSpec],
) -> Vec<PlanService> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let client_service_id = if spec.client_service_id.is_empty() {
                format!("{}.service{}", client_plan_id, idx + 1)
            } else {
                spec.client_service_id.clone()
            };

            let known = tables
                .service(&client_service_id)
                .or_else(|| tables.service_by_name_and_type(&spec.name, &spec.service_type))
                .map(|s| (s.service_no, s.client_service_id.clone()));
            let (service_no, client_service_id) = match known {
                Some(found) => found,
                None => {
                    let service_no = tables.next_service_no();
                    tables.insert_service(Service {
                        service_no,
                        client_service_id: client_service_id.clone(),
                        service_name: if spec.name.is_empty() {
                            client_service_id.clone()
                        } else {
                            spec.name.clone()
                        },
                        service_type: spec.service_type.clone(),
                        gl_cd: spec.gl_cd.clone(),
                        usage_type_no: spec.usage_type,
                        taxable: spec.taxable_ind.unwrap_or(0) != 0,
                    });
                    info!(
                        service_no = service_no,
                        client_service_id = %client_service_id,
                        "Service registered from plan"
                    );
                    (service_no, client_service_id)
                }
            };

            PlanService {
                service_no,
                client_service_id,
                rate_type: spec.rate_type.clone(),
                tiers: spec
                    .tier
                    .iter()
                    .flat_map(|tier| tier.schedule.iter())
                    .map(|s| RateTier {
                        from: s.from,
                        to: s.to,
                        amount: s.amount,
                    })
                    .collect(),
            }
        })
        .collect()
}

fn supplemental_fields(fields: Vec<SupplementalObjField>) -> Vec<(String, Vec<String>)> {
    fields
        .into_iter()
        .filter(|f| !f.field_name.is_empty())
        .map(|f| (f.field_name, f.field_value))
        .collect()
}

pub fn edit_plan(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: PlanRequest,
) -> Result<Reply<PlanNoBody>, MockError> {
    let plan_no = validation::edit_plan(tables, &req)?.plan_no;

    if req.active == Some(0) {
        tables.mark_plan_inactive(&req.client_plan_id);
        info!(plan_no = plan_no, client_plan_id = %req.client_plan_id, "Plan deactivated");
        return Ok(Reply::ok(PlanNoBody { plan_no }));
    }

    let services = if req.service.is_empty() {
        None
    } else {
        Some(register_plan_services(
            tables,
            &req.client_plan_id,
            &req.service,
        ))
    };

    if let Some(plan) = tables.plan_mut(&req.client_plan_id) {
        if !req.plan_type.is_empty() {
            plan.plan_type = req.plan_type;
        }
        if !req.currency.is_empty() {
            plan.currency = req.currency.to_lowercase();
        }
        if req.plan_description.is_some() {
            plan.description = req.plan_description;
        }
        if let Some(services) = services {
            plan.services = services;
        }
        if !req.supplemental_obj_field.is_empty() {
            plan.supplemental_fields = supplemental_fields(req.supplemental_obj_field);
        }
        if req.active.is_some() {
            plan.active = true;
        }
    }
    info!(plan_no = plan_no, client_plan_id = %req.client_plan_id, "Plan updated");

    Ok(Reply::ok(PlanNoBody { plan_no }))
}

pub fn delete_plans(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: DeletePlansRequest,
) -> Result<Reply<DeletePlansBody>, MockError> {
    validation::delete_plans(tables, &req.plan_nos)?;

    for plan_no in &req.plan_nos {
        tables.remove_plan_by_no(*plan_no);
    }
    info!(count = req.plan_nos.len(), plan_nos = ?req.plan_nos, "Plans deleted");

    Ok(Reply::ok(DeletePlansBody {
        plan_nos: req.plan_nos,
    }))
}

pub fn get_plan_details(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetPlanDetailsRequest,
) -> Result<Reply<PlanDetailsBody>, MockError> {
    let plan = validation::plan(tables, &req.client_plan_id, req.plan_no)?;
    Ok(Reply::ok(synth.plan_details(tables, plan)))
}

pub fn get_client_plans_all(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetClientPlansAllRequest,
) -> Result<Reply<ClientPlansAllBody>, MockError> {
    let wanted = req.client_plan_id.as_deref().filter(|id| !id.is_empty());
    if let Some(id) = wanted {
        validation::active_plan(tables, id)?;
    }

    let all_client_plan_dtls = tables
        .active_plans()
        .filter(|p| wanted.map_or(true, |id| p.client_plan_id == id))
        .map(|p| synth.client_plan(tables, p))
        .collect();

    Ok(Reply::ok(ClientPlansAllBody {
        all_client_plan_dtls,
    }))
}

pub fn get_client_plan_service_rates(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetClientPlanServiceRatesRequest,
) -> Result<Reply<Option<ServiceRatesBody>>, MockError> {
    let plan = validation::plan(tables, &req.client_plan_id, None)?;
    let service = plan
        .services
        .iter()
        .find(|s| s.client_service_id == req.client_service_id)
        .ok_or_else(|| {
            MockError::missing(format!(
                "client_service_id {} does not belong to client_plan_id {}",
                req.client_service_id, req.client_plan_id
            ))
        })?;

    Ok(Reply::ok(synth.strict(|| ServiceRatesBody {
        plan_service_rates: service_rates(plan, service),
    })))
}

pub fn assign_acct_plan(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: AssignAcctPlanRequest,
) -> Result<Reply<PlanInstanceBody>, MockError> {
    let (acct_no, plan_no, client_plan_id, billing_group_no, dunning_group_no) = {
        let target = validation::assign_plan(tables, &req)?;
        (
            target.acct_no,
            target.plan.plan_no,
            target.plan.client_plan_id.clone(),
            target.billing_group_no,
            target.dunning_group_no,
        )
    };
    let billing_group_no = billing_group_no.or_else(|| {
        tables
            .billing_groups_for(acct_no)
            .first()
            .map(|g| g.billing_group_no)
    });
    let dunning_group_no = dunning_group_no.or_else(|| {
        tables
            .dunning_groups_for(acct_no)
            .first()
            .map(|g| g.dunning_group_no)
    });

    let plan_instance_no = tables.next_plan_instance_no();
    let client_plan_instance_id = if req.client_plan_instance_id.is_empty() {
        format!("{}.{}", client_plan_id, plan_instance_no)
    } else {
        req.client_plan_instance_id
    };
    tables.insert_assignment(PlanAssignment {
        plan_instance_no,
        client_plan_instance_id,
        acct_no,
        plan_no,
        client_plan_id: client_plan_id.clone(),
        status_cd: req.plan_status_cd.unwrap_or(DEFAULT_PLAN_STATUS_CD),
        units: req.plan_units.unwrap_or(DEFAULT_PLAN_UNITS),
        billing_group_no,
        dunning_group_no,
        assigned_utc: Utc::now(),
    });
    info!(
        acct_no = acct_no,
        plan_instance_no = plan_instance_no,
        client_plan_id = %client_plan_id,
        "Plan assigned"
    );

    Ok(Reply::ok(PlanInstanceBody { plan_instance_no }))
}

pub fn get_acct_plans_all(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetAcctPlansRequest,
) -> Result<Reply<AcctPlansAllBody>, MockError> {
    let all_acct_plans_m = acct_plans(tables, synth, &req)?;
    Ok(Reply::ok(AcctPlansAllBody { all_acct_plans_m }))
}

pub fn get_acct_plans(
    tables: &mut Tables,
    synth: &Synthesizer,
    req: GetAcctPlansRequest,
) -> Result<Reply<AcctPlansBody>, MockError> {
    let acct_plans_m = acct_plans(tables, synth, &req)?;
    Ok(Reply::ok(AcctPlansBody { acct_plans_m }))
}

fn acct_plans(
    tables: &Tables,
    synth: &Synthesizer,
    req: &GetAcctPlansRequest,
) -> Result<Vec<AcctPlan>, MockError> {
    let acct_no = validation::account(tables, &req.account)?.acct_no;
    let filter = req.plan_filter();

    Ok(tables
        .assignments_for(acct_no)
        .into_iter()
        .filter(|a| filter.is_empty() || filter.contains(&a.client_plan_id.as_str()))
        .map(|a| synth.acct_plan(tables, a))
        .collect())
}
