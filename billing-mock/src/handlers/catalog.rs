//! Service and usage-type operations.

use crate::dtos::catalog::{
    CreateServiceRequest, GetServiceDetailsRequest, GetUsageTypeDetailsRequest,
    ServiceDetailsBody, ServiceNoBody, UsageTypeDetailsBody, UsageTypeNoBody, UsageTypeRequest,
};
use crate::dtos::Reply;
use crate::error::MockError;
use crate::models::{Service, UsageType};
use crate::services::validation;
use crate::services::{Synthesizer, Tables};
use tracing::info;

pub fn create_service(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: CreateServiceRequest,
) -> Result<Reply<ServiceNoBody>, MockError> {
    validation::create_service(tables, &req)?;

    let service_no = tables.next_service_no();
    tables.insert_service(Service {
        service_no,
        client_service_id: req.client_service_id.clone(),
        service_name: req.service_name,
        service_type: req.service_type,
        gl_cd: req.gl_cd,
        usage_type_no: req.usage_type,
        taxable: req.taxable_ind.unwrap_or(0) != 0,
    });
    info!(
        service_no = service_no,
        client_service_id = %req.client_service_id,
        "Service created"
    );

    Ok(Reply::ok(ServiceNoBody { service_no }))
}

pub fn get_service_details(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: GetServiceDetailsRequest,
) -> Result<Reply<ServiceDetailsBody>, MockError> {
    let service = tables.service(&req.client_service_id).ok_or_else(|| {
        MockError::missing(format!(
            "client_service_id {} does not exist",
            req.client_service_id
        ))
    })?;

    Ok(Reply::ok(ServiceDetailsBody {
        service_no: service.service_no,
        client_service_id: service.client_service_id.clone(),
        service_name: service.service_name.clone(),
        service_type: service.service_type.clone(),
        gl_cd: service.gl_cd.clone(),
        usage_type_no: service.usage_type_no,
        taxable_ind: i64::from(service.taxable),
    }))
}

/// Create-or-update by code. An existing code keeps its number.
pub fn upsert_usage_type(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: UsageTypeRequest,
) -> Result<Reply<UsageTypeNoBody>, MockError> {
    validation::usage_type_code(&req.usage_type_code)?;

    let (mut usage_type, existed) = match tables.usage_type(&req.usage_type_code) {
        Some(existing) => (existing.clone(), true),
        None => (
            UsageType::with_defaults(tables.next_usage_type_no(), &req.usage_type_code),
            false,
        ),
    };
    if let Some(name) = req.usage_type_name.filter(|n| !n.is_empty()) {
        usage_type.usage_type_name = name;
    }
    if let Some(desc) = req.usage_type_desc.filter(|d| !d.is_empty()) {
        usage_type.usage_type_desc = desc;
    }
    if let Some(unit) = req.usage_unit_type.filter(|u| !u.is_empty()) {
        usage_type.usage_unit_type = unit;
    }

    let usage_type_no = usage_type.usage_type_no;
    tables.insert_usage_type(usage_type);
    info!(
        usage_type_no = usage_type_no,
        usage_type_code = %req.usage_type_code,
        updated = existed,
        "Usage type saved"
    );

    Ok(Reply::ok(UsageTypeNoBody { usage_type_no }))
}

/// Unknown codes are created with default fields on first lookup.
pub fn get_usage_type_details(
    tables: &mut Tables,
    _synth: &Synthesizer,
    req: GetUsageTypeDetailsRequest,
) -> Result<Reply<UsageTypeDetailsBody>, MockError> {
    validation::usage_type_code(&req.usage_type_code)?;

    if tables.usage_type(&req.usage_type_code).is_none() {
        let usage_type =
            UsageType::with_defaults(tables.next_usage_type_no(), &req.usage_type_code);
        info!(
            usage_type_no = usage_type.usage_type_no,
            usage_type_code = %req.usage_type_code,
            "Usage type created on lookup"
        );
        tables.insert_usage_type(usage_type);
    }
    let usage_type = tables.usage_type(&req.usage_type_code).ok_or_else(|| {
        MockError::missing(format!(
            "usage_type_code {} does not exist",
            req.usage_type_code
        ))
    })?;

    Ok(Reply::ok(UsageTypeDetailsBody {
        usage_type_no: usage_type.usage_type_no,
        usage_type_code: usage_type.usage_type_code.clone(),
        usage_type_name: usage_type.usage_type_name.clone(),
        usage_type_desc: usage_type.usage_type_desc.clone(),
        usage_unit_type: usage_type.usage_unit_type.clone(),
    }))
}
