//! Service and usage-type calls.

use super::{FormFields, RestRequest};
use crate::error::MockError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateServiceRequest {
    pub client_service_id: String,
    #[serde(alias = "name")]
    pub service_name: String,
    pub service_type: String,
    pub gl_cd: String,
    pub usage_type: Option<i64>,
    pub taxable_ind: Option<i64>,
}

impl RestRequest for CreateServiceRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            client_service_id: fields.string("client_service_id"),
            service_name: fields
                .str("service_name")
                .or_else(|| fields.str("name"))
                .unwrap_or_default()
                .to_string(),
            service_type: fields.string("service_type"),
            gl_cd: fields.string("gl_cd"),
            usage_type: fields.int("usage_type")?,
            taxable_ind: fields.int("taxable_ind")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetServiceDetailsRequest {
    pub client_service_id: String,
}

impl RestRequest for GetServiceDetailsRequest {}

/// Body of `create_usage_type_m` and `update_usage_type_m`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsageTypeRequest {
    pub usage_type_code: String,
    pub usage_type_name: Option<String>,
    #[serde(alias = "usage_type_description")]
    pub usage_type_desc: Option<String>,
    pub usage_unit_type: Option<String>,
}

impl RestRequest for UsageTypeRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            usage_type_code: fields.string("usage_type_code"),
            usage_type_name: fields.str("usage_type_name").map(str::to_string),
            usage_type_desc: fields
                .str("usage_type_desc")
                .or_else(|| fields.str("usage_type_description"))
                .map(str::to_string),
            usage_unit_type: fields.str("usage_unit_type").map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GetUsageTypeDetailsRequest {
    pub usage_type_code: String,
}

impl RestRequest for GetUsageTypeDetailsRequest {
    fn from_form(fields: &FormFields) -> Result<Self, MockError> {
        Ok(Self {
            usage_type_code: fields.string("usage_type_code"),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceNoBody {
    pub service_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetailsBody {
    pub service_no: i64,
    pub client_service_id: String,
    pub service_name: String,
    pub service_type: String,
    pub gl_cd: String,
    pub usage_type_no: Option<i64>,
    pub taxable_ind: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageTypeNoBody {
    pub usage_type_no: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageTypeDetailsBody {
    pub usage_type_no: i64,
    pub usage_type_code: String,
    pub usage_type_name: String,
    pub usage_type_desc: String,
    pub usage_unit_type: String,
}
