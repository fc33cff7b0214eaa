//! Product catalog: billable services and the usage types they meter.

/// Service types the vendor accepts.
pub const SERVICE_TYPES: &[&str] = &[
    "Usage-Based",
    "Recurring",
    "Activation",
    "Order-Based",
    "Cancellation",
    "Minimum Fee",
];

#[derive(Debug, Clone)]
pub struct Service {
    pub service_no: i64,
    pub client_service_id: String,
    pub service_name: String,
    pub service_type: String,
    pub gl_cd: String,
    pub usage_type_no: Option<i64>,
    pub taxable: bool,
}

#[derive(Debug, Clone)]
pub struct UsageType {
    pub usage_type_no: i64,
    pub usage_type_code: String,
    pub usage_type_name: String,
    pub usage_type_desc: String,
    pub usage_unit_type: String,
}

impl UsageType {
    /// Shape of a usage type the mock invents for an unknown code.
    pub fn with_defaults(usage_type_no: i64, code: &str) -> Self {
        Self {
            usage_type_no,
            usage_type_code: code.to_string(),
            usage_type_name: code.to_string(),
            usage_type_desc: code.to_string(),
            usage_unit_type: "minute".to_string(),
        }
    }
}
