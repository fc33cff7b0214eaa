//! Vendor-style error envelope.
//!
//! Every failure of a vendor call is reported in-band: HTTP 200 with a body
//! of `{ "error_code": <code>, "error_msg": <text> }`.

use serde::Serialize;
use thiserror::Error;

pub const CODE_OK: i64 = 0;
pub const MSG_OK: &str = "OK";

pub const CODE_DECODE: i64 = 1001;
pub const CODE_SESSION: i64 = 1002;
pub const CODE_INVALID_VALUE: i64 = 1004;
pub const CODE_DOES_NOT_EXIST: i64 = 1009;
pub const CODE_ALREADY_ASSIGNED: i64 = 12004;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("unmarshalling error: {0}")]
    Decode(String),

    #[error("{0}")]
    SessionRejected(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    DoesNotExist(String),

    #[error("{0}")]
    AlreadyAssigned(String),
}

impl MockError {
    pub fn decode(detail: impl Into<String>) -> Self {
        MockError::Decode(detail.into())
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        MockError::InvalidValue(detail.into())
    }

    pub fn missing(detail: impl Into<String>) -> Self {
        MockError::DoesNotExist(detail.into())
    }

    pub fn in_use(field: &str, value: &str) -> Self {
        MockError::InvalidValue(format!("{} {} already in use", field, value))
    }

    pub fn code(&self) -> i64 {
        match self {
            MockError::Decode(_) => CODE_DECODE,
            MockError::SessionRejected(_) => CODE_SESSION,
            MockError::InvalidValue(_) => CODE_INVALID_VALUE,
            MockError::DoesNotExist(_) => CODE_DOES_NOT_EXIST,
            MockError::AlreadyAssigned(_) => CODE_ALREADY_ASSIGNED,
        }
    }

    pub fn envelope(&self) -> Envelope {
        Envelope {
            error_code: self.code(),
            error_msg: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for MockError {
    fn from(err: serde_json::Error) -> Self {
        MockError::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for MockError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errs.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        MockError::InvalidValue(format!("invalid value for {}", fields.join(", ")))
    }
}

/// The `{error_code, error_msg}` pair every response carries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Envelope {
    pub error_code: i64,
    pub error_msg: String,
}

impl Envelope {
    pub fn ok() -> Self {
        Self {
            error_code: CODE_OK,
            error_msg: MSG_OK.to_string(),
        }
    }
}

/// Last-resort body when a response cannot be serialized.
pub fn fallback_body(err: &dyn std::fmt::Display) -> Vec<u8> {
    let detail = err.to_string().replace(['"', '\\'], "'");
    format!(
        "{{\"error_code\":{},\"error_msg\":\"unable to encode response: {}\"}}",
        CODE_DECODE, detail
    )
    .into_bytes()
}
