//! Wire types for the vendor API.
//!
//! Requests decode from JSON, or from a flattened form for the calls that
//! implement [`RestRequest::from_form`]. Missing fields default to empty so
//! the vendor's own in-band rules decide what is acceptable; only a body
//! that cannot be read at all, or a field of the wrong type, is a decode
//! error.

pub mod accounts;
pub mod catalog;
pub mod credits;
pub mod form;
pub mod payments;
pub mod plans;

use crate::error::{Envelope, MockError};
use crate::models::AccountRef;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use form::FormFields;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A decoded request body, before it is bound to a typed request.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Form(FormFields),
}

impl Payload {
    pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<Self, MockError> {
        let is_form = content_type
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        if is_form {
            return FormFields::parse(body).map(Payload::Form);
        }

        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => Ok(Payload::Json(value)),
            _ => Err(MockError::decode("request body must be a JSON object")),
        }
    }

    /// The operation name carried in the body.
    pub fn rest_call(&self) -> Result<String, MockError> {
        let name = match self {
            Payload::Json(value) => value.get("rest_call").and_then(Value::as_str),
            Payload::Form(fields) => fields.str("rest_call"),
        };
        name.map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| MockError::decode("missing rest_call"))
    }

    pub fn into_request<T: RestRequest>(self) -> Result<T, MockError> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Form(fields) => T::from_form(&fields),
        }
    }
}

/// A typed vendor request.
pub trait RestRequest: DeserializeOwned {
    /// Bind a flattened form body. Only legacy admin calls accept forms.
    fn from_form(_fields: &FormFields) -> Result<Self, MockError> {
        Err(MockError::decode(
            "form-encoded body is not accepted for this call",
        ))
    }
}

/// Success response: the OK envelope with the operation's fields beside it.
#[derive(Debug, Clone, Serialize)]
pub struct Reply<T> {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Reply<T> {
    pub fn ok(body: T) -> Self {
        Self {
            envelope: Envelope::ok(),
            body,
        }
    }
}

/// Body of a call that answers with the envelope alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Empty {}

impl Reply<Empty> {
    pub fn bare() -> Self {
        Reply::ok(Empty {})
    }
}

/// Account addressing shared by most core calls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountTarget {
    pub acct_no: Option<i64>,
    #[serde(alias = "client_account_id")]
    pub client_acct_id: Option<String>,
}

impl AccountTarget {
    pub fn account_ref(&self) -> AccountRef<'_> {
        AccountRef::new(self.acct_no, self.client_acct_id.as_deref())
    }
}
