//! HTTP handlers for billing-mock.
//!
//! Vendor operations are plain functions over the locked entity tables; the
//! dispatcher binds them to the two vendor endpoints.

pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod credits;
pub mod dispatch;
pub mod groups;
pub mod health;
pub mod payments;
pub mod plans;

pub use dispatch::vendor_call;
pub use health::{health_check, metrics_handler, readiness_check};
