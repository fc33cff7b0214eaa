//! Entity records held by the mock's store.

mod account;
mod catalog;
mod credit;
mod group;
mod payment;
mod plan;

pub use account::{Account, AccountRef, SuppField, ACCOUNT_STATUS_CODES};
pub use catalog::{Service, UsageType, SERVICE_TYPES};
pub use credit::Credit;
pub use group::{BillingGroup, DunningGroup};
pub use payment::{PaymentMethod, Session};
pub use plan::{
    is_known_currency, PlanAssignment, Plan, PlanService, RateTier, PLAN_TYPES,
};
