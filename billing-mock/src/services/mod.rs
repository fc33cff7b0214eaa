//! Services module for billing-mock.

pub mod ids;
pub mod metrics;
pub mod store;
pub mod synthesizer;
pub mod validation;

pub use metrics::{
    get_metrics, init_metrics, record_error, record_rest_call, record_rest_call_duration,
};
pub use store::{Store, StoreStats, Tables};
pub use synthesizer::Synthesizer;
