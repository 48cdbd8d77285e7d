//! Retry module
//! - policy.rs: policy-based retries for provider calls

pub mod policy;

pub use policy::*;
