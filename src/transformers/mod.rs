//! Transformers layer
//!
//! Converts decoded provider payloads into the unified result type. Each
//! provider module under `providers` implements [`ResponseTransformer`]
//! for its own response shape.

pub mod response;

pub use response::ResponseTransformer;
