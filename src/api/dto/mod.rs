//! Data Transfer Objects for REST request/response serialization.
//!
//! Decimal quantities are serialized as JSON strings to avoid precision
//! loss; absent upstream values are serialized as `null`.

pub mod stats_dto;

pub use stats_dto::*;
