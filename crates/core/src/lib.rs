//! `aggate-core` — wire-level building blocks shared by the gateway crates.
//!
//! This crate contains **pure** primitives (no HTTP framework, no IO): the
//! error catalog, the response envelope and pagination arithmetic.

pub mod envelope;
pub mod error;
pub mod pagination;

pub use envelope::Envelope;
pub use error::ApiError;
pub use pagination::{PageInfo, PaginationParams};
