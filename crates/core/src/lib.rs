//! `stocktake-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! item code normalization, the domain error model and the aggregate contract.

pub mod aggregate;
pub mod code;
pub mod error;
pub mod value_object;

pub use aggregate::Aggregate;
pub use code::{CodeSource, ItemCode, DECODER_MIN_LEN, DECODER_PREFIX};
pub use error::{DomainError, DomainResult};
pub use value_object::ValueObject;
