//! HTTP handlers.

pub mod admin;
pub use admin::*;
