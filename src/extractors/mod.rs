//! Request extractors.

pub mod payload;
