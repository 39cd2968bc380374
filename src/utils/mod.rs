//! Shared helpers.

pub mod exec;
pub mod hash;
