//! Shared CLI plumbing.

pub mod context;
pub mod logging;
