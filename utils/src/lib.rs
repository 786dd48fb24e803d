//! Shared utilities for the pollscan auditor.

pub mod logging;

pub use logging::init_tracing;
