//! Utility modules: validation, time helpers, logging bootstrap

pub mod logger;
pub mod time;
pub mod validation;
