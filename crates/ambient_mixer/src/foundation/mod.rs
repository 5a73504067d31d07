//! Foundation module - utilities shared by the mixer and its backends
//!
//! - Logging setup

pub mod logging;
