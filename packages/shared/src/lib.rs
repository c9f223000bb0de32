//! Shared utilities for the Fanout relay binaries.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: timestamp helpers with a clock abstraction for tests

pub mod logger;
pub mod time;
