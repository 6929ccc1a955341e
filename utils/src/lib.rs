//! Shared utilities for the SVRP crates.

pub mod logging;
pub mod time;

pub use logging::{init_json_tracing, init_tracing, init_tracing_with_level, try_init_test_tracing};
pub use time::format_window;
