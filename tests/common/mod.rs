#![allow(dead_code)]

pub use gob_test_utils::builders;
pub use gob_test_utils::fake_backend;
pub use gob_test_utils::{init_tracing, with_timeout};

/// Owned package list, as the library APIs take it.
pub fn packages(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
