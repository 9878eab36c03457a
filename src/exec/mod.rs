// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for building the target packages and running
//! the resulting binaries, using `tokio::process::Command`.
//!
//! - [`builder`] runs `go build -o <build_dir>/<name> <package>`.
//! - [`runner`] starts and stops the built binaries.
//! - [`backend`] provides the `ProcessBackend` trait and a concrete
//!   `RealProcessBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod builder;
pub mod runner;

pub use backend::{ProcessBackend, RealProcessBackend};
