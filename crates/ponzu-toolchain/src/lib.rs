//! External tool invocation for the ponzu build pipeline.
//!
//! Every external program (compiler, container runtime, custom dependency
//! command) is launched through the [`ProcessRunner`](process::ProcessRunner)
//! capability so the pipeline can be driven by a fake in tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod compile;
pub mod container;
pub mod image;
pub mod pipeline;
pub mod process;
