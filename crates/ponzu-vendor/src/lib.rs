//! # ponzu-vendor
//!
//! Filesystem side of the build pipeline.
//!
//! Handles:
//! - **Merging**: Clearing a destination and mirroring a source tree into it,
//!   reporting files that would be overwritten.
//! - **Assembly**: Composing the content and addon merges into the vendor
//!   tree the compiler reads.
//! - **Package identity**: Resolving the importable path of the project
//!   from its location under the workspace root.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod assemble;
pub mod merge;
pub mod package;
