//! Test harness for generated bins.
//!
//! Builds bins against `MockKernel`, checks them with assertion helpers
//! that explain what went wrong, and renders text reports.
//!
//! # Key Components
//!
//! - [`helpers`]: error type, tracing setup, generation and geometry lookups
//! - [`assertions`]: assertion helpers with diagnostics
//! - [`report`]: structured text description of a bin

pub mod assertions;
pub mod helpers;
pub mod report;

pub use helpers::{build_bin, init_tracing, HarnessError};
pub use report::BinReport;
