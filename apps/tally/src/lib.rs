//! # Tally - Cart Calculator
//!
//! Library surface of the Tally binary: the standard rule set, the
//! file-backed providers, app configuration and the CLI plumbing.
//!
//! The pipeline engine itself lives in `tally-core`; everything in this
//! crate is a caller of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod observe;
pub mod providers;
pub mod rules;
