//! SOFIPO-WATCH — CONDUSEF credit-portfolio monitor.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod extract;
pub mod fetch;
pub mod scan;
pub mod report;
pub mod storage;
pub mod notify;
