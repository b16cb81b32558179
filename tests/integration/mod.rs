//! Integration test suite for showyourwork
//!
//! End-to-end tests of the configuration pipeline against throwaway article
//! repositories, through the library API and through the `syw` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: template rendering and overlay merge
//! - **resolve**: defaults, validation, persistence and per-run refresh
//! - **dependencies**: closures over configured dependency maps
//! - **cli**: the `syw` binary

mod cli;
mod dependencies;
mod render;
mod resolve;
