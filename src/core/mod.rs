//! Core types shared by every part of showyourwork.
//!
//! Currently this is the error model: [`SywError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting them on the
//! command line.

pub mod error;

pub use error::{ErrorContext, SywError, user_friendly_error};
