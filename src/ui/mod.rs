//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All CLI output goes through this module so quiet mode is honored in one
//! place. Tokens are never passed here.

pub mod output;
