//! core
//!
//! Configuration and storage locations.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for partnerlink storage

pub mod config;
pub mod paths;
