//! partnerlink - authenticated session client for the student-partnership API
//!
//! The backend serves partners, projects, contacts, activity notes, and
//! users behind a bearer token that expires. This crate keeps a session
//! alive across that expiry: it signs in with a Google identity token,
//! stores the session, refreshes the bearer token on 401 (once, however
//! many requests fail at the same time), replays the failed requests, and
//! signs out when the refresh is rejected.
//!
//! # Architecture
//!
//! - [`auth`] - Session storage, login/refresh/revoke, single-flight refresh,
//!   session controller
//! - [`api`] - Request pipeline with refresh-and-replay, CRUD resources
//! - [`secrets`] - Secret storage abstraction (file, keychain)
//! - [`core`] - Configuration and storage paths
//! - [`cli`] - Command-line interface
//! - [`ui`] - Output helpers
//!
//! # Invariants
//!
//! 1. At most one refresh is in flight per [`auth::AuthClient`]
//! 2. Every request queued behind a refresh is settled exactly once
//! 3. A request is replayed at most once
//! 4. A rejected refresh always leaves the token store empty
//! 5. Tokens never appear in logs, errors, or debug output

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod secrets;
pub mod ui;
