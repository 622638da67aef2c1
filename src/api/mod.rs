//! api - backend REST client
//!
//! # Components
//!
//! - [`ApiClient`] - Request pipeline: bearer attachment, refresh-and-replay
//! - [`ApiRequest`] - Replayable request description
//! - [`ResourceClient`] - CRUD routes for partners, projects, contacts,
//!   activities, and users
//!
//! All clients share one `reqwest::Client` built by [`build_http_client`].
//! Its cookie store carries the refresh cookie from login to refresh.

mod client;
mod errors;
mod request;
pub mod resources;

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::Client;

pub use client::ApiClient;
pub use errors::ApiError;
pub use request::ApiRequest;
pub use resources::{Resource, ResourceClient};

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = concat!("partnerlink/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client.
///
/// Cookies are kept in memory for the life of the client.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, ApiError> {
    build_http_client_with_jar(user_agent, timeout, Arc::new(Jar::default()))
}

/// Build the shared HTTP client over a caller-owned cookie jar, so cookies
/// can be inspected or seeded from outside.
pub fn build_http_client_with_jar(
    user_agent: &str,
    timeout: Duration,
    jar: Arc<Jar>,
) -> Result<Client, ApiError> {
    Client::builder()
        .cookie_provider(jar)
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Setup(e.to_string()))
}
