//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Builds the session stack ([`Services`])
//! 3. Runs the async work on a tokio runtime
//! 4. Formats and displays output
//!
//! # Refresh Cookie Across Invocations
//!
//! The backend's refresh credential is an HTTP-only cookie. A library user
//! keeps one `reqwest::Client` alive, but each CLI invocation is a fresh
//! process. [`Services`] therefore seeds the cookie jar from the secret store
//! on startup and writes it back when the command finishes. The entry is
//! removed whenever the session ends up signed out.

mod auth;
mod completion;
mod config_cmd;
mod resource;
mod users;

pub use auth::{login, logout, status, whoami};
pub use completion::completion;
pub use config_cmd::{set_api_url, show as config_show};
pub use resource::resource;
pub use users::users;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use tracing::debug;

use crate::api::{build_http_client_with_jar, ApiClient, ResourceClient};
use crate::auth::{AuthClient, SecretTokenStore, SessionController, TokenStore};
use crate::cli::args::{AuthAction, Command, ConfigAction};
use crate::core::config::Config;
use crate::secrets::{self, SecretStore};
use crate::ui::output::Verbosity;

/// Secret key for the persisted refresh cookie header.
pub const REFRESH_COOKIE_KEY: &str = "http.refresh_cookies";

/// Path whose cookies are persisted (the refresh endpoint).
const REFRESH_PATH: &str = "/Auth/Refresh";

/// Resolved invocation context.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration (file, env, and flags applied).
    pub config: Config,
    /// Output verbosity.
    pub verbosity: Verbosity,
    /// Whether prompts may be shown.
    pub interactive: bool,
}

/// The session stack for one invocation.
pub struct Services {
    pub auth: Arc<AuthClient>,
    pub resources: ResourceClient,
    pub controller: Arc<SessionController>,
    secrets: Arc<dyn SecretStore>,
    jar: Arc<Jar>,
    refresh_url: Url,
}

impl Services {
    /// Build the stack from configuration.
    pub fn connect(ctx: &Context) -> Result<Self> {
        let config = &ctx.config;
        let secrets = secrets::create_store(config.secrets_provider())
            .context("Failed to initialize secret store")?;
        let refresh_url = Url::parse(&format!("{}{}", config.api_base_url(), REFRESH_PATH))
            .context("Invalid API base URL")?;

        let jar = Arc::new(Jar::default());
        if let Some(cookies) = secrets
            .get(REFRESH_COOKIE_KEY)
            .context("Failed to read stored cookies")?
        {
            for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &refresh_url);
            }
            debug!("restored refresh cookie");
        }

        let http = build_http_client_with_jar(
            config.user_agent(),
            config.request_timeout(),
            Arc::clone(&jar),
        )?;

        let store: Arc<dyn TokenStore> = Arc::new(SecretTokenStore::new(Arc::clone(&secrets)));
        let auth = Arc::new(
            AuthClient::new(http, config.api_base_url(), Arc::clone(&store))
                .with_refresh_timeout(config.refresh_timeout()),
        );
        let controller = Arc::new(SessionController::new(store));
        auth.add_listener(controller.clone());

        Ok(Self {
            resources: ResourceClient::new(ApiClient::new(Arc::clone(&auth))),
            auth,
            controller,
            secrets,
            jar,
            refresh_url,
        })
    }

    /// Write the refresh cookie back, or drop it when signed out.
    pub async fn persist_cookies(&self) -> Result<()> {
        let signed_in = self.controller.sync().await;
        let header = self
            .jar
            .cookies(&self.refresh_url)
            .and_then(|v| v.to_str().ok().map(str::to_string));

        let secrets = Arc::clone(&self.secrets);
        tokio::task::spawn_blocking(move || match header {
            Some(cookies) if signed_in => secrets.set(REFRESH_COOKIE_KEY, &cookies),
            _ => secrets.delete(REFRESH_COOKIE_KEY),
        })
        .await
        .context("Cookie persistence task failed")?
        .context("Failed to persist refresh cookie")
    }

    /// Run a command body, then persist cookies whatever the outcome.
    pub async fn run<T, F>(&self, body: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.controller.startup().await;
        let result = body.await;
        let persisted = self.persist_cookies().await;
        let value = result?;
        persisted?;
        Ok(value)
    }
}

/// Run an async command body on a fresh runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    Ok(rt.block_on(future))
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Auth { action } => match action {
            AuthAction::Login { id_token } => auth::login(ctx, id_token.as_deref()),
            AuthAction::Logout => auth::logout(ctx),
            AuthAction::Status => auth::status(ctx),
            AuthAction::Whoami => auth::whoami(ctx),
        },
        Command::Resource { action } => resource::resource(ctx, action),
        Command::Users { action } => users::users(ctx, action),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::SetApiUrl { url } => config_cmd::set_api_url(ctx, &url),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
