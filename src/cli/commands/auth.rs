//! cli::commands::auth
//!
//! Sign in, sign out, and session inspection.
//!
//! # Design
//!
//! - The identity token and bearer token are NEVER printed
//! - `status` reads local state only; `whoami` asks the backend
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for the identity token)
//! partnerlink auth login
//!
//! # Non-interactive
//! partnerlink auth login --id-token "$GOOGLE_ID_TOKEN"
//!
//! # Machine-readable status
//! partnerlink -q auth status
//! ```

use std::io::{self, Write};

use anyhow::{bail, Context as _, Result};

use super::{block_on, Context, Services};
use crate::auth::AuthError;
use crate::ui::output::{self, Verbosity};

/// Exchange an identity token for a backend session.
pub fn login(ctx: &Context, id_token: Option<&str>) -> Result<()> {
    let token = identity_token(ctx, id_token)?;
    let services = Services::connect(ctx)?;

    let session = block_on(services.run(async {
        services
            .auth
            .login(&token)
            .await
            .context("Sign-in failed")
    }))??;

    if !services.controller.is_authenticated() {
        bail!("Signed in, but the session could not be read back from the secret store.");
    }

    match session.user_id {
        Some(id) => output::success(format!("Signed in as user {}.", id), ctx.verbosity),
        None => output::success("Signed in.", ctx.verbosity),
    }
    Ok(())
}

/// Revoke the session and clear stored credentials.
pub fn logout(ctx: &Context) -> Result<()> {
    let services = Services::connect(ctx)?;
    block_on(services.run(async {
        services
            .auth
            .logout()
            .await
            .context("Failed to clear stored session")
    }))??;

    output::success("Signed out.", ctx.verbosity);
    Ok(())
}

/// Show whether a session is stored. Does not contact the backend.
pub fn status(ctx: &Context) -> Result<()> {
    let services = Services::connect(ctx)?;
    let session = block_on(async {
        services.controller.startup().await;
        services.auth.store().get().await
    })?
    .context("Failed to read stored session")?;

    if ctx.verbosity == Verbosity::Quiet {
        // Machine-readable output
        if session.is_authenticated() {
            println!("authenticated");
        } else {
            println!("not_authenticated");
        }
    } else if session.is_authenticated() {
        match session.user_id {
            Some(id) => println!("Signed in as user {} at {}.", id, ctx.config.api_base_url()),
            None => println!("Signed in at {}.", ctx.config.api_base_url()),
        }
    } else {
        println!("Not signed in.");
        println!("Run 'partnerlink auth login' to sign in.");
    }

    Ok(())
}

/// Print the signed-in user's profile.
pub fn whoami(ctx: &Context) -> Result<()> {
    let services = Services::connect(ctx)?;
    let profile = block_on(services.run(async {
        if !services.controller.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }
        services
            .resources
            .current_user()
            .await
            .context("Failed to fetch profile")
    }))??;

    output::record(&profile);
    Ok(())
}

/// Get the identity token from the argument or a masked prompt.
fn identity_token(ctx: &Context, arg: Option<&str>) -> Result<String> {
    let token = match arg {
        Some(t) => t.to_string(),
        None => {
            if !ctx.interactive {
                bail!("Identity token required. Use --id-token <TOKEN> or run interactively.");
            }
            print!("Google identity token: ");
            io::stdout().flush()?;
            rpassword::read_password().context("Failed to read identity token")?
        }
    };

    validate_identity_token(&token)?;
    Ok(token)
}

/// Basic shape checks. The backend does the real validation.
fn validate_identity_token(token: &str) -> Result<()> {
    if token.is_empty() {
        bail!("Identity token cannot be empty.");
    }
    if token.chars().any(char::is_whitespace) {
        bail!("Identity token should not contain whitespace.");
    }
    Ok(())
}
