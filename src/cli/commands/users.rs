//! cli::commands::users
//!
//! Read-only access to backend users.

use anyhow::{Context as _, Result};

use super::{block_on, Context, Services};
use crate::cli::args::UsersAction;
use crate::ui::output;

/// Run a users subcommand.
pub fn users(ctx: &Context, action: UsersAction) -> Result<()> {
    let services = Services::connect(ctx)?;
    let api = &services.resources;

    let result = block_on(services.run(async {
        let value = match action {
            UsersAction::List => api.users().await,
            UsersAction::Get { id } => api.user(id).await,
        };
        value.context("Request failed")
    }))??;

    output::record(&result);
    Ok(())
}
