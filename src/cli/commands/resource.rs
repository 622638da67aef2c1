//! cli::commands::resource
//!
//! CRUD on partners, projects, contacts, and activities.

use anyhow::{Context as _, Result};
use serde_json::Value;

use super::{block_on, Context, Services};
use crate::cli::args::ResourceAction;
use crate::ui::output;

/// Run a resource subcommand and print the backend's response.
pub fn resource(ctx: &Context, action: ResourceAction) -> Result<()> {
    // Parse bodies before touching the network.
    let body = match &action {
        ResourceAction::Create { data, .. } | ResourceAction::Update { data, .. } => {
            Some(parse_body(data)?)
        }
        _ => None,
    };

    let services = Services::connect(ctx)?;
    let api = &services.resources;

    let result = block_on(services.run(async {
        let value = match action {
            ResourceAction::List { kind } => api.list(kind).await,
            ResourceAction::Get { kind, id } => api.get(kind, id).await,
            ResourceAction::Create { kind, .. } => {
                api.create(kind, body.unwrap_or(Value::Null)).await
            }
            ResourceAction::Update { kind, id, .. } => {
                api.update(kind, id, body.unwrap_or(Value::Null)).await
            }
            ResourceAction::Delete { kind, id } => api.delete(kind, id).await,
            ResourceAction::ActivitiesFor { partner_id } => {
                api.activities_for_partner(partner_id).await
            }
        };
        value.context("Request failed")
    }))??;

    output::record(&result);
    Ok(())
}

/// Parse a `--data` argument.
fn parse_body(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_body_accepts_objects() {
        let body = parse_body(r#"{"name":"Acme","city":"Zagreb"}"#).unwrap();
        assert_eq!(body["name"], "Acme");
    }

    #[test]
    fn parse_body_rejects_garbage() {
        let err = parse_body("{name: Acme").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
