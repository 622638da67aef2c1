//! api::resources
//!
//! Typed routes for the backend's CRUD resources.
//!
//! Bodies are opaque JSON; the backend owns their shape.
//!
//! | resource | prefix       |
//! |----------|--------------|
//! | Partner  | `/EPartner`  |
//! | Project  | `/Project`   |
//! | Contact  | `/Contact`   |
//! | Activity | `/EActivity` |
//!
//! Each prefix serves `ReadAll`, `Read/{id}`, `Create`, `Update/{id}` and
//! `Delete/{id}`. Activities also serve `ReadByPartnerId/{partnerId}`.
//! Users are read-only under `/User`.

use std::fmt;

use serde_json::Value;

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::ApiRequest;

/// A CRUD resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Resource {
    /// Partner companies.
    #[value(alias = "partners")]
    Partner,
    /// Projects.
    #[value(alias = "projects")]
    Project,
    /// Contact people.
    #[value(alias = "contacts")]
    Contact,
    /// Activity notes.
    #[value(alias = "activities")]
    Activity,
}

impl Resource {
    /// Every resource kind.
    pub const ALL: [Resource; 4] = [
        Resource::Partner,
        Resource::Project,
        Resource::Contact,
        Resource::Activity,
    ];

    /// Route prefix on the backend.
    pub fn prefix(self) -> &'static str {
        match self {
            Resource::Partner => "/EPartner",
            Resource::Project => "/Project",
            Resource::Contact => "/Contact",
            Resource::Activity => "/EActivity",
        }
    }

    fn route(self, action: &str) -> String {
        format!("{}/{}", self.prefix(), action)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Partner => "partner",
            Resource::Project => "project",
            Resource::Contact => "contact",
            Resource::Activity => "activity",
        };
        f.write_str(name)
    }
}

/// CRUD client over the request pipeline.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    api: ApiClient,
}

impl ResourceClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Underlying pipeline.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `GET {prefix}/ReadAll`
    pub async fn list(&self, resource: Resource) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::get(resource.route("ReadAll")))
            .await
    }

    /// `GET {prefix}/Read/{id}`
    pub async fn get(&self, resource: Resource, id: u64) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::get(resource.route(&format!("Read/{}", id))))
            .await
    }

    /// `POST {prefix}/Create`
    pub async fn create(&self, resource: Resource, body: Value) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::post(resource.route("Create"), body))
            .await
    }

    /// `PUT {prefix}/Update/{id}`
    pub async fn update(&self, resource: Resource, id: u64, body: Value) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::put(
                resource.route(&format!("Update/{}", id)),
                body,
            ))
            .await
    }

    /// `DELETE {prefix}/Delete/{id}`
    pub async fn delete(&self, resource: Resource, id: u64) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::delete(
                resource.route(&format!("Delete/{}", id)),
            ))
            .await
    }

    /// Activities recorded against one partner.
    pub async fn activities_for_partner(&self, partner_id: u64) -> Result<Value, ApiError> {
        let path = Resource::Activity.route(&format!("ReadByPartnerId/{}", partner_id));
        self.api.send_json(&ApiRequest::get(path)).await
    }

    /// `GET /User`
    pub async fn users(&self) -> Result<Value, ApiError> {
        self.api.send_json(&ApiRequest::get("/User")).await
    }

    /// `GET /User/{id}`
    pub async fn user(&self, id: u64) -> Result<Value, ApiError> {
        self.api
            .send_json(&ApiRequest::get(format!("/User/{}", id)))
            .await
    }

    /// Profile of the signed-in user (`GET /Auth/Me`).
    pub async fn current_user(&self) -> Result<Value, ApiError> {
        self.api.send_json(&ApiRequest::get("/Auth/Me")).await
    }
}
