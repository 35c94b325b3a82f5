//! Formly backend library: accounts, form authoring, public submissions and
//! result aggregation behind an actix-web REST API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{DashboardGate, Trace};
