//! Campus lost and found service.
//!
//! Hexagonal layout: [`domain`] holds the item lifecycle, ports and services;
//! [`inbound`] adapts HTTP onto the driving ports; [`outbound`] provides
//! PostgreSQL, in-memory and email adapters for the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
