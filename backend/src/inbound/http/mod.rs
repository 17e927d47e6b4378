//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate requests into calls on the driving ports held by
//! [`state::HttpState`] and map domain errors onto HTTP responses.

pub mod auth;
pub mod error;
pub mod health;
pub mod items;
pub mod items_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
