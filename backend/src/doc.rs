//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path, the DTO schemas and the session
//! cookie security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::items_dto::{
    ClaimResponse, CreateItemBody, ItemActionBody, ItemResponse, MessageResponse, PartyResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorDetailsSchema, ErrorSchema};
use crate::inbound::http::users::{
    CurrentUserResponse, EnsureUserResponse, LoginRequest, LoginResponse, UserResponse,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
        components.add_security_scheme(
            "IdentityProvider",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus lost and found API",
        description = "Report lost and found items, claim them and notify their owners."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::ensure_current_user,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorDetailsSchema,
        LoginRequest,
        LoginResponse,
        UserResponse,
        CurrentUserResponse,
        EnsureUserResponse,
        CreateItemBody,
        ItemActionBody,
        ItemResponse,
        PartyResponse,
        ClaimResponse,
        MessageResponse
    )),
    tags(
        (name = "users", description = "Login and campus accounts"),
        (name = "items", description = "Lost and found items and claims"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
