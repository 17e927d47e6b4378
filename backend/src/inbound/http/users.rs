//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"asha@klh.edu.in","name":"Asha Rao"}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! POST /api/v1/users/me
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{AuthenticatedIdentity, EmailAddress, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::items_dto::MessageResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
///
/// Sent by the trusted identity provider once it has authenticated the
/// student, together with `Authorization: Bearer <login secret>`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Institutional email address.
    #[schema(example = "asha@klh.edu.in")]
    pub email: String,
    /// Display name from the provider.
    pub name: Option<String>,
    /// Avatar URL from the provider.
    pub image: Option<String>,
}

impl TryFrom<LoginRequest> for AuthenticatedIdentity {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&value.email).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "email", "code": "invalid_email" }))
        })?;
        Ok(Self {
            email,
            name: value.name,
            image: value.image,
        })
    }
}

/// Campus account as returned by the users API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: String,
    /// Institutional email address.
    pub email: String,
    /// Name shown to other students.
    pub display_name: String,
    /// Avatar URL, when the provider supplied one.
    pub image: Option<String>,
    /// RFC 3339 account creation time.
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            display_name: user.display_name().to_string(),
            image: user.image().map(str::to_owned),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Caller's account.
    pub user: UserResponse,
    /// `true` when this login created the account.
    pub created: bool,
}

/// Response from `GET /api/v1/users/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    /// Caller's account.
    pub user: UserResponse,
}

/// Response from `POST /api/v1/users/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnsureUserResponse {
    /// `User created successfully` or `User already exists`.
    pub message: String,
    /// Caller's account.
    pub user: UserResponse,
}

/// Admit an identity and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 401, description = "Identity provider proof missing or wrong", body = ErrorSchema),
        (status = 403, description = "Email domain not allowed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security(("IdentityProvider" = []))
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    request: HttpRequest,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    state.login_policy.verify(&request)?;
    let identity = AuthenticatedIdentity::try_from(payload.into_inner())?;
    let resolved = state.accounts.resolve(identity.clone()).await?;
    session.persist_identity(&identity)?;
    Ok(web::Json(LoginResponse {
        user: resolved.user.into(),
        created: resolved.created,
    }))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(MessageResponse::new("Logged out"))
}

/// Return the caller's account without creating it.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller's account", body = CurrentUserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserResponse>> {
    let identity = session.require_identity()?;
    let user = state
        .accounts
        .find(identity.email)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(web::Json(CurrentUserResponse { user: user.into() }))
}

/// Resolve the caller's account, creating it when absent.
#[utoipa::path(
    post,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller's account", body = EnsureUserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Email domain not allowed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "ensureCurrentUser"
)]
#[post("/users/me")]
pub async fn ensure_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<EnsureUserResponse>> {
    let identity = session.require_identity()?;
    let resolved = state.accounts.resolve(identity).await?;
    let message = if resolved.created {
        "User created successfully"
    } else {
        "User already exists"
    };
    Ok(web::Json(EnsureUserResponse {
        message: message.to_owned(),
        user: resolved.user.into(),
    }))
}
