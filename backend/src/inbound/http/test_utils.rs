//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{dev::ServiceResponse, test as actix_test};
use mockable::DefaultClock;
use serde_json::json;

use crate::domain::ports::FixtureClaimNotifier;
use crate::domain::{InstitutionDomain, ItemService, UserAccountService};
use crate::inbound::http::auth::LoginPolicy;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};

/// Secret the test identity provider presents at login.
pub const TEST_LOGIN_SECRET: &str = "test-identity-provider";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state wired to the real services over in-memory repositories.
///
/// Logins must present [`TEST_LOGIN_SECRET`] as a bearer token.
pub fn in_memory_state() -> HttpState {
    let items = Arc::new(InMemoryItemRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(DefaultClock);
    let item_service = Arc::new(ItemService::new(
        items,
        Arc::clone(&users),
        Arc::new(FixtureClaimNotifier),
        clock.clone(),
    ));
    let accounts = Arc::new(UserAccountService::new(
        users,
        InstitutionDomain::default(),
        clock,
    ));
    HttpState::new(item_service.clone(), item_service, accounts)
        .with_login_policy(LoginPolicy::shared_secret(TEST_LOGIN_SECRET))
}

/// `Authorization` header carrying [`TEST_LOGIN_SECRET`].
pub fn bearer_login_secret() -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {TEST_LOGIN_SECRET}"),
    )
}

/// Log in as `email` through `POST /api/v1/login` and return the cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    name: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .insert_header(bearer_login_secret())
        .set_json(json!({ "email": email, "name": name }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed for {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
