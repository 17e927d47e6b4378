//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ConfigError, MailerSettings, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use lostfound::Trace;
#[cfg(debug_assertions)]
use lostfound::doc::ApiDoc;
use lostfound::inbound::http::error::json_config;
use lostfound::inbound::http::health::{HealthState, live, ready};
use lostfound::inbound::http::items::{
    create_item, delete_item, get_item, list_items, update_item,
};
use lostfound::inbound::http::state::HttpState;
use lostfound::inbound::http::users::{current_user, ensure_current_user, login, logout};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_TTL_HOURS: i64 = 2;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(ensure_current_user)
        .service(list_items)
        .service(create_item)
        .service(get_item)
        .service(update_item)
        .service(delete_item);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the notifier cannot be built, or when
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use super::*;
    use lostfound::inbound::http::auth::LoginPolicy;

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let addr = "127.0.0.1:0".parse().expect("valid address");
        let config = ServerConfig::new(Key::generate(), false, SameSite::Lax, addr);
        AppDependencies {
            health_state,
            http_state: web::Data::new(build_http_state(&config).expect("in-memory state")),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[actix_web::test]
    async fn wires_probes_and_api_behind_trace() {
        let app = actix_test::init_service(build_app(deps())).await;

        let probe = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(probe.status(), StatusCode::OK);
        assert!(probe.headers().contains_key("trace-id"));

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/items").to_request(),
        )
        .await;
        assert_eq!(listing.status(), StatusCode::UNAUTHORIZED);
        assert!(listing.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn malformed_json_bodies_use_the_error_envelope() {
        let app = actix_test::init_service(build_app(deps())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"email\": ")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
    }

    #[actix_web::test]
    async fn configured_login_secret_guards_login() {
        let addr = "127.0.0.1:0".parse().expect("valid address");
        let config = ServerConfig::new(Key::generate(), false, SameSite::Lax, addr)
            .with_login_policy(LoginPolicy::shared_secret("campus-sso"));
        let app = actix_test::init_service(build_app(AppDependencies {
            http_state: web::Data::new(build_http_state(&config).expect("in-memory state")),
            ..deps()
        }))
        .await;
        let login_as = |authorization: Option<&str>| {
            let mut request = actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": "asha@klh.edu.in", "name": "Asha Rao" }));
            if let Some(value) = authorization {
                request = request.insert_header(("authorization", value.to_owned()));
            }
            request.to_request()
        };

        let refused = actix_test::call_service(&app, login_as(None)).await;
        assert_eq!(refused.status(), StatusCode::UNAUTHORIZED);

        let admitted = actix_test::call_service(&app, login_as(Some("Bearer campus-sso"))).await;
        assert_eq!(admitted.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn login_cookie_is_http_only_and_scoped_to_root() {
        let app = actix_test::init_service(build_app(deps())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": "asha@klh.edu.in", "name": "Asha Rao" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        let me = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(me).await;
        assert_eq!(
            body.pointer("/user/email").and_then(Value::as_str),
            Some("asha@klh.edu.in")
        );
    }
}
