//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session cookie carries the identity asserted at login: the caller's
//! institutional email plus the optional name and avatar supplied by the
//! identity provider. Handlers trust it as-is.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedIdentity, EmailAddress, Error};

pub(crate) const EMAIL_KEY: &str = "email";
pub(crate) const NAME_KEY: &str = "name";
pub(crate) const IMAGE_KEY: &str = "image";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failure(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_failure(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session cannot be serialised.
    pub fn persist_identity(&self, identity: &AuthenticatedIdentity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(EMAIL_KEY, identity.email.as_ref())
            .map_err(write_failure)?;
        self.0
            .insert(NAME_KEY, identity.name.as_deref())
            .map_err(write_failure)?;
        self.0
            .insert(IMAGE_KEY, identity.image.as_deref())
            .map_err(write_failure)
    }

    /// Fetch the identity stored in the session, if present and well formed.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session payload cannot be read.
    pub fn identity(&self) -> Result<Option<AuthenticatedIdentity>, Error> {
        let Some(raw_email) = self.0.get::<String>(EMAIL_KEY).map_err(read_failure)? else {
            return Ok(None);
        };
        let email = match EmailAddress::new(&raw_email) {
            Ok(email) => email,
            Err(error) => {
                warn!(%error, "invalid email in session cookie");
                return Ok(None);
            }
        };
        let name = self
            .0
            .get::<Option<String>>(NAME_KEY)
            .map_err(read_failure)?
            .flatten();
        let image = self
            .0
            .get::<Option<String>>(IMAGE_KEY)
            .map_err(read_failure)?
            .flatten();
        Ok(Some(AuthenticatedIdentity { email, name, image }))
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] when no identity is
    /// stored.
    pub fn require_identity(&self) -> Result<AuthenticatedIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}
