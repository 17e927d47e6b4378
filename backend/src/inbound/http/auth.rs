//! Caller resolution used by HTTP handlers.
//!
//! Every authenticated endpoint follows the same opening: read the identity
//! from the session, then resolve it to a stored account, creating one on
//! first sight. Sessions are only issued once the identity provider has
//! proved itself under the configured [`LoginPolicy`].

use std::fmt;

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;
use sha2::{Digest, Sha256};

use crate::domain::ports::UserAccounts;
use crate::domain::{Error, User};

use super::ApiResult;
use super::session::SessionContext;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the session's identity to the caller's account.
///
/// # Errors
///
/// `401` without a session identity, `403` for a foreign email domain, and
/// repository failures as mapped by the account service.
pub async fn resolve_caller(
    session: &SessionContext,
    accounts: &dyn UserAccounts,
) -> ApiResult<User> {
    let identity = session.require_identity()?;
    Ok(accounts.resolve(identity).await?.user)
}

/// SHA-256 digest of the secret shared with the identity provider.
///
/// Only the digest is kept, so the secret never sits in handler state and
/// comparisons always run over fixed-length values.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSecret(Vec<u8>);

impl ProviderSecret {
    /// Digest `secret` for later comparison.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self(Sha256::digest(secret.as_bytes()).to_vec())
    }

    fn matches(&self, presented: &str) -> bool {
        Sha256::digest(presented.as_bytes()).as_slice() == self.0.as_slice()
    }
}

impl fmt::Debug for ProviderSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderSecret(..)")
    }
}

/// What `POST /api/v1/login` demands before it issues a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPolicy {
    /// Any well-formed identity is admitted. Refused in release builds.
    Open,
    /// The provider sends `Authorization: Bearer <secret>`.
    SharedSecret(ProviderSecret),
}

impl LoginPolicy {
    /// Require the shared `secret` on every login.
    #[must_use]
    pub fn shared_secret(secret: &str) -> Self {
        Self::SharedSecret(ProviderSecret::new(secret))
    }

    /// Check the request's `Authorization` header against the policy.
    ///
    /// # Errors
    ///
    /// `401` when a secret is configured and the header is missing, not a
    /// bearer token or carries the wrong secret.
    pub fn verify(&self, request: &HttpRequest) -> ApiResult<()> {
        let Self::SharedSecret(secret) = self else {
            return Ok(());
        };
        let presented = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim);
        match presented {
            Some(token) if secret.matches(token) => Ok(()),
            _ => Err(Error::unauthorized("Identity provider assertion required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer campus-sso"))]
    #[case(Some("Basic Y2FtcHVzLXNzbw=="))]
    fn open_policy_admits_every_request(#[case] header: Option<&str>) {
        let mut request = TestRequest::post();
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        assert!(LoginPolicy::Open.verify(&request.to_http_request()).is_ok());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer wrong"))]
    #[case(Some("campus-sso"))]
    #[case(Some("Basic campus-sso"))]
    fn shared_secret_refuses_missing_or_wrong_proof(#[case] header: Option<&str>) {
        let mut request = TestRequest::post();
        if let Some(value) = header {
            request = request.insert_header((AUTHORIZATION, value));
        }
        let error = LoginPolicy::shared_secret("campus-sso")
            .verify(&request.to_http_request())
            .expect_err("proof refused");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn shared_secret_admits_the_matching_bearer_token() {
        let request = TestRequest::post()
            .insert_header((AUTHORIZATION, "Bearer campus-sso"))
            .to_http_request();
        assert!(
            LoginPolicy::shared_secret("campus-sso")
                .verify(&request)
                .is_ok()
        );
    }

    #[rstest]
    fn secret_is_not_printed() {
        let rendered = format!("{:?}", LoginPolicy::shared_secret("campus-sso"));
        assert!(!rendered.contains("campus-sso"));
    }
}
