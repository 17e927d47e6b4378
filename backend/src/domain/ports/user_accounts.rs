//! Driving port for campus accounts.
//!
//! Accounts are created lazily the first time an authenticated identity is
//! seen. Inbound adapters call [`UserAccounts::resolve`] on every request that
//! needs the caller's [`User`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AuthenticatedIdentity, EmailAddress, Error, NewUser, User};

/// Caller's account plus whether this request created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    /// Resolved account.
    pub user: User,
    /// `true` when the account did not exist before.
    pub created: bool,
}

/// Driving port for account resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Return the caller's account, creating it when absent.
    ///
    /// Identities outside the institution domain are refused with
    /// [`crate::domain::ErrorCode::Forbidden`].
    async fn resolve(&self, identity: AuthenticatedIdentity) -> Result<ResolvedUser, Error>;

    /// Look up an existing account without creating one.
    async fn find(&self, email: EmailAddress) -> Result<Option<User>, Error>;
}

/// Fixture accounts port that materialises every identity on the fly.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserAccounts;

#[async_trait]
impl UserAccounts for FixtureUserAccounts {
    async fn resolve(&self, identity: AuthenticatedIdentity) -> Result<ResolvedUser, Error> {
        let user = User::from_new(NewUser::from_identity(
            &identity,
            DateTime::<Utc>::UNIX_EPOCH,
        ));
        Ok(ResolvedUser {
            user,
            created: true,
        })
    }

    async fn find(&self, _email: EmailAddress) -> Result<Option<User>, Error> {
        Ok(None)
    }
}
