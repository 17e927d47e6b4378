//! Campus account service.
//!
//! Resolves the caller's [`User`] from the identity asserted at login,
//! creating the account on first sight. Only addresses in the configured
//! institution domain are admitted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::item_service::map_user_repository_error;
use crate::domain::ports::{ResolvedUser, UserAccounts, UserRepository};
use crate::domain::{
    AuthenticatedIdentity, EmailAddress, Error, InstitutionDomain, NewUser, User,
    UserValidationError,
};

/// Account service implementing [`UserAccounts`].
#[derive(Clone)]
pub struct UserAccountService<U> {
    users: Arc<U>,
    domain: InstitutionDomain,
    clock: Arc<dyn Clock>,
}

impl<U> UserAccountService<U> {
    /// Create a new service admitting addresses in `domain`.
    pub fn new(users: Arc<U>, domain: InstitutionDomain, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            domain,
            clock,
        }
    }
}

fn map_domain_error(error: &UserValidationError) -> Error {
    Error::forbidden(error.to_string()).with_details(json!({
        "field": "email",
        "code": "foreign_email_domain",
    }))
}

#[async_trait]
impl<U> UserAccounts for UserAccountService<U>
where
    U: UserRepository,
{
    async fn resolve(&self, identity: AuthenticatedIdentity) -> Result<ResolvedUser, Error> {
        self.domain
            .admit(&identity.email)
            .map_err(|err| map_domain_error(&err))?;

        if let Some(user) = self
            .users
            .find_by_email(&identity.email)
            .await
            .map_err(map_user_repository_error)?
        {
            return Ok(ResolvedUser {
                user,
                created: false,
            });
        }

        let creation = self
            .users
            .create(&NewUser::from_identity(&identity, self.clock.utc()))
            .await
            .map_err(map_user_repository_error)?;
        let created = creation.is_created();
        let user = creation.into_user();
        if created {
            info!(user_id = %user.id(), "user account created");
        }
        Ok(ResolvedUser { user, created })
    }

    async fn find(&self, email: EmailAddress) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(&email)
            .await
            .map_err(map_user_repository_error)
    }
}
