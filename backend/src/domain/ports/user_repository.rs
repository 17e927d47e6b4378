//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection {
            /// Driver error text.
            message: String,
        } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Driver error text.
            message: String,
        } => "user repository query failed: {message}",
    }
}

/// Outcome of [`UserRepository::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCreation {
    /// A new record was stored.
    Created(User),
    /// A record with the same email already existed and was returned as-is.
    Existing(User),
}

impl UserCreation {
    /// Resolved user regardless of outcome.
    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Created(user) | Self::Existing(user) => user,
        }
    }

    /// Whether this call created the record.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Port for user storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch every user whose identifier is in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;

    /// Create a user unless one with the same email exists.
    ///
    /// Concurrent first logins for the same address must all resolve to the
    /// same stored record.
    async fn create(&self, user: &NewUser) -> Result<UserCreation, UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_ids(&self, _ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        Ok(Vec::new())
    }

    async fn create(&self, user: &NewUser) -> Result<UserCreation, UserPersistenceError> {
        Ok(UserCreation::Created(User::from_new(user.clone())))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{DateTime, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::AuthenticatedIdentity;

    #[rstest]
    #[tokio::test]
    async fn fixture_create_echoes_new_user() {
        let identity = AuthenticatedIdentity {
            email: EmailAddress::new("asha@klh.edu.in").expect("valid email"),
            name: None,
            image: None,
        };
        let new_user = NewUser::from_identity(&identity, DateTime::<Utc>::UNIX_EPOCH);

        let created = FixtureUserRepository
            .create(&new_user)
            .await
            .expect("fixture create succeeds");

        assert!(created.is_created());
        assert_eq!(created.into_user().id(), new_user.id);
    }
}
