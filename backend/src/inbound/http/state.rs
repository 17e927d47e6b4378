//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureItemCommand, FixtureItemQuery, FixtureUserAccounts, ItemCommand, ItemQuery,
    UserAccounts,
};
use crate::inbound::http::auth::LoginPolicy;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Item creation, claim and deletion.
    pub items: Arc<dyn ItemCommand>,
    /// Item listing and lookup.
    pub items_query: Arc<dyn ItemQuery>,
    /// Caller account resolution.
    pub accounts: Arc<dyn UserAccounts>,
    /// Proof required before a login issues a session.
    pub login_policy: LoginPolicy,
}

impl HttpState {
    /// Construct state from the three driving ports with an open login.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use lostfound::domain::ports::{FixtureItemCommand, FixtureItemQuery, FixtureUserAccounts};
    /// use lostfound::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureItemCommand),
    ///     Arc::new(FixtureItemQuery),
    ///     Arc::new(FixtureUserAccounts),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(
        items: Arc<dyn ItemCommand>,
        items_query: Arc<dyn ItemQuery>,
        accounts: Arc<dyn UserAccounts>,
    ) -> Self {
        Self {
            items,
            items_query,
            accounts,
            login_policy: LoginPolicy::Open,
        }
    }

    /// Replace the login policy.
    #[must_use]
    pub fn with_login_policy(mut self, login_policy: LoginPolicy) -> Self {
        self.login_policy = login_policy;
        self
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureItemCommand),
            Arc::new(FixtureItemQuery),
            Arc::new(FixtureUserAccounts),
        )
    }
}
