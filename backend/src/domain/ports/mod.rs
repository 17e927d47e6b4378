//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ClaimNotifier`]) are implemented by
//! outbound adapters. Driving ports ([`ItemCommand`], [`ItemQuery`],
//! [`UserAccounts`]) are implemented by the domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod claim_notifier;
mod item_command;
mod item_query;
mod item_repository;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use claim_notifier::MockClaimNotifier;
pub use claim_notifier::{ClaimNotice, ClaimNotifier, ClaimNotifierError, FixtureClaimNotifier};
#[cfg(test)]
pub use item_command::MockItemCommand;
pub use item_command::{
    ClaimItemRequest, ClaimItemResponse, CreateItemRequest, DeleteItemRequest,
    FixtureItemCommand, ItemCommand, NotificationOutcome,
};
#[cfg(test)]
pub use item_query::MockItemQuery;
pub use item_query::{FixtureItemQuery, ItemQuery};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ClaimWrite, FixtureItemRepository, ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{FixtureUserAccounts, ResolvedUser, UserAccounts};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, UserCreation, UserPersistenceError, UserRepository,
};
