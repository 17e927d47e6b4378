//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities and the item lifecycle
//! rules used by the inbound and outbound adapters. Types are immutable once
//! constructed and validate their invariants on the way in.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Item (alias to `item::Item`) — lost or found item with claim invariants.
//! - lifecycle — pure claim, deletion and creation decisions.
//! - User (alias to `user::User`) — campus account.
//! - ItemService / UserAccountService — driving port implementations.

pub mod error;
pub mod item;
mod item_service;
pub mod ports;
#[cfg(test)]
pub(crate) mod test_support;
mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::item::lifecycle;
pub use self::item::{
    Item, ItemCategory, ItemDraft, ItemId, ItemListQuery, ItemParts, ItemStatus,
    ItemValidationError, ItemView, PartySummary,
};
pub use self::item_service::ItemService;
pub use self::trace_id::TraceId;
pub use self::user::{
    AuthenticatedIdentity, DisplayName, EmailAddress, InstitutionDomain, NewUser, User, UserId,
    UserValidationError,
};
pub use self::user_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use lostfound::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
