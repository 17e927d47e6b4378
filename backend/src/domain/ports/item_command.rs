//! Driving port for item mutations.
//!
//! Inbound adapters report, claim and delete items through this port. All
//! authorisation decisions are made behind it.

use async_trait::async_trait;

use crate::domain::{Error, ItemDraft, ItemId, ItemView, UserId};

/// Request to report a lost or found item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    /// Authenticated reporter.
    pub reporter: UserId,
    /// Submitted report.
    pub draft: ItemDraft,
}

/// Request to claim an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimItemRequest {
    /// Item to claim.
    pub item_id: ItemId,
    /// Authenticated claimant.
    pub claimant: UserId,
}

/// Whether the reporter was told about a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The notifier accepted the message.
    Sent,
    /// Delivery failed; the claim still stands.
    Failed,
}

impl NotificationOutcome {
    /// Lower-case representation used in responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Response from a committed claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimItemResponse {
    /// Item as stored after the claim.
    pub item: ItemView,
    /// Notification side note.
    pub notification: NotificationOutcome,
}

/// Request to delete an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteItemRequest {
    /// Item to delete.
    pub item_id: ItemId,
    /// Authenticated requester.
    pub requester: UserId,
}

/// Driving port for item write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCommand: Send + Sync {
    /// Validate and store a new item owned by the reporter.
    ///
    /// Missing fields surface as [`crate::domain::ErrorCode::InvalidRequest`]
    /// with the field names under `details.missingFields`.
    async fn create_item(&self, request: CreateItemRequest) -> Result<ItemView, Error>;

    /// Claim an open item on behalf of the claimant and notify the reporter.
    ///
    /// A refused claim is [`crate::domain::ErrorCode::Conflict`] with
    /// `details.code` set to `item_not_claimable` or `self_claim_forbidden`.
    async fn claim_item(&self, request: ClaimItemRequest) -> Result<ClaimItemResponse, Error>;

    /// Delete an item reported by the requester.
    async fn delete_item(&self, request: DeleteItemRequest) -> Result<(), Error>;
}

/// Fixture command that refuses every mutation as not found.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemCommand;

#[async_trait]
impl ItemCommand for FixtureItemCommand {
    async fn create_item(&self, _request: CreateItemRequest) -> Result<ItemView, Error> {
        Err(Error::service_unavailable("item storage is not configured"))
    }

    async fn claim_item(&self, _request: ClaimItemRequest) -> Result<ClaimItemResponse, Error> {
        Err(Error::not_found("Item not found"))
    }

    async fn delete_item(&self, _request: DeleteItemRequest) -> Result<(), Error> {
        Err(Error::not_found("Item not found"))
    }
}
