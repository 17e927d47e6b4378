//! Port for telling an item's reporter that it has been claimed.
//!
//! Delivery is best effort. Callers log failures and carry on; a failed
//! notification never undoes a committed claim.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::lifecycle::ClaimantRole;
use crate::domain::{DisplayName, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Errors raised by claim notification adapters.
    pub enum ClaimNotifierError {
        /// The message could not be assembled.
        Compose {
            /// Template error text.
            message: String,
        } => "claim notification could not be composed: {message}",
        /// The transport refused or failed to deliver the message.
        Delivery {
            /// Transport error text.
            message: String,
        } => "claim notification delivery failed: {message}",
    }
}

/// Everything a claim notification says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimNotice {
    /// Reporter's address; the recipient.
    pub owner_email: EmailAddress,
    /// Reporter's display name.
    pub owner_name: DisplayName,
    /// Claimant's display name.
    pub finder_name: DisplayName,
    /// Claimant's address.
    pub finder_email: EmailAddress,
    /// Claimant's relationship to the item.
    pub claimant_role: ClaimantRole,
    /// Item title.
    pub item_title: String,
    /// Item description.
    pub item_description: String,
    /// Where the item was lost or found.
    pub item_location: String,
    /// Day the item was lost or found.
    pub event_date: NaiveDate,
}

/// Outbound port for claim notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimNotifier: Send + Sync {
    /// Tell the reporter that their item has been claimed.
    async fn notify_owner_item_claimed(&self, notice: &ClaimNotice)
    -> Result<(), ClaimNotifierError>;
}

/// Fixture notifier that accepts every notice and sends nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClaimNotifier;

#[async_trait]
impl ClaimNotifier for FixtureClaimNotifier {
    async fn notify_owner_item_claimed(
        &self,
        _notice: &ClaimNotice,
    ) -> Result<(), ClaimNotifierError> {
        Ok(())
    }
}
