//! Lost and found items.
//!
//! An [`Item`] is reported by one user and may be claimed exactly once by a
//! different user. The constructor enforces the claim invariants so every
//! value in circulation, including rows read back from storage, satisfies
//! them:
//!
//! - `claimed_by` is set if and only if the status is [`ItemStatus::Claimed`];
//! - the claimant is never the reporter.

mod enums;
pub mod lifecycle;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{DisplayName, EmailAddress, User, UserId};

pub use self::enums::{ItemCategory, ItemStatus, ParseItemCategoryError, ParseItemStatusError};

/// Stable item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Parse an identifier from its textual UUID form.
    ///
    /// # Errors
    /// Returns [`uuid::Error`] for non-UUID input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Invariant violations detected by [`Item::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    /// A required text field is blank.
    #[error("item {field} must not be blank")]
    BlankField {
        /// Offending field.
        field: &'static str,
    },
    /// Status is `claimed` but no claimant is recorded.
    #[error("claimed item has no claimant")]
    ClaimedWithoutClaimant,
    /// A claimant is recorded on an item that is not claimed.
    #[error("unclaimed item has a claimant")]
    ClaimantWithoutClaim,
    /// The reporter is recorded as claimant of their own item.
    #[error("item reporter cannot be its claimant")]
    ReporterIsClaimant,
    /// A second claim was applied to a claimed item.
    #[error("item is already claimed")]
    AlreadyClaimed,
}

/// Raw parts of an item, validated by [`Item::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemParts {
    /// Identifier.
    pub id: ItemId,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category.
    pub category: ItemCategory,
    /// Where the item was lost or found.
    pub location: String,
    /// Day the item was lost or found.
    pub event_date: NaiveDate,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// How to reach the reporter.
    pub contact_info: String,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// User who reported the item.
    pub reported_by: UserId,
    /// User who claimed the item, if any.
    pub claimed_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A reported lost or found item.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, Utc};
/// use lostfound::domain::{Item, ItemCategory, ItemId, ItemParts, ItemStatus, UserId};
///
/// let now = Utc::now();
/// let item = Item::new(ItemParts {
///     id: ItemId::random(),
///     title: "Blue umbrella".into(),
///     description: "Folding, wooden handle".into(),
///     category: ItemCategory::Accessories,
///     location: "Library".into(),
///     event_date: NaiveDate::from_ymd_opt(2025, 10, 17).expect("valid date"),
///     images: Vec::new(),
///     contact_info: "Room 204".into(),
///     status: ItemStatus::Lost,
///     reported_by: UserId::random(),
///     claimed_by: None,
///     created_at: now,
///     updated_at: now,
/// })
/// .expect("valid item");
/// assert!(item.claimed_by().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    parts: ItemParts,
}

impl Item {
    /// Validate `parts` and build an item.
    ///
    /// # Errors
    /// Returns [`ItemValidationError`] when a required text field is blank or
    /// the claim invariants do not hold.
    pub fn new(parts: ItemParts) -> Result<Self, ItemValidationError> {
        for (field, value) in [
            ("title", &parts.title),
            ("description", &parts.description),
            ("location", &parts.location),
            ("contact info", &parts.contact_info),
        ] {
            if value.trim().is_empty() {
                return Err(ItemValidationError::BlankField { field });
            }
        }
        match (parts.status, parts.claimed_by) {
            (ItemStatus::Claimed, None) => Err(ItemValidationError::ClaimedWithoutClaimant),
            (ItemStatus::Lost | ItemStatus::Found, Some(_)) => {
                Err(ItemValidationError::ClaimantWithoutClaim)
            }
            (_, Some(claimant)) if claimant == parts.reported_by => {
                Err(ItemValidationError::ReporterIsClaimant)
            }
            _ => Ok(Self { parts }),
        }
    }

    /// Record `claimant` and move to [`ItemStatus::Claimed`].
    ///
    /// # Errors
    /// Fails when the item is already claimed or `claimant` reported it.
    pub(crate) fn into_claimed(
        self,
        claimant: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, ItemValidationError> {
        if self.parts.status == ItemStatus::Claimed {
            return Err(ItemValidationError::AlreadyClaimed);
        }
        Self::new(ItemParts {
            status: ItemStatus::Claimed,
            claimed_by: Some(claimant),
            updated_at: now,
            ..self.parts
        })
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.parts.id
    }

    /// Short title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.parts.title.as_str()
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.parts.description.as_str()
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        self.parts.category
    }

    /// Where the item was lost or found.
    #[must_use]
    pub fn location(&self) -> &str {
        self.parts.location.as_str()
    }

    /// Day the item was lost or found.
    #[must_use]
    pub const fn event_date(&self) -> NaiveDate {
        self.parts.event_date
    }

    /// Ordered image URLs.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.parts.images
    }

    /// How to reach the reporter.
    #[must_use]
    pub fn contact_info(&self) -> &str {
        self.parts.contact_info.as_str()
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ItemStatus {
        self.parts.status
    }

    /// User who reported the item.
    #[must_use]
    pub const fn reported_by(&self) -> UserId {
        self.parts.reported_by
    }

    /// User who claimed the item, if any.
    #[must_use]
    pub const fn claimed_by(&self) -> Option<UserId> {
        self.parts.claimed_by
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.parts.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.parts.updated_at
    }

    /// Borrow the validated parts.
    #[must_use]
    pub const fn parts(&self) -> &ItemParts {
        &self.parts
    }
}

impl From<Item> for ItemParts {
    fn from(value: Item) -> Self {
        value.parts
    }
}

/// Unvalidated item report as submitted by a client.
///
/// Every field is optional so that creation can report all missing fields at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// Short title.
    pub title: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Where the item was lost or found.
    pub location: Option<String>,
    /// Day the item was lost or found, `YYYY-MM-DD` or RFC 3339.
    pub date: Option<String>,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// How to reach the reporter.
    pub contact_info: Option<String>,
    /// Requested status; only `lost` and `found` are honoured.
    pub status: Option<String>,
}

/// Filters applied when listing items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Status to list.
    pub status: ItemStatus,
    /// Category to list; `None` means every category.
    pub category: Option<ItemCategory>,
    /// Case-insensitive text matched against title, description and location.
    pub search: Option<String>,
}

impl Default for ItemListQuery {
    fn default() -> Self {
        Self {
            status: ItemStatus::Lost,
            category: None,
            search: None,
        }
    }
}

impl ItemListQuery {
    /// Whether `item` satisfies the filters.
    ///
    /// Storage adapters translate the same rules into their own query
    /// language; this predicate backs the in-memory fixtures.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if item.status() != self.status {
            return false;
        }
        if self.category.is_some_and(|category| category != item.category()) {
            return false;
        }
        let Some(needle) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };
        [item.title(), item.description(), item.location()]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Name and email of a user related to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartySummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: DisplayName,
    /// Email address.
    pub email: EmailAddress,
}

impl From<&User> for PartySummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.display_name().clone(),
            email: user.email().clone(),
        }
    }
}

/// Item together with its reporter and claimant summaries.
///
/// A summary is `None` when the referenced user no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    /// The item.
    pub item: Item,
    /// Reporter summary.
    pub reporter: Option<PartySummary>,
    /// Claimant summary.
    pub claimant: Option<PartySummary>,
}
