//! Item lifecycle decisions.
//!
//! Pure functions deciding whether a claim, deletion or creation may happen.
//! They never touch storage: a successful claim yields a [`ClaimTransition`]
//! that the persistence adapter applies as a single conditional write guarded
//! by [`ClaimTransition::expected_status`].
//!
//! ```text
//! lost  --claim--> claimed
//! found --claim--> claimed
//! ```
//!
//! `claimed` is terminal and there is no `lost <-> found` transition.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::{Item, ItemCategory, ItemDraft, ItemId, ItemParts, ItemStatus, ItemValidationError};
use crate::domain::user::UserId;

/// Fields an item report must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// Short title.
    Title,
    /// Free-text description.
    Description,
    /// Category name.
    Category,
    /// Where the item was lost or found.
    Location,
    /// Day the item was lost or found.
    Date,
    /// How to reach the reporter.
    ContactInfo,
}

impl RequiredField {
    /// Field name as it appears in request bodies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Location => "location",
            Self::Date => "date",
            Self::ContactInfo => "contactInfo",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons a lifecycle operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The item does not exist.
    #[error("item not found")]
    NotFound,
    /// The item is not in a claimable status.
    #[error("item is not available for claiming")]
    InvalidState {
        /// Status observed when the claim was evaluated.
        status: ItemStatus,
    },
    /// The reporter attempted to claim their own item.
    #[error("you cannot claim your own item")]
    SelfClaimForbidden,
    /// The caller may not delete the item.
    #[error("not authorised to delete this item")]
    Forbidden,
    /// One or more required fields are absent or blank.
    #[error("missing required fields: {}", join_fields(.missing))]
    ValidationFailed {
        /// Every missing field, in declaration order.
        missing: Vec<RequiredField>,
    },
    /// The category is not one of the fixed set.
    #[error("unknown category: {value}")]
    InvalidCategory {
        /// Rejected input.
        value: String,
    },
    /// The event date is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("invalid date: {value}")]
    InvalidEventDate {
        /// Rejected input.
        value: String,
    },
    /// The resulting item would break an item invariant.
    #[error(transparent)]
    InvalidItem(#[from] ItemValidationError),
}

/// Relationship of the claimant to a claimed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimantRole {
    /// Claimant found an item reported lost.
    Finder,
    /// Claimant owns an item reported found.
    Owner,
}

impl ClaimantRole {
    const fn for_prior_status(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Found => Self::Owner,
            ItemStatus::Lost | ItemStatus::Claimed => Self::Finder,
        }
    }
}

/// Who is told about a claim and about whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationRoles {
    /// User who receives the notification; always the reporter.
    pub recipient: UserId,
    /// User the notification is about; always the claimant.
    pub counterpart: UserId,
    /// Claimant's relationship to the item.
    pub claimant_role: ClaimantRole,
}

/// Approved claim, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTransition {
    /// Item being claimed.
    pub item_id: ItemId,
    /// Status the item must still have for the write to succeed.
    pub expected_status: ItemStatus,
    /// User recorded as claimant.
    pub claimant: UserId,
    /// Item as it reads once the claim is committed.
    pub claimed: Item,
    /// Notification recipients.
    pub roles: NotificationRoles,
}

/// Decide whether `acting_user` may claim `item`.
///
/// Checks run in order: existence, claimable status, then self-claim. A
/// reporter claiming their own already-claimed item therefore observes
/// [`LifecycleError::InvalidState`].
///
/// # Errors
/// Returns [`LifecycleError::NotFound`], [`LifecycleError::InvalidState`] or
/// [`LifecycleError::SelfClaimForbidden`].
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use lostfound::domain::lifecycle::{LifecycleError, evaluate_claim};
/// use lostfound::domain::UserId;
///
/// let err = evaluate_claim(None, UserId::random(), Utc::now()).expect_err("missing item");
/// assert_eq!(err, LifecycleError::NotFound);
/// ```
pub fn evaluate_claim(
    item: Option<&Item>,
    acting_user: UserId,
    now: DateTime<Utc>,
) -> Result<ClaimTransition, LifecycleError> {
    let existing = item.ok_or(LifecycleError::NotFound)?;
    let prior = existing.status();
    if !prior.is_claimable() {
        return Err(LifecycleError::InvalidState { status: prior });
    }
    if existing.reported_by() == acting_user {
        return Err(LifecycleError::SelfClaimForbidden);
    }

    let claimed = existing.clone().into_claimed(acting_user, now)?;
    Ok(ClaimTransition {
        item_id: existing.id(),
        expected_status: prior,
        claimant: acting_user,
        roles: NotificationRoles {
            recipient: existing.reported_by(),
            counterpart: acting_user,
            claimant_role: ClaimantRole::for_prior_status(prior),
        },
        claimed,
    })
}

/// Decide whether `acting_user` may delete `item`.
///
/// # Errors
/// Returns [`LifecycleError::NotFound`] for a missing item and
/// [`LifecycleError::Forbidden`] unless the caller reported it.
pub fn evaluate_deletion(item: Option<&Item>, acting_user: UserId) -> Result<(), LifecycleError> {
    let existing = item.ok_or(LifecycleError::NotFound)?;
    if existing.reported_by() == acting_user {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden)
    }
}

/// Validate a report and build the new item owned by `reporter`.
///
/// Text fields are trimmed and blank values count as missing. Every missing
/// field is reported at once. The status is `lost` unless exactly `found` was
/// requested.
///
/// # Errors
/// Returns [`LifecycleError::ValidationFailed`] listing missing fields, then
/// [`LifecycleError::InvalidCategory`] or [`LifecycleError::InvalidEventDate`]
/// for values that are present but unusable.
pub fn evaluate_creation(
    draft: ItemDraft,
    reporter: UserId,
    now: DateTime<Utc>,
) -> Result<Item, LifecycleError> {
    let ItemDraft {
        title,
        description,
        category,
        location,
        date,
        images,
        contact_info,
        status,
    } = draft;

    let mut missing = Vec::new();
    let mut require = |field: RequiredField, value: Option<String>| {
        let present = value
            .map(|raw| raw.trim().to_owned())
            .filter(|trimmed| !trimmed.is_empty());
        if present.is_none() {
            missing.push(field);
        }
        present
    };
    let required = (
        require(RequiredField::Title, title),
        require(RequiredField::Description, description),
        require(RequiredField::Category, category),
        require(RequiredField::Location, location),
        require(RequiredField::Date, date),
        require(RequiredField::ContactInfo, contact_info),
    );
    let (
        Some(title_text),
        Some(description_text),
        Some(category_name),
        Some(location_text),
        Some(date_text),
        Some(contact_text),
    ) = required
    else {
        return Err(LifecycleError::ValidationFailed { missing });
    };

    let parsed_category = category_name
        .parse::<ItemCategory>()
        .map_err(|err| LifecycleError::InvalidCategory { value: err.input })?;
    let event_date = parse_event_date(&date_text)
        .ok_or(LifecycleError::InvalidEventDate { value: date_text })?;
    let image_urls = images
        .into_iter()
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .collect();

    Item::new(ItemParts {
        id: ItemId::random(),
        title: title_text,
        description: description_text,
        category: parsed_category,
        location: location_text,
        event_date,
        images: image_urls,
        contact_info: contact_text,
        status: ItemStatus::for_new_report(status.as_deref()),
        reported_by: reporter,
        claimed_by: None,
        created_at: now,
        updated_at: now,
    })
    .map_err(LifecycleError::from)
}

fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
