//! Item enum types and parsers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of an item in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Reported missing by its owner.
    Lost,
    /// Handed in or spotted by a finder.
    Found,
    /// Terminal: a claimant has been recorded.
    Claimed,
}

impl ItemStatus {
    /// Canonical lower-case representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
            Self::Claimed => "claimed",
        }
    }

    /// Whether a claim may still be recorded.
    #[must_use]
    pub const fn is_claimable(&self) -> bool {
        matches!(self, Self::Lost | Self::Found)
    }

    /// Status stored for a newly reported item.
    ///
    /// Only exactly `lost` or `found` are honoured; anything else, including
    /// `claimed` and an absent value, is stored as `lost`.
    ///
    /// # Examples
    /// ```
    /// use lostfound::domain::ItemStatus;
    ///
    /// assert_eq!(ItemStatus::for_new_report(Some("found")), ItemStatus::Found);
    /// assert_eq!(ItemStatus::for_new_report(Some("banana")), ItemStatus::Lost);
    /// assert_eq!(ItemStatus::for_new_report(None), ItemStatus::Lost);
    /// ```
    #[must_use]
    pub fn for_new_report(requested: Option<&str>) -> Self {
        match requested {
            Some("found") => Self::Found,
            _ => Self::Lost,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ItemStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item status: {input}")]
pub struct ParseItemStatusError {
    /// Rejected input.
    pub input: String,
}

impl FromStr for ItemStatus {
    type Err = ParseItemStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            "claimed" => Ok(Self::Claimed),
            _ => Err(ParseItemStatusError {
                input: value.to_owned(),
            }),
        }
    }
}

/// Fixed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Phones, laptops, chargers.
    Electronics,
    /// Garments and footwear.
    Clothing,
    /// Books and notes.
    Books,
    /// Bags, jewellery, bottles.
    Accessories,
    /// ID cards and paperwork.
    Documents,
    /// Sports equipment.
    Sports,
    /// Anything else.
    Other,
}

impl ItemCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Electronics,
        Self::Clothing,
        Self::Books,
        Self::Accessories,
        Self::Documents,
        Self::Sports,
        Self::Other,
    ];

    /// Canonical capitalised representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Books => "Books",
            Self::Accessories => "Accessories",
            Self::Documents => "Documents",
            Self::Sports => "Sports",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ItemCategory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item category: {input}")]
pub struct ParseItemCategoryError {
    /// Rejected input.
    pub input: String,
}

impl FromStr for ItemCategory {
    type Err = ParseItemCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| ParseItemCategoryError {
                input: value.to_owned(),
            })
    }
}
