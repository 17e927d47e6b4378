//! Request and response payloads for the items API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ClaimItemResponse;
use crate::domain::{ItemDraft, ItemView, PartySummary};

/// Query string accepted by `GET /api/v1/items`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsParams {
    /// `lost` (default), `found` or `claimed`.
    pub status: Option<String>,
    /// Category name, or `all`.
    pub category: Option<String>,
    /// Case-insensitive text matched against title, description and location.
    pub search: Option<String>,
}

/// Body accepted by `POST /api/v1/items`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemBody {
    /// Short title.
    #[schema(example = "Black wallet")]
    pub title: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// One of the fixed category names.
    #[schema(example = "Accessories")]
    pub category: Option<String>,
    /// Where the item was lost or found.
    #[schema(example = "Cafeteria")]
    pub location: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; `dateLost` is accepted too.
    #[serde(alias = "dateLost")]
    #[schema(example = "2025-10-16")]
    pub date: Option<String>,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// How to reach the reporter.
    pub contact_info: Option<String>,
    /// `lost` or `found`; anything else, including non-string JSON, is
    /// stored as `lost`.
    #[schema(value_type = Option<String>, example = "lost")]
    pub status: Option<serde_json::Value>,
}

impl From<CreateItemBody> for ItemDraft {
    fn from(body: CreateItemBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            category: body.category,
            location: body.location,
            date: body.date,
            images: body.images,
            contact_info: body.contact_info,
            status: body
                .status
                .and_then(|value| value.as_str().map(str::to_owned)),
        }
    }
}

/// Body accepted by `PUT /api/v1/items/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ItemActionBody {
    /// Only `claim` is supported.
    #[schema(example = "claim")]
    pub action: String,
}

/// Name and email of a related user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartyResponse {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl From<PartySummary> for PartyResponse {
    fn from(party: PartySummary) -> Self {
        Self {
            id: party.id.to_string(),
            name: party.name.into(),
            email: party.email.into(),
        }
    }
}

/// Item as returned by every items endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    /// Item identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Where the item was lost or found.
    pub location: String,
    /// Day the item was lost or found, `YYYY-MM-DD`.
    pub date: String,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// How to reach the reporter.
    pub contact_info: String,
    /// `lost`, `found` or `claimed`.
    pub status: String,
    /// Reporter summary.
    pub reported_by: Option<PartyResponse>,
    /// Claimant summary, present once claimed.
    pub claimed_by: Option<PartyResponse>,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 time of the last change.
    pub updated_at: String,
}

impl From<ItemView> for ItemResponse {
    fn from(view: ItemView) -> Self {
        let ItemView {
            item,
            reporter,
            claimant,
        } = view;
        Self {
            id: item.id().to_string(),
            title: item.title().to_owned(),
            description: item.description().to_owned(),
            category: item.category().as_str().to_owned(),
            location: item.location().to_owned(),
            date: item.event_date().format("%Y-%m-%d").to_string(),
            images: item.images().to_vec(),
            contact_info: item.contact_info().to_owned(),
            status: item.status().as_str().to_owned(),
            reported_by: reporter.map(PartyResponse::from),
            claimed_by: claimant.map(PartyResponse::from),
            created_at: item.created_at().to_rfc3339(),
            updated_at: item.updated_at().to_rfc3339(),
        }
    }
}

/// Result of a committed claim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimResponse {
    /// Item after the claim.
    pub item: ItemResponse,
    /// `sent` or `failed`; a failed notification does not undo the claim.
    #[schema(example = "sent")]
    pub notification: String,
}

impl From<ClaimItemResponse> for ClaimResponse {
    fn from(response: ClaimItemResponse) -> Self {
        Self {
            item: response.item.into(),
            notification: response.notification.as_str().to_owned(),
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
