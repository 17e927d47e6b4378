//! Item domain service.
//!
//! Implements the item driving ports on top of the item and user repositories
//! and the claim notifier. Decisions are delegated to
//! [`crate::domain::lifecycle`]; this service only loads, commits and reports.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::item::lifecycle::{
    ClaimTransition, LifecycleError, evaluate_claim, evaluate_creation, evaluate_deletion,
};
use crate::domain::ports::{
    ClaimItemRequest, ClaimItemResponse, ClaimNotice, ClaimNotifier, ClaimWrite,
    CreateItemRequest, DeleteItemRequest, ItemCommand, ItemQuery, ItemRepository,
    ItemRepositoryError, NotificationOutcome, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, Item, ItemId, ItemListQuery, ItemView, PartySummary, UserId};

pub(crate) fn map_item_repository_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item repository unavailable: {message}"))
        }
        ItemRepositoryError::Query { message } => {
            Error::internal(format!("item repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_lifecycle_error(error: LifecycleError) -> Error {
    match error {
        LifecycleError::NotFound => Error::not_found("Item not found"),
        LifecycleError::InvalidState { status } => {
            Error::conflict("Item is not available for claiming").with_details(json!({
                "code": "item_not_claimable",
                "status": status.as_str(),
            }))
        }
        LifecycleError::SelfClaimForbidden => Error::conflict("You cannot claim your own item")
            .with_details(json!({ "code": "self_claim_forbidden" })),
        LifecycleError::Forbidden => Error::forbidden("Not authorized to delete this item"),
        LifecycleError::ValidationFailed { missing } => {
            let fields: Vec<&str> = missing.iter().map(|field| field.as_str()).collect();
            Error::invalid_request("Missing required fields").with_details(json!({
                "code": "missing_fields",
                "missingFields": fields,
            }))
        }
        LifecycleError::InvalidCategory { value } => Error::invalid_request("Unknown category")
            .with_details(json!({
                "field": "category",
                "code": "invalid_category",
                "value": value,
            })),
        LifecycleError::InvalidEventDate { value } => {
            Error::invalid_request("Date must be YYYY-MM-DD or an RFC 3339 timestamp")
                .with_details(json!({
                    "field": "date",
                    "code": "invalid_date",
                    "value": value,
                }))
        }
        LifecycleError::InvalidItem(err) => Error::internal(format!("invalid item: {err}")),
    }
}

/// Item service implementing [`ItemCommand`] and [`ItemQuery`].
#[derive(Clone)]
pub struct ItemService<I, U, N> {
    items: Arc<I>,
    users: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<I, U, N> ItemService<I, U, N> {
    /// Create a new service over the given adapters.
    pub fn new(items: Arc<I>, users: Arc<U>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            items,
            users,
            notifier,
            clock,
        }
    }
}

impl<I, U, N> ItemService<I, U, N>
where
    I: ItemRepository,
    U: UserRepository,
    N: ClaimNotifier,
{
    async fn load(&self, item_id: &ItemId) -> Result<Option<Item>, Error> {
        self.items
            .find_by_id(item_id)
            .await
            .map_err(map_item_repository_error)
    }

    async fn views_of(&self, items: Vec<Item>) -> Result<Vec<ItemView>, Error> {
        let ids: Vec<UserId> = items
            .iter()
            .flat_map(|item| std::iter::once(item.reported_by()).chain(item.claimed_by()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let parties: HashMap<UserId, PartySummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_by_ids(&ids)
                .await
                .map_err(map_user_repository_error)?
                .iter()
                .map(|user| (user.id(), PartySummary::from(user)))
                .collect()
        };

        Ok(items
            .into_iter()
            .map(|item| ItemView {
                reporter: parties.get(&item.reported_by()).cloned(),
                claimant: item.claimed_by().and_then(|id| parties.get(&id).cloned()),
                item,
            })
            .collect())
    }

    async fn view_of(&self, item: Item) -> Result<ItemView, Error> {
        let fallback = item.clone();
        Ok(self
            .views_of(vec![item])
            .await?
            .into_iter()
            .next()
            .unwrap_or(ItemView {
                item: fallback,
                reporter: None,
                claimant: None,
            }))
    }

    /// Explain why a conditional claim write matched no row.
    async fn explain_conflict(&self, transition: &ClaimTransition) -> Error {
        let fresh = match self.load(&transition.item_id).await {
            Ok(fresh) => fresh,
            Err(err) => return err,
        };
        match evaluate_claim(fresh.as_ref(), transition.claimant, self.clock.utc()) {
            Err(err) => map_lifecycle_error(err),
            Ok(_) => map_lifecycle_error(LifecycleError::InvalidState {
                status: transition.expected_status,
            }),
        }
    }

    async fn notify(&self, transition: &ClaimTransition, view: &ItemView) -> NotificationOutcome {
        let item_id = transition.item_id;
        let (Some(owner), Some(finder)) = (view.reporter.as_ref(), view.claimant.as_ref()) else {
            warn!(%item_id, "claim notification skipped: reporter or claimant not found");
            return NotificationOutcome::Failed;
        };
        let notice = ClaimNotice {
            owner_email: owner.email.clone(),
            owner_name: owner.name.clone(),
            finder_name: finder.name.clone(),
            finder_email: finder.email.clone(),
            claimant_role: transition.roles.claimant_role,
            item_title: view.item.title().to_owned(),
            item_description: view.item.description().to_owned(),
            item_location: view.item.location().to_owned(),
            event_date: view.item.event_date(),
        };
        match self.notifier.notify_owner_item_claimed(&notice).await {
            Ok(()) => NotificationOutcome::Sent,
            Err(error) => {
                warn!(%item_id, %error, "claim notification failed");
                NotificationOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl<I, U, N> ItemCommand for ItemService<I, U, N>
where
    I: ItemRepository,
    U: UserRepository,
    N: ClaimNotifier,
{
    async fn create_item(&self, request: CreateItemRequest) -> Result<ItemView, Error> {
        let CreateItemRequest { reporter, draft } = request;
        let item = evaluate_creation(draft, reporter, self.clock.utc())
            .map_err(map_lifecycle_error)?;
        self.items
            .insert(&item)
            .await
            .map_err(map_item_repository_error)?;
        info!(item_id = %item.id(), status = %item.status(), "item reported");
        self.view_of(item).await
    }

    async fn claim_item(&self, request: ClaimItemRequest) -> Result<ClaimItemResponse, Error> {
        let current = self.load(&request.item_id).await?;
        let transition = evaluate_claim(current.as_ref(), request.claimant, self.clock.utc())
            .map_err(map_lifecycle_error)?;

        let claimed = match self
            .items
            .apply_claim(&transition)
            .await
            .map_err(map_item_repository_error)?
        {
            ClaimWrite::Applied(item) => item,
            ClaimWrite::Conflict => return Err(self.explain_conflict(&transition).await),
        };
        info!(item_id = %claimed.id(), claimant = %transition.claimant, "item claimed");

        // The claim is committed; party lookup failures only cost the side note.
        let view = match self.view_of(claimed.clone()).await {
            Ok(view) => view,
            Err(error) => {
                warn!(item_id = %claimed.id(), %error, "claimed item parties unavailable");
                return Ok(ClaimItemResponse {
                    item: ItemView {
                        item: claimed,
                        reporter: None,
                        claimant: None,
                    },
                    notification: NotificationOutcome::Failed,
                });
            }
        };
        let notification = self.notify(&transition, &view).await;
        Ok(ClaimItemResponse {
            item: view,
            notification,
        })
    }

    async fn delete_item(&self, request: DeleteItemRequest) -> Result<(), Error> {
        let current = self.load(&request.item_id).await?;
        evaluate_deletion(current.as_ref(), request.requester).map_err(map_lifecycle_error)?;
        let deleted = self
            .items
            .delete(&request.item_id)
            .await
            .map_err(map_item_repository_error)?;
        if !deleted {
            return Err(map_lifecycle_error(LifecycleError::NotFound));
        }
        info!(item_id = %request.item_id, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl<I, U, N> ItemQuery for ItemService<I, U, N>
where
    I: ItemRepository,
    U: UserRepository,
    N: ClaimNotifier,
{
    async fn list_items(&self, query: ItemListQuery) -> Result<Vec<ItemView>, Error> {
        let items = self
            .items
            .list(&query)
            .await
            .map_err(map_item_repository_error)?;
        self.views_of(items).await
    }

    async fn get_item(&self, item_id: ItemId) -> Result<ItemView, Error> {
        let item = self
            .load(&item_id)
            .await?
            .ok_or_else(|| map_lifecycle_error(LifecycleError::NotFound))?;
        self.view_of(item).await
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
