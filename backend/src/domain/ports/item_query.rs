//! Driving port for item read operations.

use async_trait::async_trait;

use crate::domain::{Error, ItemId, ItemListQuery, ItemView};

/// Driving port for listing and fetching items.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), lostfound::domain::Error> {
/// use lostfound::domain::ItemListQuery;
/// use lostfound::domain::ports::{FixtureItemQuery, ItemQuery};
///
/// let items = FixtureItemQuery.list_items(ItemListQuery::default()).await?;
/// assert!(items.is_empty());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemQuery: Send + Sync {
    /// List items matching `query`, newest first, with party summaries.
    async fn list_items(&self, query: ItemListQuery) -> Result<Vec<ItemView>, Error>;

    /// Fetch one item with party summaries.
    async fn get_item(&self, item_id: ItemId) -> Result<ItemView, Error>;
}

/// Fixture query that knows no items.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemQuery;

#[async_trait]
impl ItemQuery for FixtureItemQuery {
    async fn list_items(&self, _query: ItemListQuery) -> Result<Vec<ItemView>, Error> {
        Ok(Vec::new())
    }

    async fn get_item(&self, _item_id: ItemId) -> Result<ItemView, Error> {
        Err(Error::not_found("Item not found"))
    }
}
