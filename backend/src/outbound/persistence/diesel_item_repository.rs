//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! Claims are committed with a single guarded statement:
//!
//! ```sql
//! UPDATE items
//!    SET status = 'claimed', claimed_by = $claimant, updated_at = $now
//!  WHERE id = $id AND status = $expected
//! RETURNING *
//! ```
//!
//! PostgreSQL re-evaluates the `WHERE` clause after acquiring the row lock, so
//! of several concurrent claims only the first matches a row; the others see
//! zero rows and report [`ClaimWrite::Conflict`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::lifecycle::ClaimTransition;
use crate::domain::ports::{ClaimWrite, ItemRepository, ItemRepositoryError};
use crate::domain::{
    Item, ItemCategory, ItemId, ItemListQuery, ItemParts, ItemStatus, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ClaimChangeset, ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the item repository port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_basic_pool_error(error, ItemRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain item.
fn row_to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    let ItemRow {
        id,
        title,
        description,
        category,
        location,
        event_date,
        images,
        contact_info,
        status,
        reported_by,
        claimed_by,
        created_at,
        updated_at,
    } = row;

    let parsed_category = category
        .parse::<ItemCategory>()
        .map_err(|err| ItemRepositoryError::query(err.to_string()))?;
    let parsed_status = status
        .parse::<ItemStatus>()
        .map_err(|err| ItemRepositoryError::query(err.to_string()))?;

    Item::new(ItemParts {
        id: ItemId::from_uuid(id),
        title,
        description,
        category: parsed_category,
        location,
        event_date,
        images,
        contact_info,
        status: parsed_status,
        reported_by: UserId::from_uuid(reported_by),
        claimed_by: claimed_by.map(UserId::from_uuid),
        created_at,
        updated_at,
    })
    .map_err(|err| ItemRepositoryError::query(format!("stored item {id} is invalid: {err}")))
}

fn new_row(item: &Item) -> NewItemRow<'_> {
    NewItemRow {
        id: *item.id().as_uuid(),
        title: item.title(),
        description: item.description(),
        category: item.category().as_str(),
        location: item.location(),
        event_date: item.event_date(),
        images: item.images(),
        contact_info: item.contact_info(),
        status: item.status().as_str(),
        reported_by: *item.reported_by().as_uuid(),
        claimed_by: item.claimed_by().map(|id| *id.as_uuid()),
        created_at: item.created_at(),
        updated_at: item.updated_at(),
    }
}

/// Build an `ILIKE` pattern matching `needle` anywhere, escaping wildcards.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = items::table
            .filter(items::id.eq(id.as_uuid()))
            .select(ItemRow::as_select())
            .first::<ItemRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_item).transpose()
    }

    async fn list(&self, query: &ItemListQuery) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = items::table
            .filter(items::status.eq(query.status.as_str()))
            .into_boxed();
        if let Some(category) = query.category {
            statement = statement.filter(items::category.eq(category.as_str()));
        }
        if let Some(needle) = query.search.as_deref() {
            let pattern = contains_pattern(needle);
            statement = statement.filter(
                items::title
                    .ilike(pattern.clone())
                    .or(items::description.ilike(pattern.clone()))
                    .or(items::location.ilike(pattern)),
            );
        }

        let rows: Vec<ItemRow> = statement
            .order((items::created_at.desc(), items::id.asc()))
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(items::table)
            .values(&new_row(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn apply_claim(
        &self,
        transition: &ClaimTransition,
    ) -> Result<ClaimWrite, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ClaimChangeset {
            status: ItemStatus::Claimed.as_str(),
            claimed_by: Some(*transition.claimant.as_uuid()),
            updated_at: transition.claimed.updated_at(),
        };

        let row = diesel::update(
            items::table
                .filter(items::id.eq(transition.item_id.as_uuid()))
                .filter(items::status.eq(transition.expected_status.as_str())),
        )
        .set(&changes)
        .returning(ItemRow::as_returning())
        .get_result::<ItemRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match row {
            Some(updated) => row_to_item(updated).map(ClaimWrite::Applied),
            None => Ok(ClaimWrite::Conflict),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(items::table.filter(items::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
