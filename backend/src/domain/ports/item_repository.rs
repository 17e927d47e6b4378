//! Port for item persistence adapters.
//!
//! Claims are committed through [`ItemRepository::apply_claim`], which must
//! be a single conditional write: status and claimant change together, and
//! only while the stored status still equals
//! [`ClaimTransition::expected_status`]. Of several concurrent claims on the
//! same item exactly one observes [`ClaimWrite::Applied`].

use async_trait::async_trait;

use crate::domain::lifecycle::ClaimTransition;
use crate::domain::{Item, ItemId, ItemListQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Driver error text.
            message: String,
        } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Driver error text.
            message: String,
        } => "item repository query failed: {message}",
    }
}

/// Outcome of a conditional claim write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimWrite {
    /// The guard held and the claim was stored.
    Applied(Item),
    /// The item changed or vanished since it was read; nothing was written.
    Conflict,
}

/// Port for item storage and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Find an item by identifier.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// List items matching `query`, newest first.
    async fn list(&self, query: &ItemListQuery) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Store a newly created item.
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Commit a claim if the item still has the expected status.
    async fn apply_claim(
        &self,
        transition: &ClaimTransition,
    ) -> Result<ClaimWrite, ItemRepositoryError>;

    /// Delete an item.
    ///
    /// Returns `true` when a row was deleted and `false` when the item did not
    /// exist.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError>;
}

/// Fixture implementation for tests that do not exercise item persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemRepository;

#[async_trait]
impl ItemRepository for FixtureItemRepository {
    async fn find_by_id(&self, _id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(None)
    }

    async fn list(&self, _query: &ItemListQuery) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _item: &Item) -> Result<(), ItemRepositoryError> {
        Ok(())
    }

    async fn apply_claim(
        &self,
        _transition: &ClaimTransition,
    ) -> Result<ClaimWrite, ItemRepositoryError> {
        Ok(ClaimWrite::Conflict)
    }

    async fn delete(&self, _id: &ItemId) -> Result<bool, ItemRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_are_empty() {
        let repo = FixtureItemRepository;
        assert!(
            repo.find_by_id(&ItemId::random())
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
        assert!(
            repo.list(&ItemListQuery::default())
                .await
                .expect("fixture list succeeds")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_delete_reports_missing() {
        let deleted = FixtureItemRepository
            .delete(&ItemId::random())
            .await
            .expect("fixture delete succeeds");
        assert!(!deleted);
    }

    #[rstest]
    fn error_constructors_accept_str() {
        let err = ItemRepositoryError::connection("refused");
        assert_eq!(err.to_string(), "item repository connection failed: refused");
    }
}
