//! Tests for the item service.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::lifecycle::ClaimantRole;
use crate::domain::ports::{
    ClaimNotifierError, MockClaimNotifier, MockItemRepository, MockUserRepository,
};
use crate::domain::test_support::{fixture_clock, fixture_timestamp, item, user};
use crate::domain::{ErrorCode, ItemDraft, ItemParts, ItemStatus, User};

type TestService = ItemService<MockItemRepository, MockUserRepository, MockClaimNotifier>;

fn service(
    items: MockItemRepository,
    users: MockUserRepository,
    notifier: MockClaimNotifier,
) -> TestService {
    ItemService::new(
        Arc::new(items),
        Arc::new(users),
        Arc::new(notifier),
        fixture_clock(),
    )
}

fn users_returning(found: Vec<User>) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_ids()
        .returning(move |ids| {
            Ok(found
                .iter()
                .filter(|user| ids.contains(&user.id()))
                .cloned()
                .collect())
        });
    users
}

fn draft() -> ItemDraft {
    ItemDraft {
        title: Some("Scientific calculator".to_owned()),
        description: Some("Casio fx-991EX, name on the back".to_owned()),
        category: Some("Electronics".to_owned()),
        location: Some("Block C, room 301".to_owned()),
        date: Some("2025-10-16".to_owned()),
        images: Vec::new(),
        contact_info: Some("9876543210".to_owned()),
        status: Some("banana".to_owned()),
    }
}

fn detail_code(error: &Error) -> Option<&serde_json::Value> {
    error.details().and_then(|details| details.get("code"))
}

#[rstest]
#[tokio::test]
async fn create_item_persists_and_embeds_reporter() {
    let reporter = user("asha@klh.edu.in", "Asha Rao");
    let reporter_id = reporter.id();
    let mut items = MockItemRepository::new();
    items.expect_insert().times(1).return_once(|_| Ok(()));

    let view = service(items, users_returning(vec![reporter]), MockClaimNotifier::new())
        .create_item(CreateItemRequest {
            reporter: reporter_id,
            draft: draft(),
        })
        .await
        .expect("item created");

    assert_eq!(view.item.status(), ItemStatus::Lost);
    assert_eq!(view.item.reported_by(), reporter_id);
    assert_eq!(view.item.created_at(), fixture_timestamp());
    assert_eq!(
        view.reporter.map(|party| party.name.to_string()),
        Some("Asha Rao".to_owned())
    );
    assert!(view.claimant.is_none());
}

#[rstest]
#[tokio::test]
async fn create_item_with_missing_fields_persists_nothing() {
    let mut items = MockItemRepository::new();
    items.expect_insert().times(0);

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .create_item(CreateItemRequest {
            reporter: UserId::random(),
            draft: ItemDraft {
                title: None,
                contact_info: Some(" ".to_owned()),
                ..draft()
            },
        })
        .await
        .expect_err("missing fields");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("missingFields")),
        Some(&json!(["title", "contactInfo"]))
    );
}

#[rstest]
#[tokio::test]
async fn claim_item_commits_and_notifies_reporter_about_claimant() {
    let owner = user("asha@klh.edu.in", "Asha Rao");
    let finder = user("ravi@klh.edu.in", "Ravi Kumar");
    let lost = item(owner.id(), ItemStatus::Lost, None);
    let item_id = lost.id();
    let finder_id = finder.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(lost)));
    items
        .expect_apply_claim()
        .times(1)
        .withf(move |transition| {
            transition.expected_status == ItemStatus::Lost && transition.claimant == finder_id
        })
        .returning(|transition| Ok(ClaimWrite::Applied(transition.claimed.clone())));

    let mut notifier = MockClaimNotifier::new();
    notifier
        .expect_notify_owner_item_claimed()
        .times(1)
        .withf(|notice| {
            notice.owner_email.as_ref() == "asha@klh.edu.in"
                && notice.finder_name.as_ref() == "Ravi Kumar"
                && notice.finder_email.as_ref() == "ravi@klh.edu.in"
                && notice.claimant_role == ClaimantRole::Finder
                && notice.item_title == "Black wallet"
        })
        .returning(|_| Ok(()));

    let response = service(items, users_returning(vec![owner, finder]), notifier)
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: finder_id,
        })
        .await
        .expect("claim succeeds");

    assert_eq!(response.item.item.status(), ItemStatus::Claimed);
    assert_eq!(response.item.item.claimed_by(), Some(finder_id));
    assert_eq!(
        response.item.claimant.map(|party| party.id),
        Some(finder_id)
    );
    assert_eq!(response.notification, NotificationOutcome::Sent);
}

#[rstest]
#[tokio::test]
async fn claim_item_survives_notification_failure() {
    let owner = user("asha@klh.edu.in", "Asha Rao");
    let finder = user("ravi@klh.edu.in", "Ravi Kumar");
    let found = item(owner.id(), ItemStatus::Found, None);
    let item_id = found.id();
    let finder_id = finder.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(found)));
    items
        .expect_apply_claim()
        .returning(|transition| Ok(ClaimWrite::Applied(transition.claimed.clone())));
    let mut notifier = MockClaimNotifier::new();
    notifier
        .expect_notify_owner_item_claimed()
        .times(1)
        .returning(|_| Err(ClaimNotifierError::delivery("connection reset")));

    let response = service(items, users_returning(vec![owner, finder]), notifier)
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: finder_id,
        })
        .await
        .expect("claim still succeeds");

    assert_eq!(response.item.item.status(), ItemStatus::Claimed);
    assert_eq!(response.notification, NotificationOutcome::Failed);
}

#[rstest]
#[tokio::test]
async fn claim_item_conflict_reports_invalid_state_after_reread() {
    let owner = user("asha@klh.edu.in", "Asha Rao");
    let rival = UserId::random();
    let claimant = UserId::random();
    let open = item(owner.id(), ItemStatus::Lost, None);
    let claimed_by_rival = Item::new(ItemParts {
        status: ItemStatus::Claimed,
        claimed_by: Some(rival),
        ..open.parts().clone()
    })
    .expect("valid claimed item");
    let item_id = open.id();

    let mut items = MockItemRepository::new();
    let mut reads = vec![Some(claimed_by_rival), Some(open)];
    items
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(reads.pop().flatten()));
    items
        .expect_apply_claim()
        .times(1)
        .returning(|_| Ok(ClaimWrite::Conflict));
    let mut notifier = MockClaimNotifier::new();
    notifier.expect_notify_owner_item_claimed().times(0);

    let error = service(items, MockUserRepository::new(), notifier)
        .claim_item(ClaimItemRequest { item_id, claimant })
        .await
        .expect_err("lost the race");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(detail_code(&error), Some(&json!("item_not_claimable")));
}

#[rstest]
#[tokio::test]
async fn claim_item_conflict_on_deleted_item_is_not_found() {
    let open = item(UserId::random(), ItemStatus::Found, None);
    let item_id = open.id();

    let mut items = MockItemRepository::new();
    let mut reads = vec![None, Some(open)];
    items
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(reads.pop().flatten()));
    items
        .expect_apply_claim()
        .returning(|_| Ok(ClaimWrite::Conflict));

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: UserId::random(),
        })
        .await
        .expect_err("item vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(ItemStatus::Lost)]
#[case(ItemStatus::Found)]
#[tokio::test]
async fn self_claim_is_refused_without_writing(#[case] status: ItemStatus) {
    let reporter = UserId::random();
    let own = item(reporter, status, None);
    let item_id = own.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(own)));
    items.expect_apply_claim().times(0);

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: reporter,
        })
        .await
        .expect_err("self claim");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "You cannot claim your own item");
    assert_eq!(detail_code(&error), Some(&json!("self_claim_forbidden")));
}

#[rstest]
#[tokio::test]
async fn claim_of_claimed_item_is_refused_without_writing() {
    let claimed = item(UserId::random(), ItemStatus::Claimed, Some(UserId::random()));
    let item_id = claimed.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(claimed)));
    items.expect_apply_claim().times(0);

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .claim_item(ClaimItemRequest {
            item_id,
            claimant: UserId::random(),
        })
        .await
        .expect_err("already claimed");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Item is not available for claiming");
}

#[rstest]
#[tokio::test]
async fn delete_by_non_reporter_is_forbidden() {
    let existing = item(UserId::random(), ItemStatus::Lost, None);
    let item_id = existing.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    items.expect_delete().times(0);

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .delete_item(DeleteItemRequest {
            item_id,
            requester: UserId::random(),
        })
        .await
        .expect_err("not the reporter");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_by_reporter_removes_item() {
    let reporter = UserId::random();
    let existing = item(reporter, ItemStatus::Claimed, Some(UserId::random()));
    let item_id = existing.id();

    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    items
        .expect_delete()
        .times(1)
        .withf(move |id| *id == item_id)
        .return_once(|_| Ok(true));

    service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .delete_item(DeleteItemRequest {
            item_id,
            requester: reporter,
        })
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn list_items_embeds_party_summaries() {
    let owner = user("asha@klh.edu.in", "Asha Rao");
    let finder = user("ravi@klh.edu.in", "Ravi Kumar");
    let listed = vec![
        item(owner.id(), ItemStatus::Claimed, Some(finder.id())),
        item(finder.id(), ItemStatus::Claimed, Some(owner.id())),
    ];

    let mut items = MockItemRepository::new();
    items
        .expect_list()
        .times(1)
        .withf(|query| query.status == ItemStatus::Claimed)
        .return_once(move |_| Ok(listed));

    let views = service(
        items,
        users_returning(vec![owner.clone(), finder.clone()]),
        MockClaimNotifier::new(),
    )
    .list_items(ItemListQuery {
        status: ItemStatus::Claimed,
        ..ItemListQuery::default()
    })
    .await
    .expect("listed");

    let parties: Vec<_> = views
        .iter()
        .map(|view| {
            (
                view.reporter.as_ref().map(|party| party.id),
                view.claimant.as_ref().map(|party| party.id),
            )
        })
        .collect();
    assert_eq!(
        parties,
        vec![
            (Some(owner.id()), Some(finder.id())),
            (Some(finder.id()), Some(owner.id())),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn get_missing_item_is_not_found() {
    let mut items = MockItemRepository::new();
    items.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .get_item(ItemId::random())
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn repository_connection_failure_is_service_unavailable() {
    let mut items = MockItemRepository::new();
    items
        .expect_list()
        .return_once(|_| Err(ItemRepositoryError::connection("pool timed out")));

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .list_items(ItemListQuery::default())
        .await
        .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn repository_query_failure_is_internal() {
    let mut items = MockItemRepository::new();
    items
        .expect_find_by_id()
        .return_once(|_| Err(ItemRepositoryError::query("syntax error")));

    let error = service(items, MockUserRepository::new(), MockClaimNotifier::new())
        .get_item(ItemId::random())
        .await
        .expect_err("internal");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
