//! Behaviour tests for claiming lost and found items.
//!
//! Scenarios drive the item and account services over the in-memory
//! repositories and observe notifications through a recording notifier.

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lostfound::domain::ports::{
    ClaimItemRequest, ClaimItemResponse, ClaimNotice, ClaimNotifier, ClaimNotifierError,
    CreateItemRequest, ItemCommand, ItemQuery, UserAccounts,
};
use lostfound::domain::{
    AuthenticatedIdentity, EmailAddress, Error, InstitutionDomain, ItemDraft, ItemId,
    ItemService, ItemStatus, User, UserAccountService,
};
use lostfound::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use tokio::runtime::Runtime;

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<ClaimNotice>>,
}

impl RecordingNotifier {
    fn count(&self) -> usize {
        self.notices.lock().map(|notices| notices.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ClaimNotifier for RecordingNotifier {
    async fn notify_owner_item_claimed(
        &self,
        notice: &ClaimNotice,
    ) -> Result<(), ClaimNotifierError> {
        self.notices
            .lock()
            .map_err(|_| ClaimNotifierError::delivery("recorder poisoned"))?
            .push(notice.clone());
        Ok(())
    }
}

type Items = ItemService<InMemoryItemRepository, InMemoryUserRepository, RecordingNotifier>;

struct ClaimWorld {
    runtime: Runtime,
    items: Items,
    accounts: UserAccountService<InMemoryUserRepository>,
    notifier: Arc<RecordingNotifier>,
    item_id: RefCell<Option<ItemId>>,
    outcome: RefCell<Option<Result<ClaimItemResponse, Error>>>,
}

impl ClaimWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        let users = Arc::new(InMemoryUserRepository::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let items = ItemService::new(
            Arc::new(InMemoryItemRepository::new()),
            Arc::clone(&users),
            Arc::clone(&notifier),
            Arc::new(DefaultClock),
        );
        let accounts =
            UserAccountService::new(users, InstitutionDomain::default(), Arc::new(DefaultClock));
        Self {
            runtime,
            items,
            accounts,
            notifier,
            item_id: RefCell::new(None),
            outcome: RefCell::new(None),
        }
    }

    fn account(&self, email: &str) -> User {
        let identity = AuthenticatedIdentity {
            email: EmailAddress::new(email).expect("valid email"),
            name: None,
            image: None,
        };
        self.runtime
            .block_on(self.accounts.resolve(identity))
            .expect("campus account")
            .user
    }

    fn item_id(&self) -> ItemId {
        self.item_id.borrow().expect("item reported")
    }

    fn report(&self, status: &str, reporter: &str) {
        let reporter = self.account(reporter);
        let draft = ItemDraft {
            title: Some("Black umbrella".to_owned()),
            description: Some("Folding umbrella with a wooden handle".to_owned()),
            category: Some("Accessories".to_owned()),
            location: Some("Block C canteen".to_owned()),
            date: Some("2025-10-14".to_owned()),
            images: Vec::new(),
            contact_info: Some("Room 214, Block C".to_owned()),
            status: Some(status.to_owned()),
        };
        let view = self
            .runtime
            .block_on(self.items.create_item(CreateItemRequest {
                reporter: reporter.id(),
                draft,
            }))
            .expect("item created");
        *self.item_id.borrow_mut() = Some(view.item.id());
    }

    fn claim(&self, claimant: &str) -> Result<ClaimItemResponse, Error> {
        let claimant = self.account(claimant);
        self.runtime.block_on(self.items.claim_item(ClaimItemRequest {
            item_id: self.item_id(),
            claimant: claimant.id(),
        }))
    }
}

#[fixture]
fn world() -> ClaimWorld {
    ClaimWorld::new()
}

#[given("a {status} item reported by {reporter}")]
fn an_item_reported_by(world: &ClaimWorld, status: String, reporter: String) {
    world.report(&status, &reporter);
}

#[given("{claimant} has claimed the item")]
fn has_claimed_the_item(world: &ClaimWorld, claimant: String) {
    world.claim(&claimant).expect("first claim accepted");
}

#[when("{claimant} claims the item")]
fn claims_the_item(world: &ClaimWorld, claimant: String) {
    let outcome = world.claim(&claimant);
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("the item is claimed by {claimant}")]
fn the_item_is_claimed_by(world: &ClaimWorld, claimant: String) {
    let view = world
        .runtime
        .block_on(world.items.get_item(world.item_id()))
        .expect("item readable");
    assert_eq!(view.item.status(), ItemStatus::Claimed);
    let email = view.claimant.map(|party| party.email.as_ref().to_owned());
    assert_eq!(email.as_deref(), Some(claimant.as_str()));
}

#[then("the claim is refused with {code}")]
fn the_claim_is_refused_with(world: &ClaimWorld, code: String) {
    let outcome = world.outcome.borrow();
    let err = outcome
        .as_ref()
        .expect("claim attempted")
        .as_ref()
        .expect_err("claim refused");
    let detail = err
        .details()
        .and_then(|details| details.get("code"))
        .and_then(Value::as_str);
    assert_eq!(detail, Some(code.as_str()));
}

#[then("the reporter received {count} notifications")]
fn the_reporter_received_notifications(world: &ClaimWorld, count: usize) {
    assert_eq!(world.notifier.count(), count);
}

#[scenario(
    path = "tests/features/claim_lifecycle.feature",
    name = "A finder claims a lost item"
)]
fn a_finder_claims_a_lost_item(world: ClaimWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/claim_lifecycle.feature",
    name = "A reporter cannot claim their own item"
)]
fn a_reporter_cannot_claim_their_own_item(world: ClaimWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/claim_lifecycle.feature",
    name = "A claimed item cannot be claimed again"
)]
fn a_claimed_item_cannot_be_claimed_again(world: ClaimWorld) {
    drop(world);
}
