//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    AuthenticatedIdentity, EmailAddress, Item, ItemCategory, ItemId, ItemParts, ItemStatus,
    NewUser, User, UserId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 17, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn identity(email: &str, name: Option<&str>) -> AuthenticatedIdentity {
    AuthenticatedIdentity {
        email: EmailAddress::new(email).expect("valid fixture email"),
        name: name.map(str::to_owned),
        image: None,
    }
}

pub(crate) fn user(email: &str, name: &str) -> User {
    User::from_new(NewUser::from_identity(
        &identity(email, Some(name)),
        fixture_timestamp(),
    ))
}

pub(crate) fn item(reporter: UserId, status: ItemStatus, claimant: Option<UserId>) -> Item {
    Item::new(ItemParts {
        id: ItemId::random(),
        title: "Black wallet".to_owned(),
        description: "Leather, has a library card".to_owned(),
        category: ItemCategory::Accessories,
        location: "Cafeteria".to_owned(),
        event_date: NaiveDate::from_ymd_opt(2025, 10, 16).expect("valid fixture date"),
        images: Vec::new(),
        contact_info: "Hostel B, room 12".to_owned(),
        status,
        reported_by: reporter,
        claimed_by: claimant,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    })
    .expect("valid fixture item")
}
