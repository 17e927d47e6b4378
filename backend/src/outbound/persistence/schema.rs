//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Campus user accounts, created on first login.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Lower-cased institutional email address (unique).
        email -> Text,
        /// Display name supplied by the identity provider.
        display_name -> Text,
        /// Optional avatar URL.
        image -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reported lost and found items.
    ///
    /// `CHECK` constraints mirror the domain invariants: `claimed_by` is set
    /// exactly when `status = 'claimed'`, and never equals `reported_by`.
    items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Short title.
        title -> Text,
        /// Free-text description.
        description -> Text,
        /// One of the fixed category names.
        category -> Varchar,
        /// Where the item was lost or found.
        location -> Text,
        /// Day the item was lost or found.
        event_date -> Date,
        /// Ordered image URLs.
        images -> Array<Text>,
        /// How to reach the reporter.
        contact_info -> Text,
        /// `lost`, `found` or `claimed`.
        status -> Varchar,
        /// Reporting user.
        reported_by -> Uuid,
        /// Claiming user, set by the claim transition.
        claimed_by -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(items, users);
