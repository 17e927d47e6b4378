//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, ItemCategory, ItemId, ItemListQuery, ItemStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidStatus,
    InvalidCategory,
    InvalidAction,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidCategory => "invalid_category",
            Self::InvalidAction => "invalid_action",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(
    message: impl Into<String>,
    field: FieldName,
    code: ErrorCode,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse an item identifier taken from the request path.
pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, Error> {
    ItemId::new(raw).map_err(|_| {
        invalid_value(
            "id must be a valid UUID",
            FieldName::new("id"),
            ErrorCode::InvalidUuid,
            raw,
        )
    })
}

/// Reject claim bodies whose action is anything but `claim`.
pub(crate) fn require_claim_action(action: &str) -> Result<(), Error> {
    if action == "claim" {
        return Ok(());
    }
    Err(invalid_value(
        "Invalid action",
        FieldName::new("action"),
        ErrorCode::InvalidAction,
        action,
    ))
}

/// Raw listing filters as they arrive in the query string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct RawListFilters<'a> {
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub search: Option<&'a str>,
}

/// Build a validated listing query.
///
/// - `status` defaults to `lost`.
/// - `category` absent, blank or `all` means every category.
/// - `search` is trimmed; blank means no text filter.
pub(crate) fn parse_list_filters(raw: RawListFilters<'_>) -> Result<ItemListQuery, Error> {
    let status = match raw.status.map(str::trim).filter(|value| !value.is_empty()) {
        None => ItemStatus::Lost,
        Some(value) => value.parse::<ItemStatus>().map_err(|_| {
            invalid_value(
                "status must be one of lost, found or claimed",
                FieldName::new("status"),
                ErrorCode::InvalidStatus,
                value,
            )
        })?,
    };
    let category = match raw.category.map(str::trim).filter(|value| !value.is_empty()) {
        None => None,
        Some(value) if value.eq_ignore_ascii_case("all") => None,
        Some(value) => Some(value.parse::<ItemCategory>().map_err(|_| {
            invalid_value(
                "Unknown category",
                FieldName::new("category"),
                ErrorCode::InvalidCategory,
                value,
            )
        })?),
    };
    let search = raw
        .search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    Ok(ItemListQuery {
        status,
        category,
        search,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    fn detail_code(error: &Error) -> Option<&str> {
        error.details().and_then(|d| d.get("code")).and_then(Value::as_str)
    }

    #[rstest]
    fn defaults_list_lost_items_of_any_category() {
        let query = parse_list_filters(RawListFilters::default()).expect("defaults");
        assert_eq!(query, ItemListQuery::default());
    }

    #[rstest]
    #[case(Some("all"), None)]
    #[case(Some("ALL"), None)]
    #[case(Some("  "), None)]
    #[case(Some("Books"), Some(ItemCategory::Books))]
    fn category_filter_is_optional(
        #[case] raw: Option<&str>,
        #[case] expected: Option<ItemCategory>,
    ) {
        let query = parse_list_filters(RawListFilters {
            category: raw,
            ..RawListFilters::default()
        })
        .expect("valid filters");
        assert_eq!(query.category, expected);
    }

    #[rstest]
    fn search_is_trimmed_and_blank_is_ignored() {
        let query = parse_list_filters(RawListFilters {
            status: Some("found"),
            search: Some("  wallet "),
            ..RawListFilters::default()
        })
        .expect("valid filters");
        assert_eq!(query.status, ItemStatus::Found);
        assert_eq!(query.search.as_deref(), Some("wallet"));

        let blank = parse_list_filters(RawListFilters {
            search: Some("   "),
            ..RawListFilters::default()
        })
        .expect("valid filters");
        assert!(blank.search.is_none());
    }

    #[rstest]
    #[case(RawListFilters { status: Some("banana"), ..RawListFilters::default() }, "invalid_status")]
    #[case(RawListFilters { category: Some("Furniture"), ..RawListFilters::default() }, "invalid_category")]
    fn unknown_filter_values_are_rejected(
        #[case] raw: RawListFilters<'static>,
        #[case] expected: &str,
    ) {
        let error = parse_list_filters(raw).expect_err("invalid filter");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail_code(&error), Some(expected));
    }

    #[rstest]
    fn malformed_item_id_is_rejected() {
        let error = parse_item_id("not-a-uuid").expect_err("invalid id");
        assert_eq!(detail_code(&error), Some("invalid_uuid"));
    }

    #[rstest]
    #[case("claim", true)]
    #[case("Claim", false)]
    #[case("update", false)]
    #[case("", false)]
    fn only_claim_action_is_accepted(#[case] action: &str, #[case] accepted: bool) {
        let result = require_claim_action(action);
        assert_eq!(result.is_ok(), accepted);
        if let Err(error) = result {
            assert_eq!(error.message(), "Invalid action");
        }
    }
}
