//! Campus user accounts.
//!
//! Users are created lazily from the identity asserted by the upstream login
//! provider and are never mutated afterwards. Only addresses in the
//! institution's email domain may own an account.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain used when no institution domain is configured.
pub const DEFAULT_INSTITUTION_DOMAIN: &str = "klh.edu.in";
/// Name shown for users whose identity provider supplied none.
pub const FALLBACK_DISPLAY_NAME: &str = "Campus Student";
/// Maximum accepted display name length, in characters.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The email address is not of the form `local@domain`.
    #[error("email address is malformed")]
    MalformedEmail,
    /// The address belongs to a domain other than the institution's.
    #[error("only @{domain} email addresses are allowed")]
    ForeignEmailDomain {
        /// Domain accepted by this deployment.
        domain: String,
    },
    /// The configured institution domain is blank or contains `@`.
    #[error("institution domain must be a bare domain name")]
    InvalidInstitutionDomain,
    /// The display name is blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// The display name is too long.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum length in characters.
        max: usize,
    },
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual UUID form.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidId`] for non-UUID input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lower-cased, syntactically valid email address.
///
/// Membership of the institution domain is a separate policy check, see
/// [`InstitutionDomain::admit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an address.
    ///
    /// # Errors
    /// Returns [`UserValidationError::MalformedEmail`] unless the input has a
    /// non-empty local part, exactly one `@`, a dotted domain and no spaces.
    ///
    /// # Examples
    /// ```
    /// use lostfound::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new(" Asha@KLH.edu.in ").expect("valid email");
    /// assert_eq!(email.as_ref(), "asha@klh.edu.in");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_ascii_lowercase();
        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::MalformedEmail);
        };
        let well_formed = !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !normalised.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }

    /// Domain part of the address.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email domain whose addresses may hold accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionDomain(String);

impl InstitutionDomain {
    /// Validate a bare domain name such as `klh.edu.in`.
    ///
    /// # Errors
    /// Returns [`UserValidationError::InvalidInstitutionDomain`] for blank
    /// input or input containing `@`.
    pub fn new(domain: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = domain
            .as_ref()
            .trim()
            .trim_start_matches('@')
            .to_ascii_lowercase();
        if normalised.is_empty()
            || normalised.contains('@')
            || normalised.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidInstitutionDomain);
        }
        Ok(Self(normalised))
    }

    /// Accept `email` only when it belongs to this domain.
    ///
    /// # Errors
    /// Returns [`UserValidationError::ForeignEmailDomain`] otherwise.
    ///
    /// # Examples
    /// ```
    /// use lostfound::domain::{EmailAddress, InstitutionDomain};
    ///
    /// let domain = InstitutionDomain::default();
    /// let email = EmailAddress::new("ravi@gmail.com").expect("valid email");
    /// assert!(domain.admit(&email).is_err());
    /// ```
    pub fn admit(&self, email: &EmailAddress) -> Result<(), UserValidationError> {
        if email.domain() == self.0 {
            Ok(())
        } else {
            Err(UserValidationError::ForeignEmailDomain {
                domain: self.0.clone(),
            })
        }
    }
}

impl Default for InstitutionDomain {
    fn default() -> Self {
        Self(DEFAULT_INSTITUTION_DOMAIN.to_owned())
    }
}

impl AsRef<str> for InstitutionDomain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Human readable name for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns an error for blank or overlong names.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Use `name` when it is valid, otherwise [`FALLBACK_DISPLAY_NAME`].
    #[must_use]
    pub fn or_fallback(name: Option<&str>) -> Self {
        name.and_then(|raw| Self::new(raw).ok())
            .unwrap_or_else(|| Self(FALLBACK_DISPLAY_NAME.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity asserted by the trusted upstream login provider.
///
/// The core trusts these claims as-is; only the email domain policy is
/// applied before an account is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    /// Caller's email address.
    pub email: EmailAddress,
    /// Display name supplied by the provider, if any.
    pub name: Option<String>,
    /// Avatar URL supplied by the provider, if any.
    pub image: Option<String>,
}

/// Values required to create a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identifier assigned to the new record.
    pub id: UserId,
    /// Unique institutional email address.
    pub email: EmailAddress,
    /// Display name.
    pub display_name: DisplayName,
    /// Optional avatar URL.
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Build a record for `identity` under a fresh identifier.
    #[must_use]
    pub fn from_identity(identity: &AuthenticatedIdentity, created_at: DateTime<Utc>) -> Self {
        Self {
            id: UserId::random(),
            email: identity.email.clone(),
            display_name: DisplayName::or_fallback(identity.name.as_deref()),
            image: identity
                .image
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_owned),
            created_at,
        }
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    display_name: DisplayName,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub const fn new(
        id: UserId,
        email: EmailAddress,
        display_name: DisplayName,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            image,
            created_at,
        }
    }

    /// Materialise a freshly created record.
    #[must_use]
    pub fn from_new(new_user: NewUser) -> Self {
        let NewUser {
            id,
            email,
            display_name,
            image,
            created_at,
        } = new_user;
        Self::new(id, email, display_name, image, created_at)
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Unique email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Optional avatar URL.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Tests for user value types and the domain policy.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asha@klh.edu.in", "asha@klh.edu.in")]
    #[case("  Ravi.K@KLH.EDU.IN ", "ravi.k@klh.edu.in")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
        assert_eq!(email.domain(), "klh.edu.in");
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@klh.edu.in")]
    #[case("a@b@klh.edu.in")]
    #[case("asha@localhost")]
    #[case("as ha@klh.edu.in")]
    fn malformed_emails_are_rejected(#[case] raw: &str) {
        assert_eq!(
            EmailAddress::new(raw),
            Err(UserValidationError::MalformedEmail)
        );
    }

    #[rstest]
    #[case("asha@klh.edu.in", true)]
    #[case("asha@gmail.com", false)]
    #[case("asha@sub.klh.edu.in", false)]
    #[case("asha@notklh.edu.in", false)]
    fn default_domain_admits_only_institution_addresses(#[case] raw: &str, #[case] admitted: bool) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(InstitutionDomain::default().admit(&email).is_ok(), admitted);
    }

    #[rstest]
    fn foreign_domain_error_names_the_institution() {
        let domain = InstitutionDomain::new("@Example.EDU").expect("valid domain");
        let email = EmailAddress::new("x@klh.edu.in").expect("valid email");
        let err = domain.admit(&email).expect_err("foreign domain");
        assert_eq!(err.to_string(), "only @example.edu email addresses are allowed");
    }

    #[rstest]
    #[case("")]
    #[case("a@b")]
    fn invalid_institution_domains_are_rejected(#[case] raw: &str) {
        assert_eq!(
            InstitutionDomain::new(raw),
            Err(UserValidationError::InvalidInstitutionDomain)
        );
    }

    #[rstest]
    #[case(None, FALLBACK_DISPLAY_NAME)]
    #[case(Some("   "), FALLBACK_DISPLAY_NAME)]
    #[case(Some(" Asha Rao "), "Asha Rao")]
    fn display_name_falls_back(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(DisplayName::or_fallback(raw).as_ref(), expected);
    }

    #[rstest]
    fn overlong_display_name_is_rejected() {
        let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
        assert_eq!(
            DisplayName::new(raw),
            Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            })
        );
    }

    #[rstest]
    fn new_user_from_identity_drops_blank_image() {
        let identity = AuthenticatedIdentity {
            email: EmailAddress::new("asha@klh.edu.in").expect("valid email"),
            name: Some("Asha".to_owned()),
            image: Some("  ".to_owned()),
        };
        let new_user = NewUser::from_identity(&identity, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(new_user.display_name.as_ref(), "Asha");
        assert!(new_user.image.is_none());
    }

    #[rstest]
    fn user_id_rejects_non_uuid() {
        assert_eq!(UserId::new("nope"), Err(UserValidationError::InvalidId));
    }
}
