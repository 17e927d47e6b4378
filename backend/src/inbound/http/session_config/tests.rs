//! Unit tests for session configuration validation.

use std::io::Write;

use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'a'; len]).expect("write key bytes");
    file
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_toggles(key: &NamedTempFile) -> SessionToggles {
    SessionToggles {
        key_file: Some(key.path().to_path_buf()),
        cookie_secure: Some("1".to_owned()),
        same_site: Some("Strict".to_owned()),
        allow_ephemeral: Some("0".to_owned()),
    }
}

fn expect_error(toggles: &SessionToggles, mode: BuildMode) -> SessionConfigError {
    match session_settings(toggles, mode) {
        Ok(_) => panic!("expected {toggles:?} to be rejected in {mode:?}"),
        Err(error) => error,
    }
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
    CookieSecure,
    SameSite,
    AllowEphemeral,
}

fn set(toggles: &mut SessionToggles, toggle: Toggle, value: Option<&str>) {
    let slot = match toggle {
        Toggle::CookieSecure => &mut toggles.cookie_secure,
        Toggle::SameSite => &mut toggles.same_site,
        Toggle::AllowEphemeral => &mut toggles.allow_ephemeral,
    };
    *slot = value.map(str::to_owned);
}

#[rstest]
fn release_accepts_complete_settings(release_key: NamedTempFile) {
    let settings =
        session_settings(&release_toggles(&release_key), BuildMode::Release).expect("valid");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(Toggle::CookieSecure, COOKIE_SECURE_NAME)]
#[case(Toggle::SameSite, SAME_SITE_NAME)]
#[case(Toggle::AllowEphemeral, ALLOW_EPHEMERAL_NAME)]
fn release_rejects_missing_toggles(
    release_key: NamedTempFile,
    #[case] toggle: Toggle,
    #[case] expected: &str,
) {
    let mut toggles = release_toggles(&release_key);
    set(&mut toggles, toggle, None);

    let error = expect_error(&toggles, BuildMode::Release);
    assert!(
        matches!(error, SessionConfigError::Missing { name } if name == expected),
        "unexpected error {error:?}"
    );
}

#[rstest]
#[case(Toggle::CookieSecure, "maybe")]
#[case(Toggle::CookieSecure, "")]
#[case(Toggle::SameSite, "sometimes")]
#[case(Toggle::AllowEphemeral, "perhaps")]
fn release_rejects_malformed_toggles(
    release_key: NamedTempFile,
    #[case] toggle: Toggle,
    #[case] value: &str,
) {
    let mut toggles = release_toggles(&release_key);
    set(&mut toggles, toggle, Some(value));

    let error = expect_error(&toggles, BuildMode::Release);
    assert!(
        matches!(error, SessionConfigError::Invalid { .. }),
        "unexpected error {error:?}"
    );
}

#[rstest]
fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
    let mut toggles = release_toggles(&release_key);
    set(&mut toggles, Toggle::AllowEphemeral, Some("yes"));
    assert!(matches!(
        expect_error(&toggles, BuildMode::Release),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(release_key: NamedTempFile) {
    let mut toggles = release_toggles(&release_key);
    set(&mut toggles, Toggle::CookieSecure, Some("0"));
    set(&mut toggles, Toggle::SameSite, Some("None"));
    assert!(matches!(
        expect_error(&toggles, BuildMode::Release),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_rejects_short_key() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let error = expect_error(&release_toggles(&short), BuildMode::Release);
    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort { length, min_len, .. }
            if length == SESSION_KEY_MIN_LEN - 1 && min_len == SESSION_KEY_MIN_LEN
    ));
}

#[rstest]
fn release_rejects_unreadable_key(release_key: NamedTempFile) {
    let mut toggles = release_toggles(&release_key);
    toggles.key_file = Some(std::env::temp_dir().join("lostfound-no-such-key"));
    assert!(matches!(
        expect_error(&toggles, BuildMode::Release),
        SessionConfigError::KeyRead { .. }
    ));
}

#[rstest]
fn debug_defaults_everything_and_generates_a_key() {
    let toggles = SessionToggles {
        key_file: Some(std::env::temp_dir().join("lostfound-no-such-key")),
        ..SessionToggles::default()
    };
    let settings = session_settings(&toggles, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_keeps_explicit_values() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let toggles = SessionToggles {
        key_file: Some(key.path().to_path_buf()),
        cookie_secure: Some("false".to_owned()),
        same_site: Some("none".to_owned()),
        allow_ephemeral: Some("y".to_owned()),
    };
    let settings = session_settings(&toggles, BuildMode::Debug).expect("debug settings");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn debug_still_refuses_keys_too_short_to_derive() {
    let tiny = key_file(8);
    let toggles = SessionToggles {
        key_file: Some(tiny.path().to_path_buf()),
        ..SessionToggles::default()
    };
    assert!(matches!(
        expect_error(&toggles, BuildMode::Debug),
        SessionConfigError::KeyTooShort { .. }
    ));
}
