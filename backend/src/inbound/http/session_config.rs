//! Session cookie configuration and validation.
//!
//! Raw toggles arrive from the service configuration as optional strings.
//! Debug builds fall back to permissive defaults with a warning; release
//! builds refuse anything missing or malformed.

pub mod fingerprint;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Path read when no key file is configured.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length accepted by release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest key material `Key::derive_from` accepts in any build.
const KEY_DERIVE_MIN_LEN: usize = 32;

/// Setting that controls the cookie `Secure` flag.
pub const COOKIE_SECURE_NAME: &str = "session_cookie_secure";
/// Setting that selects the `SameSite` policy.
pub const SAME_SITE_NAME: &str = "session_same_site";
/// Setting that permits a generated key when the key file is absent.
pub const ALLOW_EPHEMERAL_NAME: &str = "session_allow_ephemeral";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAME_SITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lostfound::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub const fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles as read from configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionToggles {
    /// File holding the key material.
    pub key_file: Option<PathBuf>,
    /// Whether cookies carry the `Secure` flag.
    pub cookie_secure: Option<String>,
    /// `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Whether a generated key may stand in for a missing key file.
    pub allow_ephemeral: Option<String>,
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required setting is missing.
    #[error("missing required setting: {name}")]
    Missing {
        /// Setting name.
        name: &'static str,
    },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file path.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("session_same_site=None requires session_cookie_secure=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("session_allow_ephemeral must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Validate toggles for the given build mode and load the key.
///
/// # Errors
///
/// Release builds fail on any missing or malformed toggle, on an unreadable
/// key file and on keys shorter than [`SESSION_KEY_MIN_LEN`].
///
/// # Examples
///
/// ```rust
/// use lostfound::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("lostfound_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path.clone()),
///     cookie_secure: Some("1".to_owned()),
///     same_site: Some("Strict".to_owned()),
///     allow_ephemeral: Some("0".to_owned()),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_cookie_secure(toggles.cookie_secure.as_deref(), mode)?;
    let same_site = parse_same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = parse_allow_ephemeral(toggles.allow_ephemeral.as_deref(), mode)?;
    let key = load_key(toggles.key_file.clone(), mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn fallback_or<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "session setting defaulted");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_cookie_secure(raw: Option<&str>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = raw else {
        return fallback_or(mode, true, SessionConfigError::Missing {
            name: COOKIE_SECURE_NAME,
        });
    };
    match parse_bool(value) {
        Some(flag) => Ok(flag),
        None => fallback_or(mode, true, SessionConfigError::Invalid {
            name: COOKIE_SECURE_NAME,
            value: value.to_owned(),
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_same_site(
    raw: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = raw else {
        return fallback_or(mode, default_same_site, SessionConfigError::Missing {
            name: SAME_SITE_NAME,
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => fallback_or(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => fallback_or(mode, default_same_site, SessionConfigError::Invalid {
            name: SAME_SITE_NAME,
            value: value.to_owned(),
            expected: SAME_SITE_EXPECTED,
        }),
    }
}

fn parse_allow_ephemeral(raw: Option<&str>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let Some(value) = raw else {
        return fallback_or(mode, false, SessionConfigError::Missing {
            name: ALLOW_EPHEMERAL_NAME,
        });
    };
    match parse_bool(value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(SessionConfigError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None => fallback_or(mode, false, SessionConfigError::Invalid {
            name: ALLOW_EPHEMERAL_NAME,
            value: value.to_owned(),
            expected: BOOL_EXPECTED,
        }),
    }
}

fn load_key(
    key_file: Option<PathBuf>,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = key_file.unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_debug() {
                KEY_DERIVE_MIN_LEN
            } else {
                SESSION_KEY_MIN_LEN
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
