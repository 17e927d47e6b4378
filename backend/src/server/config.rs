//! Service settings and the HTTP server configuration object.
//!
//! [`AppSettings`] is loaded through `OrthoConfig` from CLI flags, `LOSTFOUND_*`
//! environment variables and an optional configuration file. Its accessors
//! validate each group and supply the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use lostfound::domain::{InstitutionDomain, UserValidationError};
use lostfound::inbound::http::auth::LoginPolicy;
use lostfound::inbound::http::session_config::{BuildMode, SessionToggles};
use lostfound::outbound::notification::{SmtpSecurity, SmtpSettings};
use lostfound::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_FROM_NAME: &str = "KLH Lost & Found";

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The bind address does not parse.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The institution domain is unusable.
    #[error("invalid institution domain: {0}")]
    InstitutionDomain(#[from] UserValidationError),
    /// `mail_mode` is neither `smtp` nor `log`.
    #[error("invalid mail mode '{0}'; expected smtp|log")]
    MailMode(String),
    /// `smtp_security` is not one of the supported modes.
    #[error("invalid SMTP security '{0}'; expected tls|starttls|plain")]
    SmtpSecurity(String),
    /// SMTP delivery was requested without a sender address.
    #[error("mail_mode=smtp requires smtp_from_email or smtp_username")]
    MissingSender,
    /// Release builds refuse to issue sessions without provider proof.
    #[error("login_secret is required in release builds")]
    MissingLoginSecret,
}

/// How claim notifications leave the service.
#[derive(Debug, Clone)]
pub enum MailerSettings {
    /// Render the email and log it.
    Log {
        /// Dashboard link embedded in the message.
        dashboard_url: String,
    },
    /// Deliver through an SMTP relay.
    Smtp(SmtpSettings),
}

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOSTFOUND")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Email domain admitted at login.
    pub institution_domain: Option<String>,
    /// Public URL of the web front end.
    pub public_base_url: Option<String>,
    /// `smtp` or `log`.
    pub mail_mode: Option<String>,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    pub smtp_port: Option<u16>,
    /// `tls`, `starttls` or `plain`.
    pub smtp_security: Option<String>,
    /// SMTP login.
    pub smtp_username: Option<String>,
    /// SMTP password or app password.
    pub smtp_password: Option<String>,
    /// Sender address; defaults to the SMTP login.
    pub smtp_from_email: Option<String>,
    /// Sender display name.
    pub smtp_from_name: Option<String>,
    /// Path to the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Whether session cookies carry `Secure`.
    pub session_cookie_secure: Option<String>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Whether a generated key may replace a missing key file.
    pub session_allow_ephemeral: Option<String>,
    /// Bearer secret the identity provider presents at login.
    pub login_secret: Option<String>,
}

impl AppSettings {
    /// Listening address.
    ///
    /// # Errors
    /// [`ConfigError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Admitted email domain.
    ///
    /// # Errors
    /// [`ConfigError::InstitutionDomain`] for blank or malformed domains.
    pub fn institution_domain(&self) -> Result<InstitutionDomain, ConfigError> {
        match self.institution_domain.as_deref() {
            Some(domain) => Ok(InstitutionDomain::new(domain)?),
            None => Ok(InstitutionDomain::default()),
        }
    }

    /// Dashboard link used in notification emails.
    #[must_use]
    pub fn dashboard_url(&self) -> String {
        let base = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/dashboard")
    }

    /// Notification transport.
    ///
    /// # Errors
    /// Fails on an unknown mail mode or SMTP security value, and when SMTP is
    /// selected without any sender address.
    pub fn mailer(&self) -> Result<MailerSettings, ConfigError> {
        let mode = self
            .mail_mode
            .as_deref()
            .map_or_else(|| "log".to_owned(), str::to_ascii_lowercase);
        match mode.as_str() {
            "log" => Ok(MailerSettings::Log {
                dashboard_url: self.dashboard_url(),
            }),
            "smtp" => self.smtp_settings().map(MailerSettings::Smtp),
            _ => Err(ConfigError::MailMode(mode)),
        }
    }

    fn smtp_settings(&self) -> Result<SmtpSettings, ConfigError> {
        let security = match self.smtp_security.as_deref() {
            None => SmtpSecurity::Tls,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "tls" => SmtpSecurity::Tls,
                "starttls" => SmtpSecurity::StartTls,
                "plain" => SmtpSecurity::Plain,
                _ => return Err(ConfigError::SmtpSecurity(raw.to_owned())),
            },
        };
        let from_email = self
            .smtp_from_email
            .clone()
            .or_else(|| self.smtp_username.clone())
            .ok_or(ConfigError::MissingSender)?;
        Ok(SmtpSettings {
            host: self
                .smtp_host
                .clone()
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_owned()),
            port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            security,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from_email,
            from_name: self
                .smtp_from_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FROM_NAME.to_owned()),
            dashboard_url: self.dashboard_url(),
        })
    }

    /// Pool configuration for the configured database, if any.
    #[must_use]
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let config = PoolConfig::new(self.database_url.as_deref()?);
        Some(match self.database_max_connections {
            Some(max) => config.with_max_size(max),
            None => config,
        })
    }

    /// Proof demanded from the identity provider at login.
    ///
    /// Debug builds fall back to an open login, with a warning, when no
    /// secret is set.
    ///
    /// # Errors
    /// [`ConfigError::MissingLoginSecret`] in release builds without a
    /// non-blank secret.
    pub fn login_policy(&self, mode: BuildMode) -> Result<LoginPolicy, ConfigError> {
        match self.login_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(LoginPolicy::shared_secret(secret)),
            _ if mode == BuildMode::Release => Err(ConfigError::MissingLoginSecret),
            _ => {
                warn!("no login secret configured; any client may log in");
                Ok(LoginPolicy::Open)
            }
        }
    }

    /// Raw session toggles for validation against the build mode.
    #[must_use]
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}

/// Validated inputs for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) institution_domain: InstitutionDomain,
    pub(crate) mailer: MailerSettings,
    pub(crate) login_policy: LoginPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with in-memory storage, logged mail and an
    /// open login.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            institution_domain: InstitutionDomain::default(),
            mailer: MailerSettings::Log {
                dashboard_url: format!("{DEFAULT_PUBLIC_BASE_URL}/dashboard"),
            },
            login_policy: LoginPolicy::Open,
            db_pool: None,
        }
    }

    /// Store items and users in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Admit logins from `domain` only.
    #[must_use]
    pub fn with_institution_domain(mut self, domain: InstitutionDomain) -> Self {
        self.institution_domain = domain;
        self
    }

    /// Demand `policy` before a login issues a session.
    #[must_use]
    pub fn with_login_policy(mut self, policy: LoginPolicy) -> Self {
        self.login_policy = policy;
        self
    }

    /// Send claim notifications through `mailer`.
    #[must_use]
    pub fn with_mailer(mut self, mailer: MailerSettings) -> Self {
        self.mailer = mailer;
        self
    }
}
