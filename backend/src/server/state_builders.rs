//! Builders wiring repositories, the notifier and domain services into
//! [`HttpState`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use tracing::{info, warn};

use lostfound::domain::ports::{ClaimNotice, ClaimNotifier, ClaimNotifierError};
use lostfound::domain::ports::{ItemRepository, UserRepository};
use lostfound::domain::{InstitutionDomain, ItemService, UserAccountService};
use lostfound::inbound::http::state::HttpState;
use lostfound::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
use lostfound::outbound::notification::{LoggingClaimNotifier, SmtpClaimNotifier};
use lostfound::outbound::persistence::{DieselItemRepository, DieselUserRepository};

use super::ServerConfig;
use super::config::MailerSettings;

/// Notifier selected by configuration.
enum ConfiguredNotifier {
    Smtp(SmtpClaimNotifier),
    Log(LoggingClaimNotifier),
}

#[async_trait]
impl ClaimNotifier for ConfiguredNotifier {
    async fn notify_owner_item_claimed(
        &self,
        notice: &ClaimNotice,
    ) -> Result<(), ClaimNotifierError> {
        match self {
            Self::Smtp(notifier) => notifier.notify_owner_item_claimed(notice).await,
            Self::Log(notifier) => notifier.notify_owner_item_claimed(notice).await,
        }
    }
}

fn build_notifier(mailer: &MailerSettings) -> std::io::Result<ConfiguredNotifier> {
    match mailer {
        MailerSettings::Smtp(settings) => {
            info!(host = %settings.host, port = settings.port, "claim notifications via SMTP");
            SmtpClaimNotifier::new(settings.clone())
                .map(ConfiguredNotifier::Smtp)
                .map_err(|err| std::io::Error::other(format!("SMTP notifier setup failed: {err}")))
        }
        MailerSettings::Log { dashboard_url } => {
            info!("claim notifications are logged, not sent");
            Ok(ConfiguredNotifier::Log(LoggingClaimNotifier::new(
                dashboard_url.clone(),
            )))
        }
    }
}

fn assemble<I, U>(
    items: Arc<I>,
    users: Arc<U>,
    notifier: ConfiguredNotifier,
    domain: InstitutionDomain,
) -> HttpState
where
    I: ItemRepository + 'static,
    U: UserRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let item_service = Arc::new(ItemService::new(
        items,
        Arc::clone(&users),
        Arc::new(notifier),
        clock.clone(),
    ));
    let accounts = Arc::new(UserAccountService::new(users, domain, clock));
    HttpState::new(item_service.clone(), item_service, accounts)
}

/// Build handler state from `config`.
///
/// PostgreSQL repositories are used when a pool is configured; otherwise items
/// and users live in process memory and vanish on restart.
///
/// # Errors
/// Propagates notifier construction failures as [`std::io::Error`].
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let notifier = build_notifier(&config.mailer)?;
    let domain = config.institution_domain.clone();
    let state = match &config.db_pool {
        Some(pool) => assemble(
            Arc::new(DieselItemRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            notifier,
            domain,
        ),
        None => {
            warn!("no database configured; items and users are kept in memory");
            assemble(
                Arc::new(InMemoryItemRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
                notifier,
                domain,
            )
        }
    };
    Ok(state.with_login_policy(config.login_policy.clone()))
}
