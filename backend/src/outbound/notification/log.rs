//! Development notifier that records claim notifications in the log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ClaimNotice, ClaimNotifier, ClaimNotifierError};

use super::template::render_claim_email;

/// [`ClaimNotifier`] that renders each message and logs it instead of sending.
#[derive(Debug, Clone)]
pub struct LoggingClaimNotifier {
    dashboard_url: String,
}

impl LoggingClaimNotifier {
    /// Create a notifier linking to `dashboard_url`.
    pub fn new(dashboard_url: impl Into<String>) -> Self {
        Self {
            dashboard_url: dashboard_url.into(),
        }
    }
}

#[async_trait]
impl ClaimNotifier for LoggingClaimNotifier {
    async fn notify_owner_item_claimed(
        &self,
        notice: &ClaimNotice,
    ) -> Result<(), ClaimNotifierError> {
        let email = render_claim_email(notice, &self.dashboard_url)?;
        info!(
            recipient = %notice.owner_email,
            subject = %email.subject,
            claimant = %notice.finder_email,
            "claim notification (log mode, not sent)"
        );
        Ok(())
    }
}
