//! SMTP claim notifier built on lettre's Tokio transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::ports::{ClaimNotice, ClaimNotifier, ClaimNotifierError};

use super::template::render_claim_email;

/// Connection security for the SMTP relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS, usually port 465.
    Tls,
    /// Plain connection upgraded with `STARTTLS`, usually port 587.
    StartTls,
    /// Unencrypted; only for local relays such as MailHog.
    Plain,
}

/// Everything needed to reach the relay and sign outgoing mail.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Connection security.
    pub security: SmtpSecurity,
    /// Login user; no authentication is attempted when `None`.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Absolute dashboard link placed in every message.
    pub dashboard_url: String,
}

/// [`ClaimNotifier`] that delivers multipart email through an SMTP relay.
pub struct SmtpClaimNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    dashboard_url: String,
}

impl SmtpClaimNotifier {
    /// Build a notifier with a pooled transport.
    ///
    /// No connection is opened until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimNotifierError::Compose`] when the sender address is
    /// malformed and [`ClaimNotifierError::Delivery`] when the relay host
    /// cannot be configured for TLS.
    pub fn new(settings: SmtpSettings) -> Result<Self, ClaimNotifierError> {
        let from_address: Address = settings
            .from_email
            .parse()
            .map_err(|err| ClaimNotifierError::compose(format!("invalid sender: {err}")))?;
        let from = Mailbox::new(Some(settings.from_name), from_address);

        let mut builder = match settings.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|err| ClaimNotifierError::delivery(err.to_string()))?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|err| ClaimNotifierError::delivery(err.to_string()))?
            }
            SmtpSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        }
        .port(settings.port);
        if let Some(username) = settings.username {
            builder = builder.credentials(Credentials::new(
                username,
                settings.password.unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            dashboard_url: settings.dashboard_url,
        })
    }

    fn compose(&self, notice: &ClaimNotice) -> Result<Message, ClaimNotifierError> {
        let to_address: Address = notice
            .owner_email
            .as_ref()
            .parse()
            .map_err(|err| ClaimNotifierError::compose(format!("invalid recipient: {err}")))?;
        let to = Mailbox::new(Some(notice.owner_name.to_string()), to_address);
        let email = render_claim_email(notice, &self.dashboard_url)?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )
            .map_err(|err| ClaimNotifierError::compose(err.to_string()))
    }
}

#[async_trait]
impl ClaimNotifier for SmtpClaimNotifier {
    async fn notify_owner_item_claimed(
        &self,
        notice: &ClaimNotice,
    ) -> Result<(), ClaimNotifierError> {
        let message = self.compose(notice)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| ClaimNotifierError::delivery(err.to_string()))?;
        info!(
            recipient = %notice.owner_email,
            code = %response.code(),
            "claim notification delivered"
        );
        Ok(())
    }
}
