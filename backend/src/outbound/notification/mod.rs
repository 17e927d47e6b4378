//! Claim notification adapters.
//!
//! - [`SmtpClaimNotifier`] delivers multipart email through an SMTP relay.
//! - [`LoggingClaimNotifier`] renders the same message and only logs it.

mod log;
mod smtp;
mod template;

pub use self::log::LoggingClaimNotifier;
pub use self::smtp::{SmtpClaimNotifier, SmtpSecurity, SmtpSettings};
pub use self::template::{ClaimEmail, render_claim_email};
