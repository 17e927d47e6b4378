//! Claim notification email content.
//!
//! Produces a plain-text body and an HTML alternative. The HTML part is an
//! askama template under `templates/`, which escapes every interpolated value.

use std::fmt::Write as _;

use askama::Template;

use crate::domain::lifecycle::ClaimantRole;
use crate::domain::ports::{ClaimNotice, ClaimNotifierError};

/// Rendered message parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

const SAFETY_TIPS: [&str; 4] = [
    "Meet in a public area on campus (library, cafeteria, main hall)",
    "Verify the item details to ensure it's yours",
    "Be prepared to describe unique features of your item",
    "Consider meeting during daylight hours",
];

fn subject_for(notice: &ClaimNotice) -> String {
    match notice.claimant_role {
        ClaimantRole::Finder => format!(
            "\u{1f389} Great News! Your Lost Item \"{}\" Has Been Found!",
            notice.item_title
        ),
        ClaimantRole::Owner => format!(
            "\u{1f389} Great News! The Owner of \"{}\" Has Come Forward!",
            notice.item_title
        ),
    }
}

#[derive(Template)]
#[template(path = "claim_notification.html")]
struct ClaimNotificationHtml<'a> {
    headline: &'a str,
    owner: &'a str,
    intro: &'a str,
    title: &'a str,
    description: &'a str,
    location_label: &'a str,
    location: &'a str,
    date: &'a str,
    party_heading: &'a str,
    finder: &'a str,
    finder_email: &'a str,
    dashboard_url: &'a str,
    tips: &'a [&'a str],
}

struct Wording {
    headline: &'static str,
    intro: &'static str,
    location_label: &'static str,
    party_heading: &'static str,
}

const fn wording(role: ClaimantRole) -> Wording {
    match role {
        ClaimantRole::Finder => Wording {
            headline: "Great News! Your item has been found!",
            intro: "Excellent news! A fellow student has found your lost item and \
                    reported it through our Lost & Found platform.",
            location_label: "Location Found",
            party_heading: "Found By",
        },
        ClaimantRole::Owner => Wording {
            headline: "Great News! The owner has been found!",
            intro: "Excellent news! A fellow student has identified the item you \
                    found as theirs and claimed it through our Lost & Found platform.",
            location_label: "Location",
            party_heading: "Claimed By",
        },
    }
}

/// Render the notification sent to an item's reporter after a claim.
///
/// `dashboard_url` is the absolute link placed in the call-to-action button.
///
/// # Errors
///
/// [`ClaimNotifierError::Compose`] when the HTML template fails to render.
pub fn render_claim_email(
    notice: &ClaimNotice,
    dashboard_url: &str,
) -> Result<ClaimEmail, ClaimNotifierError> {
    let words = wording(notice.claimant_role);
    let date = notice.event_date.format("%B %-d, %Y").to_string();

    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        text,
        "Dear {owner},\n\n{intro}\n\n\
         Item: {title}\n\
         Description: {description}\n\
         {location_label}: {location}\n\
         Date: {date}\n\n\
         {party_heading}:\n\
         Name: {finder}\n\
         Email: {finder_email}\n\n\
         Next steps: please contact {finder} using the details above to arrange \
         the hand-over. We recommend meeting in a safe, public location on campus.\n\n\
         View on the Lost & Found platform: {dashboard_url}\n\n\
         Tips for safe collection:\n",
        owner = notice.owner_name,
        intro = words.intro,
        title = notice.item_title,
        description = notice.item_description,
        location_label = words.location_label,
        location = notice.item_location,
        party_heading = words.party_heading,
        finder = notice.finder_name,
        finder_email = notice.finder_email,
    );
    for tip in SAFETY_TIPS {
        let _ = writeln!(text, "- {tip}");
    }
    text.push_str(
        "\nThis is an automated notification from the campus Lost & Found platform. \
         Please do not reply to this email.\n",
    );

    let html = ClaimNotificationHtml {
        headline: words.headline,
        owner: notice.owner_name.as_ref(),
        intro: words.intro,
        title: &notice.item_title,
        description: &notice.item_description,
        location_label: words.location_label,
        location: &notice.item_location,
        date: &date,
        party_heading: words.party_heading,
        finder: notice.finder_name.as_ref(),
        finder_email: notice.finder_email.as_ref(),
        dashboard_url,
        tips: &SAFETY_TIPS,
    }
    .render()
    .map_err(|err| ClaimNotifierError::compose(format!("HTML template failed: {err}")))?;

    Ok(ClaimEmail {
        subject: subject_for(notice),
        text,
        html,
    })
}
