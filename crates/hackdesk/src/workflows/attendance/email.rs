//! Transactional mail contents for attendance transitions.
//!
//! Templates build structured content; actual delivery is behind
//! [`super::notify::EmailSender`] and out of scope here.

use serde::{Deserialize, Serialize};

use crate::metadata;

/// Subject plus structured body sections, rendered by the mail transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailContent {
    pub subject: String,
    pub body: MailBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailBody {
    pub name: String,
    pub intro: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<MailAction>,
    pub outro: String,
}

/// A call-to-action block with a single button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAction {
    pub instructions: String,
    pub button_text: String,
    pub button_link: String,
}

const CONTACT_OUTRO: &str =
    "If you have any questions, don't hesitate to get in touch by replying to this email.";

/// Sent once a ticket has been issued after an RSVP of yes.
pub fn ticket_issued(name: &str) -> MailContent {
    MailContent {
        subject: format!(
            "{name}, we're looking forward to seeing you at {}",
            metadata::EVENT_TITLE
        ),
        body: MailBody {
            name: name.to_string(),
            intro: vec![format!(
                "You've confirmed your place at {}.",
                metadata::EVENT_TITLE
            )],
            action: Some(MailAction {
                instructions: "All the information about registration, accommodation, travel \
                               and more is on your dashboard. Have a good read - there may be \
                               some extra steps for you."
                    .to_string(),
                button_text: "Go to my dashboard".to_string(),
                button_link: metadata::DASHBOARD_URL.to_string(),
            }),
            outro: CONTACT_OUTRO.to_string(),
        },
    }
}

/// Sent when an invitation lapses without a reply.
pub fn invitation_expired(name: &str, days_valid: i64) -> MailContent {
    MailContent {
        subject: format!("Your {} invitation has expired", metadata::EVENT_NAME),
        body: MailBody {
            name: name.to_string(),
            intro: vec![
                format!(
                    "Earlier we sent you an invitation to {} with {days_valid} days to \
                     respond. We have not received a response from you and your invitation \
                     has expired.",
                    metadata::EVENT_TITLE
                ),
                format!("We hope to see you apply for the next {}!", metadata::EVENT_NAME),
            ],
            action: None,
            outro: CONTACT_OUTRO.to_string(),
        },
    }
}
