use serde::{Deserialize, Serialize};

/// Whether one person's own application form is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndividualApplicationStatus {
    Incomplete,
    Complete,
    Withdrawn,
}

/// Where an applicant stands with respect to team formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamApplicationStatus {
    NotApplicable,
    WantsTeam,
    Incomplete,
    Complete,
}

/// The review outcome recorded against an application.
///
/// `Pending` is never persisted; it is what the derivation engine reports
/// while no response row exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Pending,
    Invited,
    Rejected,
}

/// The value stored on an RSVP row once one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpAnswer {
    Yes,
    No,
    Expired,
}

/// The RSVP dimension as seen by status derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    NotApplicable,
    Incomplete,
    CompleteYes,
    CompleteNo,
    CompleteExpired,
}

impl From<RsvpAnswer> for RsvpStatus {
    fn from(answer: RsvpAnswer) -> Self {
        match answer {
            RsvpAnswer::Yes => RsvpStatus::CompleteYes,
            RsvpAnswer::No => RsvpStatus::CompleteNo,
            RsvpAnswer::Expired => RsvpStatus::CompleteExpired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    NoTicket,
    HasTicket,
}

/// The single headline status summarizing an applicant's journey.
///
/// Never stored; always recomputed from the five dimension statuses by
/// [`super::derivation::derive_overall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Incomplete,
    IncompleteClosed,
    Withdrawn,
    InReview,
    Rejected,
    HasTicket,
    InvitedAwaitingRsvp,
    InvitedDeclined,
    InvitedExpired,
    InvitedAccepted,
}

/// Whether new applications are currently being accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationsWindow {
    Open,
    Closed,
}

impl IndividualApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            IndividualApplicationStatus::Incomplete => "incomplete",
            IndividualApplicationStatus::Complete => "complete",
            IndividualApplicationStatus::Withdrawn => "withdrawn",
        }
    }
}

impl TeamApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TeamApplicationStatus::NotApplicable => "not_applicable",
            TeamApplicationStatus::WantsTeam => "wants_team",
            TeamApplicationStatus::Incomplete => "incomplete",
            TeamApplicationStatus::Complete => "complete",
        }
    }
}

impl ResponseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ResponseStatus::Pending => "pending",
            ResponseStatus::Invited => "invited",
            ResponseStatus::Rejected => "rejected",
        }
    }
}

impl RsvpAnswer {
    pub const fn label(self) -> &'static str {
        match self {
            RsvpAnswer::Yes => "yes",
            RsvpAnswer::No => "no",
            RsvpAnswer::Expired => "expired",
        }
    }
}

impl RsvpStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RsvpStatus::NotApplicable => "not_applicable",
            RsvpStatus::Incomplete => "incomplete",
            RsvpStatus::CompleteYes => "complete_yes",
            RsvpStatus::CompleteNo => "complete_no",
            RsvpStatus::CompleteExpired => "complete_expired",
        }
    }
}

impl TicketStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TicketStatus::NoTicket => "no_ticket",
            TicketStatus::HasTicket => "has_ticket",
        }
    }
}

impl OverallStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OverallStatus::Incomplete => "incomplete",
            OverallStatus::IncompleteClosed => "incomplete_closed",
            OverallStatus::Withdrawn => "withdrawn",
            OverallStatus::InReview => "in_review",
            OverallStatus::Rejected => "rejected",
            OverallStatus::HasTicket => "has_ticket",
            OverallStatus::InvitedAwaitingRsvp => "invited_awaiting_rsvp",
            OverallStatus::InvitedDeclined => "invited_declined",
            OverallStatus::InvitedExpired => "invited_expired",
            OverallStatus::InvitedAccepted => "invited_accepted",
        }
    }
}
