use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{ResponseStatus, RsvpAnswer};

/// Identifier wrapper for registered applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsvpId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

/// A person registered for the event. Owns at most one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One applicant's submitted form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    /// Unique human-readable handle used in admin tooling and links.
    pub slug: String,
    pub withdrawn: bool,
    /// The applicant applied as part of a team they assemble themselves.
    pub in_team: bool,
    /// The applicant asked the organizers to place them in a team.
    pub wants_team: bool,
}

/// The review outcome row for an application.
///
/// `expires_at` is only meaningful while the status is `Invited` and no RSVP
/// exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: ResponseId,
    pub application_id: ApplicationId,
    pub status: ResponseStatus,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// An invited applicant's reply. Immutable once created; expiry, acceptance,
/// and decline are all modeled as RSVP creation, never update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub id: RsvpId,
    pub response_id: ResponseId,
    pub answer: RsvpAnswer,
    pub recorded_at: DateTime<Utc>,
}

/// Proof of confirmed attendance, issued exactly once on RSVP = yes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub application_id: ApplicationId,
    pub issued_at: DateTime<Utc>,
}

/// Membership row; its presence marks the applicant's team as complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberRecord {
    pub id: i64,
    pub team_id: TeamId,
    pub applicant_id: ApplicantId,
}

impl ApplicantRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
