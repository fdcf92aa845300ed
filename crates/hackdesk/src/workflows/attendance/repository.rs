use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord, ResponseId, ResponseRecord,
    RsvpRecord, TeamMemberRecord, TicketRecord,
};
use super::status::RsvpAnswer;

/// Storage abstraction so the lifecycle service can be exercised in
/// isolation. Read accessors load one link of the record chain at a time;
/// graph traversal is always explicit, never through live references.
pub trait AttendanceRepository: Send + Sync {
    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;
    fn application_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError>;
    fn response_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ResponseRecord>, RepositoryError>;
    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError>;
    fn ticket_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<TicketRecord>, RepositoryError>;
    fn team_member_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<TeamMemberRecord>, RepositoryError>;

    /// Invitations past their validity window: status invited, no RSVP yet,
    /// and `issued_at` strictly before `cutoff`. Candidates come back
    /// hydrated with their application and applicant rows.
    fn invitation_expiry_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<InvitationCandidate>, RepositoryError>;

    /// Run `f` atomically: every write either commits as a unit or rolls
    /// back, and reads inside the closure observe no concurrent writers.
    /// Returning `Err` from the closure rolls back.
    fn transaction<T, E>(
        &self,
        f: &mut dyn FnMut(&mut dyn AttendanceUnitOfWork) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepositoryError>;
}

/// Write handle available inside a repository transaction.
pub trait AttendanceUnitOfWork {
    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError>;
    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError>;
    fn application(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;

    /// Insert the at-most-one RSVP for a response. A second insert for the
    /// same response must fail with [`RepositoryError::Conflict`].
    fn insert_rsvp(
        &mut self,
        response_id: ResponseId,
        answer: RsvpAnswer,
        recorded_at: DateTime<Utc>,
    ) -> Result<RsvpRecord, RepositoryError>;

    /// Insert the at-most-one ticket for an application.
    fn insert_ticket(
        &mut self,
        application_id: ApplicationId,
        issued_at: DateTime<Utc>,
    ) -> Result<TicketRecord, RepositoryError>;
}

/// An invitation eligible for expiry, hydrated for notification purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationCandidate {
    pub response: ResponseRecord,
    pub application: ApplicationRecord,
    pub applicant: ApplicantRecord,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
