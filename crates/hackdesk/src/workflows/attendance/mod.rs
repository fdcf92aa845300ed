//! Applicant attendance lifecycle: status vocabulary, derivation engine,
//! invitation/RSVP transitions, and the invitation expiry sweep.
//!
//! Review tooling writes responses; this module owns everything that happens
//! after, up to the issued ticket. Overall status is never stored - it is
//! recomputed from the record chain on every read.

pub mod clock;
pub mod derivation;
pub mod domain;
pub mod email;
pub mod expiry;
pub mod lifecycle;
pub mod notify;
pub mod repository;
pub mod router;
pub mod status;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use derivation::{
    derive_overall, derive_statuses, ApplicantStatuses, DimensionStatuses, StatusConsistencyError,
};
pub use domain::{
    ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord, ResponseId, ResponseRecord,
    RsvpId, RsvpRecord, TeamId, TeamMemberRecord, TicketId, TicketRecord,
};
pub use email::{MailAction, MailBody, MailContent};
pub use expiry::{run_expiry_sweep, SweepOptions, SweepReport, DEFAULT_MAX_AGE_DAYS};
pub use lifecycle::{AttendanceError, AttendanceService, RsvpReceipt};
pub use notify::{EmailSender, NotificationError, SlackInviter};
pub use repository::{
    AttendanceRepository, AttendanceUnitOfWork, InvitationCandidate, RepositoryError,
};
pub use router::{attendance_router, AttendanceRouterState};
pub use status::{
    ApplicationsWindow, IndividualApplicationStatus, OverallStatus, ResponseStatus, RsvpAnswer,
    RsvpStatus, TeamApplicationStatus, TicketStatus,
};
