use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::clock::Clock;
use super::derivation::{derive_statuses, ApplicantStatuses, StatusConsistencyError};
use super::domain::{
    ApplicantId, ApplicantRecord, ResponseId, RsvpRecord, TicketRecord,
};
use super::email;
use super::notify::{EmailSender, SlackInviter};
use super::repository::{AttendanceRepository, RepositoryError};
use super::status::{ApplicationsWindow, ResponseStatus, RsvpAnswer};

/// Service composing the repository, notification transports, and clock.
///
/// Per-response state machine: `Pending --review--> Invited | Rejected`;
/// `Invited --rsvp(yes)--> accepted + ticket`, `--rsvp(no)--> declined`,
/// `--expire--> expired`. All three invitation outcomes and `Rejected` are
/// terminal.
pub struct AttendanceService<R, M, S, C> {
    repository: Arc<R>,
    mailer: Arc<M>,
    slack: Arc<S>,
    clock: Arc<C>,
    invitation_validity_days: i64,
}

/// What an RSVP transition committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpReceipt {
    pub rsvp: RsvpRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketRecord>,
}

impl<R, M, S, C> AttendanceService<R, M, S, C>
where
    R: AttendanceRepository + 'static,
    M: EmailSender + 'static,
    S: SlackInviter + 'static,
    C: Clock + 'static,
{
    pub fn new(
        repository: Arc<R>,
        mailer: Arc<M>,
        slack: Arc<S>,
        clock: Arc<C>,
        invitation_validity_days: i64,
    ) -> Self {
        Self {
            repository,
            mailer,
            slack,
            clock,
            invitation_validity_days,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load one applicant's record chain and derive all statuses.
    ///
    /// The applications-window flag is an explicit argument so the read path
    /// stays a pure function of its inputs.
    pub fn statuses(
        &self,
        applicant_id: ApplicantId,
        window: ApplicationsWindow,
    ) -> Result<ApplicantStatuses, AttendanceError> {
        self.repository
            .applicant(applicant_id)?
            .ok_or(AttendanceError::ApplicantNotFound(applicant_id))?;

        let application = self.repository.application_for_applicant(applicant_id)?;
        let (response, rsvp, ticket) = match &application {
            None => (None, None, None),
            Some(application) => {
                let response = self.repository.response_for_application(application.id)?;
                let rsvp = match &response {
                    Some(response) => self.repository.rsvp_for_response(response.id)?,
                    None => None,
                };
                let ticket = self.repository.ticket_for_application(application.id)?;
                (response, rsvp, ticket)
            }
        };
        let team_member = self.repository.team_member_for_applicant(applicant_id)?;

        let statuses = derive_statuses(
            application.as_ref(),
            response.as_ref(),
            rsvp.as_ref(),
            ticket.as_ref(),
            team_member.as_ref(),
            window,
        )?;
        Ok(statuses)
    }

    /// Record an invited applicant's reply.
    ///
    /// The invitation precondition and RSVP uniqueness are re-validated
    /// inside the transaction, closing the check-then-act race between two
    /// concurrent submissions. An answer of yes additionally issues the
    /// application's single ticket in the same transaction; the ticket email
    /// and Slack invite fire after commit and are never awaited for success.
    pub fn rsvp_to_response(
        &self,
        response_id: ResponseId,
        answer: RsvpAnswer,
    ) -> Result<RsvpReceipt, AttendanceError> {
        let now = self.clock.now();
        let (receipt, applicant) = self.repository.transaction(
            &mut |uow| -> Result<(RsvpReceipt, Option<ApplicantRecord>), AttendanceError> {
                let response = uow
                    .response(response_id)?
                    .ok_or(AttendanceError::ResponseNotFound(response_id))?;
                if response.status != ResponseStatus::Invited {
                    return Err(AttendanceError::NotAnInvitation {
                        response: response_id,
                        status: response.status,
                    });
                }
                if uow.rsvp_for_response(response_id)?.is_some() {
                    return Err(AttendanceError::RsvpAlreadyRecorded(response_id));
                }

                let rsvp = uow.insert_rsvp(response_id, answer, now)?;

                let mut ticket = None;
                let mut applicant = None;
                if answer == RsvpAnswer::Yes {
                    let application = uow
                        .application(response.application_id)?
                        .ok_or(RepositoryError::NotFound)?;
                    ticket = Some(uow.insert_ticket(application.id, now)?);
                    applicant = uow.applicant(application.applicant_id)?;
                }

                Ok((RsvpReceipt { rsvp, ticket }, applicant))
            },
        )?;

        info!(
            response = response_id.0,
            answer = answer.label(),
            ticket = receipt.ticket.is_some(),
            "rsvp recorded"
        );

        if receipt.ticket.is_some() {
            match applicant {
                Some(applicant) => self.notify_ticket_issued(&applicant),
                None => warn!(
                    response = response_id.0,
                    "ticket issued but applicant row missing; skipping notifications"
                ),
            }
        }

        Ok(receipt)
    }

    /// Expire an invitation that was never answered.
    ///
    /// Modeled as creating the response's single RSVP with the expired
    /// answer; a second expiry attempt trips the same precondition as any
    /// other duplicate RSVP. The courtesy email is best-effort.
    pub fn expire_invitation(&self, response_id: ResponseId) -> Result<RsvpRecord, AttendanceError> {
        let now = self.clock.now();
        let (rsvp, applicant) = self.repository.transaction(
            &mut |uow| -> Result<(RsvpRecord, Option<ApplicantRecord>), AttendanceError> {
                let response = uow
                    .response(response_id)?
                    .ok_or(AttendanceError::ResponseNotFound(response_id))?;
                if response.status != ResponseStatus::Invited {
                    return Err(AttendanceError::NotAnInvitation {
                        response: response_id,
                        status: response.status,
                    });
                }
                if uow.rsvp_for_response(response_id)?.is_some() {
                    return Err(AttendanceError::RsvpAlreadyRecorded(response_id));
                }

                let rsvp = uow.insert_rsvp(response_id, RsvpAnswer::Expired, now)?;
                let applicant = match uow.application(response.application_id)? {
                    Some(application) => uow.applicant(application.applicant_id)?,
                    None => None,
                };
                Ok((rsvp, applicant))
            },
        )?;

        info!(response = response_id.0, "invitation expired");

        match applicant {
            Some(applicant) => self.notify_invitation_expired(&applicant),
            None => warn!(
                response = response_id.0,
                "expired invitation has no applicant row; skipping email"
            ),
        }

        Ok(rsvp)
    }

    fn notify_ticket_issued(&self, applicant: &ApplicantRecord) {
        let contents = email::ticket_issued(&applicant.first_name);
        if let Err(err) = self.mailer.send(&applicant.email, &contents) {
            warn!(applicant = applicant.id.0, %err, "ticket email failed");
        }
        if let Err(err) =
            self.slack
                .invite_user(&applicant.email, &applicant.first_name, &applicant.last_name)
        {
            warn!(applicant = applicant.id.0, %err, "slack invite failed");
        }
    }

    fn notify_invitation_expired(&self, applicant: &ApplicantRecord) {
        let contents = email::invitation_expired(&applicant.first_name, self.invitation_validity_days);
        if let Err(err) = self.mailer.send(&applicant.email, &contents) {
            warn!(applicant = applicant.id.0, %err, "expiry email failed");
        }
    }
}

/// Error raised by the attendance lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("applicant {} not found", .0 .0)]
    ApplicantNotFound(ApplicantId),
    #[error("response {} not found", .0 .0)]
    ResponseNotFound(ResponseId),
    #[error("response {} is not an invitation (status: {})", .response.0, .status.label())]
    NotAnInvitation {
        response: ResponseId,
        status: ResponseStatus,
    },
    #[error("response {} already has an rsvp", .0 .0)]
    RsvpAlreadyRecorded(ResponseId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Inconsistent(#[from] StatusConsistencyError),
}

impl AttendanceError {
    /// HTTP status used when the error crosses the router boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::ApplicantNotFound(_) | AttendanceError::ResponseNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AttendanceError::NotAnInvitation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AttendanceError::RsvpAlreadyRecorded(_)
            | AttendanceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            AttendanceError::Repository(_) | AttendanceError::Inconsistent(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
