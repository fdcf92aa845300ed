//! Pure status derivation over explicitly loaded records.
//!
//! Each per-dimension function is an independent lookup; nothing here touches
//! storage or the clock. The overall status is a fixed-priority reduction of
//! the five dimensions, evaluated top to bottom, first match wins.

use serde::Serialize;

use super::domain::{
    ApplicationRecord, ResponseRecord, RsvpRecord, TeamMemberRecord, TicketRecord,
};
use super::status::{
    ApplicationsWindow, IndividualApplicationStatus, OverallStatus, ResponseStatus, RsvpStatus,
    TeamApplicationStatus, TicketStatus,
};

/// The five per-dimension statuses for one applicant.
///
/// The team, response, RSVP, and ticket dimensions are undefined until an
/// application exists, which the priority list never observes because the
/// incomplete-application rule fires first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionStatuses {
    pub individual: IndividualApplicationStatus,
    pub team: Option<TeamApplicationStatus>,
    pub response: Option<ResponseStatus>,
    pub rsvp: Option<RsvpStatus>,
    pub ticket: Option<TicketStatus>,
}

/// Dimension statuses plus the derived headline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicantStatuses {
    #[serde(flatten)]
    pub dimensions: DimensionStatuses,
    pub overall: OverallStatus,
}

/// Raised when the five dimensions are contradictory and no decision-list
/// rule matches. Indicates corrupted stored state, so it is kept distinct
/// from expected domain errors and must fail loudly.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "no overall status derivable: individual={individual:?} team={team:?} \
     response={response:?} rsvp={rsvp:?} ticket={ticket:?}"
)]
pub struct StatusConsistencyError {
    pub individual: IndividualApplicationStatus,
    pub team: Option<TeamApplicationStatus>,
    pub response: Option<ResponseStatus>,
    pub rsvp: Option<RsvpStatus>,
    pub ticket: Option<TicketStatus>,
}

impl StatusConsistencyError {
    fn from_dimensions(dimensions: &DimensionStatuses) -> Self {
        Self {
            individual: dimensions.individual,
            team: dimensions.team,
            response: dimensions.response,
            rsvp: dimensions.rsvp,
            ticket: dimensions.ticket,
        }
    }
}

pub fn individual_status(application: Option<&ApplicationRecord>) -> IndividualApplicationStatus {
    match application {
        None => IndividualApplicationStatus::Incomplete,
        Some(application) if application.withdrawn => IndividualApplicationStatus::Withdrawn,
        Some(_) => IndividualApplicationStatus::Complete,
    }
}

pub fn team_status(
    application: Option<&ApplicationRecord>,
    team_member: Option<&TeamMemberRecord>,
) -> Option<TeamApplicationStatus> {
    let application = application?;
    Some(match team_member {
        Some(_) => TeamApplicationStatus::Complete,
        None if application.wants_team => TeamApplicationStatus::WantsTeam,
        None if !application.in_team => TeamApplicationStatus::NotApplicable,
        None => TeamApplicationStatus::Incomplete,
    })
}

pub fn response_status(
    application: Option<&ApplicationRecord>,
    response: Option<&ResponseRecord>,
) -> Option<ResponseStatus> {
    application?;
    Some(match response {
        None => ResponseStatus::Pending,
        Some(response) => response.status,
    })
}

/// The RSVP dimension only reads the RSVP row while the response is an
/// invitation; absent or rejected responses make it not applicable.
pub fn rsvp_status(
    application: Option<&ApplicationRecord>,
    response: Option<&ResponseRecord>,
    rsvp: Option<&RsvpRecord>,
) -> Option<RsvpStatus> {
    application?;
    Some(match response {
        None => RsvpStatus::NotApplicable,
        Some(response) if response.status == ResponseStatus::Rejected => RsvpStatus::NotApplicable,
        Some(_) => match rsvp {
            None => RsvpStatus::Incomplete,
            Some(rsvp) => RsvpStatus::from(rsvp.answer),
        },
    })
}

pub fn ticket_status(
    application: Option<&ApplicationRecord>,
    ticket: Option<&TicketRecord>,
) -> Option<TicketStatus> {
    application?;
    Some(match ticket {
        None => TicketStatus::NoTicket,
        Some(_) => TicketStatus::HasTicket,
    })
}

/// Reduce the five dimensions to the single headline status.
///
/// Priority order: incomplete application (modulated by the applications
/// window), withdrawal, review outcome, ticket, then the RSVP sub-states of
/// an invitation. Any combination that survives all rules is contradictory
/// stored state and returns [`StatusConsistencyError`] rather than a default.
pub fn derive_overall(
    dimensions: &DimensionStatuses,
    window: ApplicationsWindow,
) -> Result<OverallStatus, StatusConsistencyError> {
    if dimensions.individual == IndividualApplicationStatus::Incomplete
        || dimensions.team == Some(TeamApplicationStatus::Incomplete)
    {
        return Ok(match window {
            ApplicationsWindow::Open => OverallStatus::Incomplete,
            ApplicationsWindow::Closed => OverallStatus::IncompleteClosed,
        });
    }

    if dimensions.individual == IndividualApplicationStatus::Withdrawn {
        return Ok(OverallStatus::Withdrawn);
    }

    match dimensions.response {
        Some(ResponseStatus::Pending) => return Ok(OverallStatus::InReview),
        Some(ResponseStatus::Rejected) => return Ok(OverallStatus::Rejected),
        Some(ResponseStatus::Invited) | None => {}
    }

    if dimensions.ticket == Some(TicketStatus::HasTicket) {
        return Ok(OverallStatus::HasTicket);
    }

    match dimensions.rsvp {
        Some(RsvpStatus::Incomplete) => Ok(OverallStatus::InvitedAwaitingRsvp),
        Some(RsvpStatus::CompleteNo) => Ok(OverallStatus::InvitedDeclined),
        Some(RsvpStatus::CompleteExpired) => Ok(OverallStatus::InvitedExpired),
        Some(RsvpStatus::CompleteYes) => Ok(OverallStatus::InvitedAccepted),
        Some(RsvpStatus::NotApplicable) | None => {
            Err(StatusConsistencyError::from_dimensions(dimensions))
        }
    }
}

/// Convenience wrapper deriving all dimensions and the overall status from a
/// loaded record chain.
pub fn derive_statuses(
    application: Option<&ApplicationRecord>,
    response: Option<&ResponseRecord>,
    rsvp: Option<&RsvpRecord>,
    ticket: Option<&TicketRecord>,
    team_member: Option<&TeamMemberRecord>,
    window: ApplicationsWindow,
) -> Result<ApplicantStatuses, StatusConsistencyError> {
    let dimensions = DimensionStatuses {
        individual: individual_status(application),
        team: team_status(application, team_member),
        response: response_status(application, response),
        rsvp: rsvp_status(application, response, rsvp),
        ticket: ticket_status(application, ticket),
    };
    let overall = derive_overall(&dimensions, window)?;
    Ok(ApplicantStatuses {
        dimensions,
        overall,
    })
}
