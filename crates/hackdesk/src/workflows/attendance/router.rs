use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::clock::Clock;
use super::derivation::ApplicantStatuses;
use super::domain::{ApplicantId, ResponseId};
use super::lifecycle::{AttendanceError, AttendanceService, RsvpReceipt};
use super::notify::{EmailSender, SlackInviter};
use super::repository::AttendanceRepository;
use super::status::{ApplicationsWindow, RsvpAnswer};

/// Shared state for the attendance endpoints. The applications-window flag
/// rides along so the status endpoint can pass it into derivation
/// explicitly.
pub struct AttendanceRouterState<R, M, S, C> {
    pub service: Arc<AttendanceService<R, M, S, C>>,
    pub window: ApplicationsWindow,
}

impl<R, M, S, C> Clone for AttendanceRouterState<R, M, S, C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            window: self.window,
        }
    }
}

/// Router builder exposing the RSVP write path and the status read path.
pub fn attendance_router<R, M, S, C>(state: AttendanceRouterState<R, M, S, C>) -> Router
where
    R: AttendanceRepository + 'static,
    M: EmailSender + 'static,
    S: SlackInviter + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/attendance/responses/:response_id/rsvp",
            post(rsvp_handler::<R, M, S, C>),
        )
        .route(
            "/api/v1/attendance/applicants/:applicant_id/status",
            get(status_handler::<R, M, S, C>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RsvpRequest {
    pub(crate) answer: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RsvpView {
    pub(crate) response_id: i64,
    pub(crate) answer: &'static str,
    pub(crate) ticket_issued: bool,
}

impl RsvpView {
    fn from_receipt(receipt: &RsvpReceipt) -> Self {
        Self {
            response_id: receipt.rsvp.response_id.0,
            answer: receipt.rsvp.answer.label(),
            ticket_issued: receipt.ticket.is_some(),
        }
    }
}

pub(crate) async fn rsvp_handler<R, M, S, C>(
    State(state): State<AttendanceRouterState<R, M, S, C>>,
    Path(response_id): Path<i64>,
    axum::Json(request): axum::Json<RsvpRequest>,
) -> Response
where
    R: AttendanceRepository + 'static,
    M: EmailSender + 'static,
    S: SlackInviter + 'static,
    C: Clock + 'static,
{
    // Expiry is reserved for the batch job; the endpoint only takes a reply.
    let answer = match request.answer.trim().to_ascii_lowercase().as_str() {
        "yes" => RsvpAnswer::Yes,
        "no" => RsvpAnswer::No,
        other => {
            let payload = json!({ "error": format!("invalid rsvp answer '{other}'") });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match state
        .service
        .rsvp_to_response(ResponseId(response_id), answer)
    {
        Ok(receipt) => {
            (StatusCode::OK, axum::Json(RsvpView::from_receipt(&receipt))).into_response()
        }
        Err(err) => attendance_error_response(err),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusView {
    pub(crate) applicant_id: i64,
    pub(crate) individual: &'static str,
    pub(crate) team: Option<&'static str>,
    pub(crate) response: Option<&'static str>,
    pub(crate) rsvp: Option<&'static str>,
    pub(crate) ticket: Option<&'static str>,
    pub(crate) overall: &'static str,
}

impl StatusView {
    fn new(applicant_id: ApplicantId, statuses: &ApplicantStatuses) -> Self {
        Self {
            applicant_id: applicant_id.0,
            individual: statuses.dimensions.individual.label(),
            team: statuses.dimensions.team.map(|status| status.label()),
            response: statuses.dimensions.response.map(|status| status.label()),
            rsvp: statuses.dimensions.rsvp.map(|status| status.label()),
            ticket: statuses.dimensions.ticket.map(|status| status.label()),
            overall: statuses.overall.label(),
        }
    }
}

pub(crate) async fn status_handler<R, M, S, C>(
    State(state): State<AttendanceRouterState<R, M, S, C>>,
    Path(applicant_id): Path<i64>,
) -> Response
where
    R: AttendanceRepository + 'static,
    M: EmailSender + 'static,
    S: SlackInviter + 'static,
    C: Clock + 'static,
{
    let id = ApplicantId(applicant_id);
    match state.service.statuses(id, state.window) {
        Ok(statuses) => {
            (StatusCode::OK, axum::Json(StatusView::new(id, &statuses))).into_response()
        }
        Err(err) => attendance_error_response(err),
    }
}

fn attendance_error_response(err: AttendanceError) -> Response {
    if matches!(err, AttendanceError::Inconsistent(_)) {
        error!(%err, "contradictory stored statuses");
    }
    let status = err.status_code();
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
