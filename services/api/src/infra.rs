use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use hackdesk::workflows::attendance::{
    ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord, AttendanceRepository,
    AttendanceUnitOfWork, EmailSender, InvitationCandidate, MailContent, NotificationError,
    RepositoryError, ResponseId, ResponseRecord, ResponseStatus, RsvpAnswer, RsvpId, RsvpRecord,
    SlackInviter, TeamMemberRecord, TicketId, TicketRecord,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
struct Tables {
    applicants: HashMap<i64, ApplicantRecord>,
    applications: HashMap<i64, ApplicationRecord>,
    responses: HashMap<i64, ResponseRecord>,
    rsvps: HashMap<i64, RsvpRecord>,
    tickets: HashMap<i64, TicketRecord>,
    team_members: HashMap<i64, TeamMemberRecord>,
    sequence: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Process-local store backing the demo deployment. Real persistence sits
/// behind the same `AttendanceRepository` trait.
#[derive(Default)]
pub(crate) struct InMemoryAttendanceStore {
    tables: Mutex<Tables>,
}

impl InMemoryAttendanceStore {
    fn seed_applicant(
        tables: &mut Tables,
        first: &str,
        last: &str,
        email: &str,
    ) -> ApplicantRecord {
        let record = ApplicantRecord {
            id: ApplicantId(tables.next_id()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        };
        tables.applicants.insert(record.id.0, record.clone());
        record
    }

    fn seed_application(
        tables: &mut Tables,
        applicant_id: ApplicantId,
        slug: &str,
    ) -> ApplicationRecord {
        let record = ApplicationRecord {
            id: ApplicationId(tables.next_id()),
            applicant_id,
            slug: slug.to_string(),
            withdrawn: false,
            in_team: false,
            wants_team: false,
        };
        tables.applications.insert(record.id.0, record.clone());
        record
    }

    fn seed_response(
        tables: &mut Tables,
        application_id: ApplicationId,
        status: ResponseStatus,
        issued_at: DateTime<Utc>,
        validity_days: i64,
    ) -> ResponseRecord {
        let expires_at = match status {
            ResponseStatus::Invited => Some(issued_at + Duration::days(validity_days)),
            _ => None,
        };
        let record = ResponseRecord {
            id: ResponseId(tables.next_id()),
            application_id,
            status,
            issued_at,
            expires_at,
        };
        tables.responses.insert(record.id.0, record.clone());
        record
    }

    /// Populate a handful of applicants across the lifecycle so `serve
    /// --seed-demo` and `expire-invitations --seed-demo` have data to show.
    pub(crate) fn seed_demo(&self, now: DateTime<Utc>, validity_days: i64) {
        let mut tables = self.tables.lock().expect("store mutex poisoned");

        // Application submitted, review still pending.
        let pending = Self::seed_applicant(&mut tables, "Priya", "Narayan", "priya@example.org");
        Self::seed_application(&mut tables, pending.id, "priya");

        // Freshly invited, still inside the validity window.
        let fresh = Self::seed_applicant(&mut tables, "Tomas", "Berg", "tomas@example.org");
        let application = Self::seed_application(&mut tables, fresh.id, "tomas");
        Self::seed_response(
            &mut tables,
            application.id,
            ResponseStatus::Invited,
            now - Duration::days(1),
            validity_days,
        );

        // Invited past the validity window; the sweep should claim this one.
        let stale = Self::seed_applicant(&mut tables, "Mina", "Okafor", "mina@example.org");
        let application = Self::seed_application(&mut tables, stale.id, "mina");
        Self::seed_response(
            &mut tables,
            application.id,
            ResponseStatus::Invited,
            now - Duration::days(validity_days + 1),
            validity_days,
        );

        // Reviewed and rejected.
        let rejected = Self::seed_applicant(&mut tables, "Leo", "Fischer", "leo@example.org");
        let application = Self::seed_application(&mut tables, rejected.id, "leo");
        Self::seed_response(
            &mut tables,
            application.id,
            ResponseStatus::Rejected,
            now - Duration::days(2),
            validity_days,
        );

        info!(applicants = tables.applicants.len(), "seeded demo dataset");
    }
}

struct InMemoryUnitOfWork<'a> {
    tables: &'a mut Tables,
}

impl AttendanceUnitOfWork for InMemoryUnitOfWork<'_> {
    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError> {
        Ok(self.tables.responses.get(&id.0).cloned())
    }

    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError> {
        Ok(self.tables.rsvps.get(&id.0).cloned())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.tables.applications.get(&id.0).cloned())
    }

    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Ok(self.tables.applicants.get(&id.0).cloned())
    }

    fn insert_rsvp(
        &mut self,
        response_id: ResponseId,
        answer: RsvpAnswer,
        recorded_at: DateTime<Utc>,
    ) -> Result<RsvpRecord, RepositoryError> {
        if self.tables.rsvps.contains_key(&response_id.0) {
            return Err(RepositoryError::Conflict);
        }
        let record = RsvpRecord {
            id: RsvpId(self.tables.next_id()),
            response_id,
            answer,
            recorded_at,
        };
        self.tables.rsvps.insert(response_id.0, record.clone());
        Ok(record)
    }

    fn insert_ticket(
        &mut self,
        application_id: ApplicationId,
        issued_at: DateTime<Utc>,
    ) -> Result<TicketRecord, RepositoryError> {
        if self.tables.tickets.contains_key(&application_id.0) {
            return Err(RepositoryError::Conflict);
        }
        let record = TicketRecord {
            id: TicketId(self.tables.next_id()),
            application_id,
            issued_at,
        };
        self.tables.tickets.insert(application_id.0, record.clone());
        Ok(record)
    }
}

impl AttendanceRepository for InMemoryAttendanceStore {
    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.applicants.get(&id.0).cloned())
    }

    fn application_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables
            .applications
            .values()
            .find(|application| application.applicant_id == id)
            .cloned())
    }

    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.responses.get(&id.0).cloned())
    }

    fn response_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ResponseRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables
            .responses
            .values()
            .find(|response| response.application_id == id)
            .cloned())
    }

    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.rsvps.get(&id.0).cloned())
    }

    fn ticket_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<TicketRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.tickets.get(&id.0).cloned())
    }

    fn team_member_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<TeamMemberRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        Ok(tables.team_members.get(&id.0).cloned())
    }

    fn invitation_expiry_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<InvitationCandidate>, RepositoryError> {
        let tables = self.tables.lock().expect("store mutex poisoned");
        let mut candidates = Vec::new();
        for response in tables.responses.values() {
            if response.status != ResponseStatus::Invited
                || response.issued_at >= cutoff
                || tables.rsvps.contains_key(&response.id.0)
            {
                continue;
            }
            let application = tables
                .applications
                .get(&response.application_id.0)
                .ok_or(RepositoryError::NotFound)?;
            let applicant = tables
                .applicants
                .get(&application.applicant_id.0)
                .ok_or(RepositoryError::NotFound)?;
            candidates.push(InvitationCandidate {
                response: response.clone(),
                application: application.clone(),
                applicant: applicant.clone(),
            });
        }
        candidates.sort_by_key(|candidate| candidate.response.id.0);
        Ok(candidates)
    }

    fn transaction<T, E>(
        &self,
        f: &mut dyn FnMut(&mut dyn AttendanceUnitOfWork) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepositoryError>,
    {
        let mut tables = self.tables.lock().expect("store mutex poisoned");
        let mut scratch = tables.clone();
        let result = f(&mut InMemoryUnitOfWork {
            tables: &mut scratch,
        });
        if result.is_ok() {
            *tables = scratch;
        }
        result
    }
}

/// Mail adapter that records deliveries in the log only. The real transport
/// is an external collaborator wired in at deploy time.
#[derive(Default)]
pub(crate) struct LogOnlyMailer;

impl EmailSender for LogOnlyMailer {
    fn send(&self, to: &str, contents: &MailContent) -> Result<(), NotificationError> {
        info!(%to, subject = %contents.subject, "email dispatched");
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct LogOnlySlack;

impl SlackInviter for LogOnlySlack {
    fn invite_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), NotificationError> {
        info!(%email, name = %format!("{first_name} {last_name}"), "slack invite dispatched");
        Ok(())
    }
}
