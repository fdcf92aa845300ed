use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::attendance::clock::Clock;
use crate::workflows::attendance::domain::{
    ApplicantId, ApplicantRecord, ApplicationId, ApplicationRecord, ResponseId, ResponseRecord,
    RsvpId, RsvpRecord, TeamId, TeamMemberRecord, TicketId, TicketRecord,
};
use crate::workflows::attendance::email::MailContent;
use crate::workflows::attendance::notify::{EmailSender, NotificationError, SlackInviter};
use crate::workflows::attendance::repository::{
    AttendanceRepository, AttendanceUnitOfWork, InvitationCandidate, RepositoryError,
};
use crate::workflows::attendance::status::{ResponseStatus, RsvpAnswer};
use crate::workflows::attendance::AttendanceService;

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).single().expect("valid timestamp")
}

#[derive(Default, Clone)]
struct StoreData {
    applicants: HashMap<i64, ApplicantRecord>,
    applications: HashMap<i64, ApplicationRecord>,
    responses: HashMap<i64, ResponseRecord>,
    // Keyed by owning response/application id, which is what enforces the
    // at-most-one constraints a relational schema would carry.
    rsvps: HashMap<i64, RsvpRecord>,
    tickets: HashMap<i64, TicketRecord>,
    team_members: HashMap<i64, TeamMemberRecord>,
    next_id: i64,
}

impl StoreData {
    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-backed store; `transaction` runs against a scratch copy and commits
/// it on success, so closure errors roll back cleanly.
#[derive(Default)]
pub(super) struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub(super) fn seed_applicant(&self, first: &str, last: &str, email: &str) -> ApplicantRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let record = ApplicantRecord {
            id: ApplicantId(data.alloc_id()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        };
        data.applicants.insert(record.id.0, record.clone());
        record
    }

    pub(super) fn seed_application(
        &self,
        applicant_id: ApplicantId,
        slug: &str,
    ) -> ApplicationRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let record = ApplicationRecord {
            id: ApplicationId(data.alloc_id()),
            applicant_id,
            slug: slug.to_string(),
            withdrawn: false,
            in_team: false,
            wants_team: false,
        };
        data.applications.insert(record.id.0, record.clone());
        record
    }

    pub(super) fn update_application(&self, record: ApplicationRecord) {
        let mut data = self.data.lock().expect("store mutex poisoned");
        data.applications.insert(record.id.0, record);
    }

    pub(super) fn seed_response(
        &self,
        application_id: ApplicationId,
        status: ResponseStatus,
        issued_at: DateTime<Utc>,
    ) -> ResponseRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let expires_at = match status {
            ResponseStatus::Invited => Some(issued_at + Duration::days(3)),
            _ => None,
        };
        let record = ResponseRecord {
            id: ResponseId(data.alloc_id()),
            application_id,
            status,
            issued_at,
            expires_at,
        };
        data.responses.insert(record.id.0, record.clone());
        record
    }

    pub(super) fn seed_rsvp(&self, response_id: ResponseId, answer: RsvpAnswer) -> RsvpRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let record = RsvpRecord {
            id: RsvpId(data.alloc_id()),
            response_id,
            answer,
            recorded_at: base_time(),
        };
        data.rsvps.insert(response_id.0, record.clone());
        record
    }

    pub(super) fn seed_ticket(&self, application_id: ApplicationId) -> TicketRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let record = TicketRecord {
            id: TicketId(data.alloc_id()),
            application_id,
            issued_at: base_time(),
        };
        data.tickets.insert(application_id.0, record.clone());
        record
    }

    pub(super) fn seed_team_member(&self, applicant_id: ApplicantId) -> TeamMemberRecord {
        let mut data = self.data.lock().expect("store mutex poisoned");
        let record = TeamMemberRecord {
            id: data.alloc_id(),
            team_id: TeamId(1),
            applicant_id,
        };
        data.team_members.insert(applicant_id.0, record.clone());
        record
    }

    pub(super) fn rsvp_count(&self) -> usize {
        self.data.lock().expect("store mutex poisoned").rsvps.len()
    }

    pub(super) fn ticket_count(&self) -> usize {
        self.data.lock().expect("store mutex poisoned").tickets.len()
    }
}

struct MemoryUnitOfWork<'a> {
    data: &'a mut StoreData,
}

impl AttendanceUnitOfWork for MemoryUnitOfWork<'_> {
    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError> {
        Ok(self.data.responses.get(&id.0).cloned())
    }

    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError> {
        Ok(self.data.rsvps.get(&id.0).cloned())
    }

    fn application(&self, id: ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.data.applications.get(&id.0).cloned())
    }

    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Ok(self.data.applicants.get(&id.0).cloned())
    }

    fn insert_rsvp(
        &mut self,
        response_id: ResponseId,
        answer: RsvpAnswer,
        recorded_at: DateTime<Utc>,
    ) -> Result<RsvpRecord, RepositoryError> {
        if self.data.rsvps.contains_key(&response_id.0) {
            return Err(RepositoryError::Conflict);
        }
        let record = RsvpRecord {
            id: RsvpId(self.data.alloc_id()),
            response_id,
            answer,
            recorded_at,
        };
        self.data.rsvps.insert(response_id.0, record.clone());
        Ok(record)
    }

    fn insert_ticket(
        &mut self,
        application_id: ApplicationId,
        issued_at: DateTime<Utc>,
    ) -> Result<TicketRecord, RepositoryError> {
        if self.data.tickets.contains_key(&application_id.0) {
            return Err(RepositoryError::Conflict);
        }
        let record = TicketRecord {
            id: TicketId(self.data.alloc_id()),
            application_id,
            issued_at,
        };
        self.data.tickets.insert(application_id.0, record.clone());
        Ok(record)
    }
}

impl AttendanceRepository for MemoryStore {
    fn applicant(&self, id: ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data.applicants.get(&id.0).cloned())
    }

    fn application_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data
            .applications
            .values()
            .find(|application| application.applicant_id == id)
            .cloned())
    }

    fn response(&self, id: ResponseId) -> Result<Option<ResponseRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data.responses.get(&id.0).cloned())
    }

    fn response_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ResponseRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data
            .responses
            .values()
            .find(|response| response.application_id == id)
            .cloned())
    }

    fn rsvp_for_response(&self, id: ResponseId) -> Result<Option<RsvpRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data.rsvps.get(&id.0).cloned())
    }

    fn ticket_for_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<TicketRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data.tickets.get(&id.0).cloned())
    }

    fn team_member_for_applicant(
        &self,
        id: ApplicantId,
    ) -> Result<Option<TeamMemberRecord>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        Ok(data.team_members.get(&id.0).cloned())
    }

    fn invitation_expiry_candidates(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<InvitationCandidate>, RepositoryError> {
        let data = self.data.lock().expect("store mutex poisoned");
        let mut candidates = Vec::new();
        for response in data.responses.values() {
            if response.status != ResponseStatus::Invited
                || response.issued_at >= cutoff
                || data.rsvps.contains_key(&response.id.0)
            {
                continue;
            }
            let application = data
                .applications
                .get(&response.application_id.0)
                .ok_or(RepositoryError::NotFound)?;
            let applicant = data
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
        let mut data = self.data.lock().expect("store mutex poisoned");
        let mut scratch = data.clone();
        let result = f(&mut MemoryUnitOfWork { data: &mut scratch });
        if result.is_ok() {
            *data = scratch;
        }
        result
    }
}

#[derive(Default)]
pub(super) struct MemoryMailer {
    sent: Mutex<Vec<(String, MailContent)>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<(String, MailContent)> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for MemoryMailer {
    fn send(&self, to: &str, contents: &MailContent) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push((to.to_string(), contents.clone()));
        Ok(())
    }
}

/// Transport stub whose sends always fail, for the swallow-and-log paths.
pub(super) struct FailingMailer;

impl EmailSender for FailingMailer {
    fn send(&self, _to: &str, _contents: &MailContent) -> Result<(), NotificationError> {
        Err(NotificationError::Email("smtp offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemorySlack {
    invites: Mutex<Vec<String>>,
}

impl MemorySlack {
    pub(super) fn invites(&self) -> Vec<String> {
        self.invites.lock().expect("slack mutex poisoned").clone()
    }
}

impl SlackInviter for MemorySlack {
    fn invite_user(
        &self,
        email: &str,
        _first_name: &str,
        _last_name: &str,
    ) -> Result<(), NotificationError> {
        self.invites
            .lock()
            .expect("slack mutex poisoned")
            .push(email.to_string());
        Ok(())
    }
}

pub(super) struct FailingSlack;

impl SlackInviter for FailingSlack {
    fn invite_user(
        &self,
        _email: &str,
        _first_name: &str,
        _last_name: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::Slack("workspace unreachable".to_string()))
    }
}

pub(super) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) type TestService = AttendanceService<MemoryStore, MemoryMailer, MemorySlack, FixedClock>;

pub(super) struct TestHarness {
    pub(super) service: Arc<TestService>,
    pub(super) store: Arc<MemoryStore>,
    pub(super) mailer: Arc<MemoryMailer>,
    pub(super) slack: Arc<MemorySlack>,
    pub(super) clock: Arc<FixedClock>,
}

pub(super) fn harness() -> TestHarness {
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(MemoryMailer::default());
    let slack = Arc::new(MemorySlack::default());
    let clock = Arc::new(FixedClock::at(base_time()));
    let service = Arc::new(AttendanceService::new(
        store.clone(),
        mailer.clone(),
        slack.clone(),
        clock.clone(),
        3,
    ));
    TestHarness {
        service,
        store,
        mailer,
        slack,
        clock,
    }
}

/// Seed applicant + application + invited response in one go.
pub(super) fn seed_invited(
    store: &MemoryStore,
    slug: &str,
    invited_at: DateTime<Utc>,
) -> (ApplicantRecord, ApplicationRecord, ResponseRecord) {
    let applicant = store.seed_applicant("Ada", "Lovelace", &format!("{slug}@example.org"));
    let application = store.seed_application(applicant.id, slug);
    let response = store.seed_response(application.id, ResponseStatus::Invited, invited_at);
    (applicant, application, response)
}
