//! Batch sweep expiring invitations that were never answered.

use chrono::Duration;
use serde::Serialize;
use tracing::{error, info};

use super::clock::Clock;
use super::lifecycle::{AttendanceError, AttendanceService};
use super::notify::{EmailSender, SlackInviter};
use super::repository::AttendanceRepository;

/// Default invitation validity window.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 3;

/// Sweep controls. `dry_run` lists candidates without mutating anything or
/// sending email.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    pub max_age: Duration,
    pub dry_run: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
            dry_run: false,
        }
    }
}

/// Outcome counts for one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub dry_run: bool,
    pub candidates: usize,
    pub expired: usize,
    pub failed: usize,
}

/// Find every invitation older than `max_age` with no reply and expire it.
///
/// Candidates are processed sequentially; one failure is logged and counted
/// but never aborts the rest of the sweep. Only the candidate query itself
/// can fail the whole run.
pub fn run_expiry_sweep<R, M, S, C>(
    service: &AttendanceService<R, M, S, C>,
    options: SweepOptions,
) -> Result<SweepReport, AttendanceError>
where
    R: AttendanceRepository + 'static,
    M: EmailSender + 'static,
    S: SlackInviter + 'static,
    C: Clock + 'static,
{
    let cutoff = service.now() - options.max_age;
    let candidates = service.repository().invitation_expiry_candidates(cutoff)?;

    info!(
        dry_run = options.dry_run,
        candidates = candidates.len(),
        %cutoff,
        "expiring invitations"
    );

    let mut expired = 0;
    let mut failed = 0;
    for candidate in &candidates {
        info!(
            response = candidate.response.id.0,
            applicant = candidate.applicant.id.0,
            issued_at = %candidate.response.issued_at,
            dry_run = options.dry_run,
            "invitation expiry candidate"
        );
        if options.dry_run {
            continue;
        }
        match service.expire_invitation(candidate.response.id) {
            Ok(_) => expired += 1,
            Err(err) => {
                failed += 1;
                error!(response = candidate.response.id.0, %err, "failed to expire invitation");
            }
        }
    }

    Ok(SweepReport {
        dry_run: options.dry_run,
        candidates: candidates.len(),
        expired,
        failed,
    })
}
