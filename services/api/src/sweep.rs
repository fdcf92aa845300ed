use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use hackdesk::config::AppConfig;
use hackdesk::error::AppError;
use hackdesk::telemetry;
use hackdesk::workflows::attendance::{
    run_expiry_sweep, AttendanceService, Clock, SweepOptions, SystemClock,
};

use crate::cli::ExpireArgs;
use crate::infra::{InMemoryAttendanceStore, LogOnlyMailer, LogOnlySlack};

/// `expire-invitations` entry point: sweep the store for stale invitations
/// and report counts. `--dry-run` lists candidates without mutating state.
pub(crate) fn run(args: ExpireArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(InMemoryAttendanceStore::default());
    let clock = Arc::new(SystemClock);
    if args.seed_demo {
        store.seed_demo(clock.now(), config.attendance.invitation_validity_days);
    }
    let service = AttendanceService::new(
        store,
        Arc::new(LogOnlyMailer),
        Arc::new(LogOnlySlack),
        clock,
        config.attendance.invitation_validity_days,
    );

    let max_age_days = args
        .max_age_days
        .unwrap_or(config.attendance.invitation_validity_days);
    let options = SweepOptions {
        max_age: Duration::days(max_age_days),
        dry_run: args.dry_run,
    };

    let report = run_expiry_sweep(&service, options).map_err(AppError::from)?;
    info!(
        dry_run = report.dry_run,
        candidates = report.candidates,
        expired = report.expired,
        failed = report.failed,
        "expiry sweep finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| format!("{report:?}"))
    );
    Ok(())
}
