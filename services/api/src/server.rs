use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use hackdesk::config::AppConfig;
use hackdesk::error::AppError;
use hackdesk::telemetry;
use hackdesk::workflows::attendance::{
    AttendanceRouterState, AttendanceService, Clock, SystemClock,
};

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAttendanceStore, LogOnlyMailer, LogOnlySlack};
use crate::routes::with_attendance_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryAttendanceStore::default());
    let clock = Arc::new(SystemClock);
    if args.seed_demo {
        store.seed_demo(clock.now(), config.attendance.invitation_validity_days);
    }
    let service = Arc::new(AttendanceService::new(
        store,
        Arc::new(LogOnlyMailer),
        Arc::new(LogOnlySlack),
        clock,
        config.attendance.invitation_validity_days,
    ));

    let router_state = AttendanceRouterState {
        service,
        window: config.attendance.applications_window,
    };
    let app = with_attendance_routes(router_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "attendance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
