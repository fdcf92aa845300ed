//! Event branding shared by email templates and views.

pub const EVENT_NAME: &str = "Fen Hacks";
pub const EVENT_TITLE: &str = "Fen Hacks 2026";
pub const DASHBOARD_URL: &str = "https://fenhacks.example.org/apply/dashboard";
