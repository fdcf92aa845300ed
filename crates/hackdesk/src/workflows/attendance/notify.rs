use super::email::MailContent;

/// Outbound mail transport. Implementations live at the service edge; the
/// lifecycle service only ever calls this best-effort.
pub trait EmailSender: Send + Sync {
    fn send(&self, to: &str, contents: &MailContent) -> Result<(), NotificationError>;
}

/// Workspace invite hook for confirmed attendees.
pub trait SlackInviter: Send + Sync {
    fn invite_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), NotificationError>;
}

/// Notification dispatch error. Always logged and swallowed by callers;
/// there is no compensating action once the state transition has committed.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("mail transport unavailable: {0}")]
    Email(String),
    #[error("slack transport unavailable: {0}")]
    Slack(String),
}
