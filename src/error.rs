use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("Failed to set up the Telegram Bot API client: {0}")]
    Api(String),

    #[error("Failed running the webhook server: {0}")]
    Webhook(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by the hosting framework while replying or resetting a cooldown.
#[derive(Error, Debug)]
#[error("{action} failed: {reason}")]
pub struct FrameworkError {
    pub action: &'static str,
    pub reason: String,
}

impl FrameworkError {
    pub fn send(reason: impl ToString) -> Self {
        Self {
            action: "send",
            reason: reason.to_string(),
        }
    }

    pub fn reset_cooldown(reason: impl ToString) -> Self {
        Self {
            action: "reset_cooldown",
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid crash reporting DSN: {0}")]
    InvalidDsn(String),

    #[error("Crash reporter rejected the event: {0}")]
    Rejected(String),

    #[error("Crash reporter is closed")]
    Closed,
}
