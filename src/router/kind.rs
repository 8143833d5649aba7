use std::{any, backtrace::Backtrace, fmt, sync::Arc};

/// What kind of fault sits underneath a wrapped error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    /// The messaging platform's HTTP API rejected a request.
    Http,
    ConnectionReset,
    ServerDisconnected,
    /// An outbound HTTP response carried an unexpected content type.
    ContentType,
    /// The database refused a value outside its column range.
    DataOutOfRange,
    Other,
}

impl Cause {
    /// Faults of outbound HTTP calls that come and go on their own.
    pub fn is_transient_transport(self) -> bool {
        matches!(
            self,
            Cause::ConnectionReset | Cause::ServerDisconnected | Cause::ContentType
        )
    }
}

/// The error a command body actually raised, with the trace captured where it was wrapped.
#[derive(Clone)]
pub struct OriginalError {
    pub cause: Cause,
    pub type_name: String,
    pub message: String,
    trace: Arc<Backtrace>,
}

impl OriginalError {
    pub fn new(cause: Cause, type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            cause,
            type_name: type_name.into(),
            message: message.into(),
            trace: Arc::new(Backtrace::capture()),
        }
    }

    pub fn from_error<E: std::error::Error>(cause: Cause, error: &E) -> Self {
        let type_name = any::type_name::<E>();
        let short_name = type_name.rsplit("::").next().unwrap_or(type_name);
        Self::new(cause, short_name, error.to_string())
    }

    pub fn trace(&self) -> &Backtrace {
        &self.trace
    }
}

impl fmt::Debug for OriginalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginalError")
            .field("cause", &self.cause)
            .field("type_name", &self.type_name)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for OriginalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

/// Precondition guards a command can fail before its body runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckFailure {
    NoCharacter,
    NoGuild,
    NeedsNoGuild,
    NoGuildPermissions,
    NeedsNoGuildLeader,
    NeedsNoAdventure,
    NeedsAdventure,
    Other(String),
}

/// Why a command invocation failed.
#[derive(Clone, Debug)]
pub enum ErrorValue {
    CommandNotFound,
    MissingRequiredArgument {
        param: String,
    },
    BadArgument {
        param: Option<String>,
    },
    CommandOnCooldown {
        retry_after: f64,
    },
    NotOwner,
    CheckFailure(CheckFailure),
    /// The user walked away from an interactive prompt.
    NoChoice,
    CommandInvokeError(OriginalError),
    Other {
        kind: String,
        original: Option<OriginalError>,
    },
}

impl ErrorValue {
    pub fn invoke(cause: Cause, type_name: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorValue::CommandInvokeError(OriginalError::new(cause, type_name, message))
    }

    pub fn original(&self) -> Option<&OriginalError> {
        match self {
            ErrorValue::CommandInvokeError(original) => Some(original),
            ErrorValue::Other { original, .. } => original.as_ref(),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            ErrorValue::CommandNotFound => "CommandNotFound",
            ErrorValue::MissingRequiredArgument { .. } => "MissingRequiredArgument",
            ErrorValue::BadArgument { .. } => "BadArgument",
            ErrorValue::CommandOnCooldown { .. } => "CommandOnCooldown",
            ErrorValue::NotOwner => "NotOwner",
            ErrorValue::CheckFailure(_) => "CheckFailure",
            ErrorValue::NoChoice => "NoChoice",
            ErrorValue::CommandInvokeError(_) => "CommandInvokeError",
            ErrorValue::Other { kind, .. } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::ParseIntError;

    #[test]
    fn from_error_uses_short_type_name() {
        let err = "x".parse::<i64>().unwrap_err();
        let original = OriginalError::from_error::<ParseIntError>(Cause::Other, &err);
        assert_eq!(original.type_name, "ParseIntError");
        assert_eq!(original.to_string(), "ParseIntError: invalid digit found in string");
    }

    #[test]
    fn only_wrapping_kinds_expose_original() {
        assert!(ErrorValue::NotOwner.original().is_none());
        assert!(ErrorValue::invoke(Cause::Http, "HTTPException", "403").original().is_some());
        let other = ErrorValue::Other {
            kind: "DisabledCommand".into(),
            original: None,
        };
        assert!(other.original().is_none());
        assert_eq!(other.kind_name(), "DisabledCommand");
    }

    #[test]
    fn transient_transport_causes() {
        assert!(Cause::ConnectionReset.is_transient_transport());
        assert!(Cause::ContentType.is_transient_transport());
        assert!(!Cause::Http.is_transient_transport());
        assert!(!Cause::DataOutOfRange.is_transient_transport());
    }
}
