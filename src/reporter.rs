//! Optional forwarding of unexpected command failures to a crash reporting service.
//!
//! The reporter is resolved once at startup from configuration. When no
//! endpoint is configured there is no reporter and every submission step
//! is skipped.

use crate::{error::ReportError, router::ErrorContext, router::OriginalError};
use sentry::{
    protocol::{Event, Exception, Level, Map, Value},
    types::Dsn,
    Client, ClientOptions,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, Default)]
pub struct ReporterConfig {
    pub dsn: Option<String>,
}

/// Everything sent upstream about one unexpected failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRecord {
    pub command: String,
    pub message: String,
    pub guild_id: Option<i64>,
    pub channel_id: i64,
    pub message_id: i64,
    pub user_id: i64,
    pub error_type: String,
    pub error_message: String,
    pub trace: String,
}

impl ReportRecord {
    pub fn new(ctx: &ErrorContext, original: &OriginalError) -> Self {
        Self {
            command: ctx.command_name().to_string(),
            message: ctx.content.clone(),
            guild_id: ctx.guild_id,
            channel_id: ctx.channel_id,
            message_id: ctx.message_id,
            user_id: ctx.author_id,
            error_type: original.type_name.clone(),
            error_message: original.message.clone(),
            trace: original.trace().to_string(),
        }
    }

    /// Correlation ids as string pairs, `"None"` standing in for a missing guild.
    pub fn extra(&self) -> Vec<(&'static str, String)> {
        let guild_id = match self.guild_id {
            Some(id) => id.to_string(),
            None => String::from("None"),
        };

        vec![
            ("guild_id", guild_id),
            ("channel_id", self.channel_id.to_string()),
            ("message_id", self.message_id.to_string()),
            ("user_id", self.user_id.to_string()),
        ]
    }

    fn to_event(&self) -> Event<'static> {
        let mut tags = Map::new();
        tags.insert(String::from("command"), self.command.clone());

        let mut extra: Map<String, Value> = self
            .extra()
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect();
        extra.insert(String::from("trace"), Value::from(self.trace.clone()));

        Event {
            level: Level::Error,
            message: Some(self.message.clone()),
            tags,
            extra,
            exception: vec![Exception {
                ty: self.error_type.clone(),
                value: Some(self.error_message.clone()),
                ..Default::default()
            }]
            .into(),
            ..Default::default()
        }
    }
}

/// Transport a [`CrashReporter`] hands its records to.
pub trait ReportSink: Send + Sync {
    fn capture(&self, record: &ReportRecord) -> Result<(), ReportError>;

    fn close(&self);
}

/// Sends records to Sentry. Events are queued and delivered by the
/// client's background worker.
pub struct SentrySink {
    client: Client,
}

impl SentrySink {
    pub fn connect(dsn: &str) -> Result<Self, ReportError> {
        let dsn = dsn
            .parse::<Dsn>()
            .map_err(|e| ReportError::InvalidDsn(e.to_string()))?;

        let client = Client::from(ClientOptions {
            dsn: Some(dsn),
            ..Default::default()
        });

        Ok(Self { client })
    }
}

impl ReportSink for SentrySink {
    fn capture(&self, record: &ReportRecord) -> Result<(), ReportError> {
        if !self.client.is_enabled() {
            return Err(ReportError::Closed);
        }

        let id = self.client.capture_event(record.to_event(), None);
        if id.is_nil() {
            return Err(ReportError::Rejected(record.error_type.clone()));
        }

        Ok(())
    }

    fn close(&self) {
        if !self.client.close(Some(CLOSE_TIMEOUT)) {
            tracing::debug!("crash reporter did not flush before closing");
        }
    }
}

pub struct CrashReporter {
    sink: Arc<dyn ReportSink>,
    closed: AtomicBool,
}

impl CrashReporter {
    pub fn start(config: &ReporterConfig) -> Option<Self> {
        let dsn = config.dsn.as_deref()?;

        match SentrySink::connect(dsn) {
            Ok(sink) => {
                tracing::info!("crash reporting enabled");
                Some(Self::with_sink(Arc::new(sink)))
            }
            Err(e) => {
                tracing::warn!("crash reporting disabled: {}", e);
                None
            }
        }
    }

    pub fn with_sink(sink: Arc<dyn ReportSink>) -> Self {
        Self {
            sink,
            closed: AtomicBool::new(false),
        }
    }

    /// Best effort; failures are logged and dropped.
    pub fn submit(&self, record: &ReportRecord) {
        if self.closed.load(Ordering::Acquire) {
            tracing::debug!("crash reporter closed, dropping report for {}", record.command);
            return;
        }

        if let Err(e) = self.sink.capture(record) {
            tracing::debug!("failed to submit crash report: {}", e);
        }
    }

    pub fn stop(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.sink.close();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_dsn_means_no_reporter() {
        assert!(CrashReporter::start(&ReporterConfig::default()).is_none());
    }

    #[test]
    fn malformed_dsn_disables_reporting() {
        let config = ReporterConfig {
            dsn: Some(String::from("not a dsn")),
        };
        assert!(CrashReporter::start(&config).is_none());
        assert!(matches!(
            SentrySink::connect("not a dsn"),
            Err(ReportError::InvalidDsn(_))
        ));
    }

    #[test]
    fn extras_render_missing_guild_as_none() {
        let record = ReportRecord {
            command: String::from("roll"),
            message: String::from("/roll 0"),
            guild_id: None,
            channel_id: 10,
            message_id: 11,
            user_id: 12,
            error_type: String::from("DataError"),
            error_message: String::from("out of range"),
            trace: String::new(),
        };

        assert_eq!(
            record.extra(),
            vec![
                ("guild_id", String::from("None")),
                ("channel_id", String::from("10")),
                ("message_id", String::from("11")),
                ("user_id", String::from("12")),
            ]
        );

        let event = record.to_event();
        assert_eq!(event.tags.get("command").map(String::as_str), Some("roll"));
        assert_eq!(event.message.as_deref(), Some("/roll 0"));
    }
}
