#![allow(dead_code)]

use async_trait::async_trait;
use command_error_router::{
    CommandInfo, CrashReporter, DiagnosticSink, ErrorContext, ErrorRouter, Framework,
    FrameworkError, OriginalError, ReportError, ReportRecord, ReportSink, Reply,
};
use std::sync::{Arc, Mutex, Once};
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Initialise tracing for tests; output is only shown for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        fmt().with_test_writer().with_target(true).init();
    });
}

pub fn context(command: &str) -> ErrorContext {
    ErrorContext {
        command: Some(CommandInfo::new(command)),
        content: format!("${} 5", command),
        author_id: 356091260429402122,
        channel_id: 453551307249418253,
        guild_id: Some(430017996304678923),
        message_id: 602877712271441920,
        prefix: String::from("$"),
    }
}

/// Records every reply and cooldown reset instead of talking to a chat service.
#[derive(Default)]
pub struct RecordingFramework {
    pub sent: Mutex<Vec<Reply>>,
    pub resets: Mutex<usize>,
    pub fail_sends: bool,
}

impl RecordingFramework {
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Reply> {
        self.sent.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        *self.resets.lock().unwrap()
    }
}

#[async_trait]
impl Framework for RecordingFramework {
    async fn send(&self, _ctx: &ErrorContext, reply: Reply) -> Result<(), FrameworkError> {
        if self.fail_sends {
            return Err(FrameworkError::send("403 Forbidden"));
        }
        self.sent.lock().unwrap().push(reply);
        Ok(())
    }

    async fn reset_cooldown(&self, _ctx: &ErrorContext) -> Result<(), FrameworkError> {
        *self.resets.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<ReportRecord>>,
    pub closed: Mutex<usize>,
    pub reject: bool,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<ReportRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

impl ReportSink for RecordingSink {
    fn capture(&self, record: &ReportRecord) -> Result<(), ReportError> {
        if self.reject {
            return Err(ReportError::Rejected(record.error_type.clone()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn close(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    pub lines: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn lines(&self) -> Vec<(String, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn command_failed(&self, command: &str, original: &OriginalError) {
        self.lines
            .lock()
            .unwrap()
            .push((format!("In {}:", command), original.to_string()));
    }
}

pub struct Harness {
    pub router: ErrorRouter,
    pub sink: Arc<RecordingSink>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

pub fn harness(with_reporter: bool) -> Harness {
    init_tracing();

    let sink = Arc::new(RecordingSink::default());
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let reporter = with_reporter
        .then(|| Arc::new(CrashReporter::with_sink(Arc::clone(&sink) as Arc<dyn ReportSink>)));

    let router = ErrorRouter::new(reporter)
        .with_diagnostics(Arc::clone(&diagnostics) as Arc<dyn DiagnosticSink>);

    Harness {
        router,
        sink,
        diagnostics,
    }
}
