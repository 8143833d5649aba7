pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod reporter;
pub mod router;

pub use error::{Error, FrameworkError, ReportError, Result};
pub use i18n::{interpolate, Localizer, Untranslated};
pub use reporter::{CrashReporter, ReportRecord, ReportSink, ReporterConfig, SentrySink};
pub use router::{
    Action, CheckFailure, CommandInfo, Decision, DiagnosticSink, Embed, ErrorContext,
    ErrorRouter, ErrorValue, Framework, OriginalError, Cause, Reply, TracingDiagnostics,
};
