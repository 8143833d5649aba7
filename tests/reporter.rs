mod common;

use command_error_router::{Cause, CrashReporter, ErrorValue, ReportSink};
use common::{context, harness, RecordingFramework, RecordingSink};
use std::sync::Arc;

#[test]
fn stop_closes_the_sink_once() {
    let sink = Arc::new(RecordingSink::default());
    let reporter = CrashReporter::with_sink(Arc::clone(&sink) as Arc<dyn ReportSink>);

    reporter.stop();
    reporter.stop();

    assert!(reporter.is_stopped());
    assert_eq!(sink.closed(), 1);
}

#[tokio::test]
async fn submissions_after_shutdown_are_dropped() {
    let h = harness(true);
    let framework = RecordingFramework::default();
    let error = ErrorValue::invoke(Cause::Other, "AttributeError", "'NoneType' has no 'id'");

    h.router.shutdown();
    h.router.shutdown();

    let action = h
        .router
        .handle(&framework, &context("vote"), &error, false)
        .await;

    assert!(action.reply().is_some());
    assert!(h.sink.records().is_empty());
    assert_eq!(h.sink.closed(), 1);
    assert_eq!(framework.sent().len(), 1);
}

#[tokio::test]
async fn rejected_reports_are_swallowed() {
    common::init_tracing();
    let sink = Arc::new(RecordingSink {
        reject: true,
        ..Default::default()
    });
    let reporter = Arc::new(CrashReporter::with_sink(Arc::clone(&sink) as Arc<dyn ReportSink>));
    let router = command_error_router::ErrorRouter::new(Some(reporter));
    let framework = RecordingFramework::default();
    let error = ErrorValue::invoke(Cause::Other, "OSError", "disk full");

    router
        .handle(&framework, &context("backup"), &error, false)
        .await;

    assert!(sink.records().is_empty());
    assert_eq!(framework.sent().len(), 1);
    assert_eq!(framework.resets(), 1);
}
