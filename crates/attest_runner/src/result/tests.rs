use pretty_assertions::assert_eq;

use super::*;

#[derive(Default)]
struct Events(Vec<String>);

impl TestLogger for Events {
    fn success(&mut self) {
        self.0.push("success".to_string());
    }

    fn pending(&mut self, reason: &str) {
        self.0.push(format!("pending: {reason}"));
    }

    fn failure(&mut self, failure: &FailureRecord) {
        self.0.push(format!("failure: {failure}"));
    }

    fn skipped(&mut self) {
        self.0.push("skipped".to_string());
    }
}

fn name() -> TestName {
    TestName::new("Math", "adds")
}

#[test]
fn test_name_display() {
    assert_eq!(name().to_string(), "Math.adds");
}

#[test]
fn test_status_classification() {
    assert!(TestStatus::Success.is_success());
    assert!(TestStatus::Pending("later".into()).is_pending());
    assert!(TestStatus::TeardownFailure.is_failure());
    assert!(!TestStatus::Running.is_terminal());
    assert!(!TestStatus::NotStarted.is_terminal());
    assert!(TestStatus::SetupFailure.is_terminal());
    assert_eq!(FailureKind::Setup.status(), TestStatus::SetupFailure);
}

#[test]
fn test_failure_record_display() {
    let assertion = FailureRecord::new(
        name(),
        FailureKind::Test,
        Raised::assertion_failed("x == 2\n  Expected: 2\n  But was: 1"),
    );
    assert_eq!(
        assertion.to_string(),
        "Math.adds: x == 2\n  Expected: 2\n  But was: 1"
    );

    let teardown = FailureRecord::new(
        name(),
        FailureKind::Teardown,
        Raised::invalid_operation("closed"),
    );
    assert_eq!(
        teardown.to_string(),
        "Math.adds (teardown): InvalidOperation: closed"
    );
}

#[test]
fn test_success_is_logged_on_finish() {
    let mut events = Events::default();
    let mut recorder = Recorder::new(name(), &mut events);
    assert_eq!(recorder.status(), &TestStatus::Running);
    recorder.success();
    assert_eq!(recorder.finish(), TestStatus::Success);
    assert_eq!(events.0, ["success"]);
}

#[test]
fn test_teardown_overwrites_success() {
    let mut events = Events::default();
    let mut recorder = Recorder::new(name(), &mut events);
    recorder.success();
    recorder.failure(FailureKind::Teardown, Raised::invalid_operation("closed"));
    assert_eq!(recorder.failures(), 1);
    assert_eq!(recorder.finish(), TestStatus::TeardownFailure);
    assert_eq!(
        events.0,
        ["failure: Math.adds (teardown): InvalidOperation: closed"]
    );
}

#[test]
fn test_report_failure_keeps_status() {
    let mut events = Events::default();
    let mut recorder = Recorder::new(name(), &mut events);
    recorder.failure(FailureKind::Setup, Raised::invalid_operation("no db"));
    recorder.report_failure(FailureKind::Teardown, Raised::invalid_operation("no db"));
    assert_eq!(recorder.failures(), 2);
    assert_eq!(recorder.finish(), TestStatus::SetupFailure);
    assert_eq!(events.0.len(), 2);
}

#[test]
fn test_pending_is_logged_with_reason() {
    let mut events = Events::default();
    let mut recorder = Recorder::new(name(), &mut events);
    recorder.pending("not yet");
    recorder.record_duration(Duration::from_millis(3));
    assert_eq!(recorder.duration(), Duration::from_millis(3));
    assert_eq!(recorder.finish(), TestStatus::Pending("not yet".to_string()));
    assert_eq!(events.0, ["pending: not yet"]);
}
