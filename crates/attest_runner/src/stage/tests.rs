use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use attest_ir::Value;
use pretty_assertions::assert_eq;

use super::*;
use crate::fixture::FixtureDescription;
use crate::result::Recorder;
use crate::testing::{Trace, TraceLogger};

fn boom(message: &str) -> Result<(), Raised> {
    Err(Raised::invalid_operation(message))
}

/// Runs `test` through the default chain and returns the final status.
fn run(fixture: &Fixture, test: &Test, trace: &Trace) -> TestStatus {
    let stages = default_stages();
    let mut log = TraceLogger(trace.clone());
    let mut result = Recorder::new(test.name().clone(), &mut log);
    let cx = StageContext {
        test,
        fixture,
        instance: &Value::Null,
    };
    Next::new(&stages).run(cx, &mut result);
    result.finish()
}

fn fixture(trace: &Trace, setup: Result<(), Raised>, teardown: Result<(), Raised>) -> Fixture {
    Fixture::new("Suite").with_description(
        FixtureDescription::new()
            .setup_each(trace.hook("setup", setup))
            .teardown_each(trace.hook("teardown", teardown)),
    )
}

#[test]
fn test_passing_test() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), Ok(()));
    let status = run(&fixture, &trace.test("passes", Ok(())), &trace);

    assert_eq!(status, TestStatus::Success);
    assert_eq!(trace.events(), ["setup", "body", "teardown", "success"]);
}

#[test]
fn test_failing_body() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), Ok(()));
    let status = run(&fixture, &trace.test("fails", boom("nope")), &trace);

    assert_eq!(status, TestStatus::TestFailure);
    assert_eq!(trace.events(), ["setup", "body", "test failure: nope", "teardown"]);
}

#[test]
fn test_setup_failure_skips_body() {
    let trace = Trace::default();
    let fixture = fixture(&trace, boom("no db"), Ok(()));
    let status = run(&fixture, &trace.test("never runs", Ok(())), &trace);

    assert_eq!(status, TestStatus::SetupFailure);
    assert!(!trace.events().contains(&"body".to_string()));
    assert_eq!(trace.events(), ["setup", "setup failure: no db", "teardown"]);
}

#[test]
fn test_teardown_after_setup_failure_keeps_setup_status() {
    let trace = Trace::default();
    let fixture = fixture(&trace, boom("no db"), boom("still no db"));
    let status = run(&fixture, &trace.test("never runs", Ok(())), &trace);

    assert_eq!(status, TestStatus::SetupFailure);
    assert_eq!(
        trace.events(),
        [
            "setup",
            "setup failure: no db",
            "teardown",
            "teardown failure: still no db"
        ]
    );
}

#[test]
fn test_teardown_failure_overwrites_success() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), boom("closed"));
    let status = run(&fixture, &trace.test("passes", Ok(())), &trace);

    assert_eq!(status, TestStatus::TeardownFailure);
    assert_eq!(
        trace.events(),
        ["setup", "body", "teardown", "teardown failure: closed"]
    );
}

#[test]
fn test_teardown_failure_overwrites_test_failure_and_both_are_logged() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), boom("closed"));
    let status = run(&fixture, &trace.test("fails", boom("nope")), &trace);

    assert_eq!(status, TestStatus::TeardownFailure);
    assert_eq!(
        trace.events(),
        [
            "setup",
            "body",
            "test failure: nope",
            "teardown",
            "teardown failure: closed"
        ]
    );
}

#[test]
fn test_after_each_sees_the_body_status() {
    let trace = Trace::default();
    let seen = trace.clone();
    let fixture = Fixture::new("Suite").with_description(FixtureDescription::new().after_each(
        move |_, result| {
            seen.push(format!("after {:?}", result.status()));
            Ok(())
        },
    ));
    run(&fixture, &trace.test("fails", boom("nope")), &trace);

    assert_eq!(
        trace.events(),
        ["body", "test failure: nope", "after TestFailure"]
    );
}

#[test]
fn test_pending_test_that_fails_is_pending() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), Ok(()));
    let test = trace.test("broken", boom("nope")).pending("not done");
    let status = run(&fixture, &test, &trace);

    assert_eq!(status, TestStatus::Pending("not done".to_string()));
    assert_eq!(trace.events(), ["setup", "body", "teardown", "pending: not done"]);
}

#[test]
fn test_pending_test_that_passes_fails() {
    let trace = Trace::default();
    let fixture = fixture(&trace, Ok(()), Ok(()));
    let test = trace.test("fixed", Ok(())).pending("not done");
    let status = run(&fixture, &test, &trace);

    assert_eq!(status, TestStatus::TestFailure);
    assert_eq!(
        trace.events(),
        ["setup", "body", "test failure: test passed unexpectedly", "teardown"]
    );
}

#[test]
fn test_fixture_pending_applies_to_tests() {
    let trace = Trace::default();
    let fixture = Fixture::new("Suite").with_description(FixtureDescription::new().pending("wip"));
    let status = run(&fixture, &trace.test("broken", boom("nope")), &trace);
    assert_eq!(status, TestStatus::Pending("wip".to_string()));
}

#[test]
fn test_panicking_body_is_a_test_failure() {
    let trace = Trace::default();
    let test = Test::new(
        TestName::new("Suite", "panics"),
        Arc::new(|_: &Value, _: &[Value]| panic!("index out of bounds")),
    );
    let status = run(&Fixture::new("Suite"), &test, &trace);

    assert_eq!(status, TestStatus::TestFailure);
    assert_eq!(trace.events(), ["test failure: index out of bounds"]);
}

#[test]
fn test_timing_records_duration() {
    let stages = default_stages();
    let trace = Trace::default();
    let test = Test::new(
        TestName::new("Suite", "sleeps"),
        Arc::new(|_: &Value, _: &[Value]| {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(())
        }),
    );
    let fixture = Fixture::new("Suite");
    let mut log = TraceLogger(trace);
    let mut result = Recorder::new(test.name().clone(), &mut log);
    let cx = StageContext {
        test: &test,
        fixture: &fixture,
        instance: &Value::Null,
    };
    Next::new(&stages).run(cx, &mut result);
    assert!(result.duration() >= std::time::Duration::from_millis(5));
}

#[test]
fn test_custom_stage_wraps_the_body() {
    struct Counting(Arc<AtomicUsize>);

    impl Stage for Counting {
        fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, next: Next<'_>) {
            self.0.fetch_add(1, Ordering::SeqCst);
            next.run(cx, result);
        }
    }

    let count = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(Counting(Arc::clone(&count))),
        Box::new(MethodInvocation),
    ];
    let trace = Trace::default();
    let test = trace.test("passes", Ok(()));
    let fixture = Fixture::new("Suite");
    let mut log = TraceLogger(trace.clone());
    let mut result = Recorder::new(test.name().clone(), &mut log);
    let cx = StageContext {
        test: &test,
        fixture: &fixture,
        instance: &Value::Null,
    };
    Next::new(&stages).run(cx, &mut result);

    assert_eq!(result.finish(), TestStatus::Success);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(trace.events(), ["body", "success"]);
}
