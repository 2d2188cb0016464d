//! Attest Runner
//!
//! Runs tests through a fixed lifecycle and aggregates their results.
//!
//! # Architecture
//!
//! - [`stage`]: the stage chain wrapped around every test body
//! - [`TestExecutor`]: the chain bound to one suite's lazily created fixture
//! - [`TestSession`]: runs suites (optionally in parallel) and aggregates
//!   results through [`logger`]s into a [`SessionSummary`]
//!
//! Fixtures, row expansion and naming describe the tests; they never decide
//! an outcome.

mod case;
mod executor;
mod fixture;
mod guard;
pub mod logger;
mod naming;
mod result;
mod session;
pub mod stage;
mod suite;
#[cfg(test)]
mod testing;

pub use case::{Row, Test, TestBody, TestCase};
pub use executor::TestExecutor;
pub use fixture::{Fixture, FixtureDescription, FixtureFactory, Hook, ResultHook};
pub use logger::{
    MulticastLogger, NullLogger, SessionLogger, SessionReport, SessionSummary, SuiteLogger,
    TestLogger, TracingLogger,
};
pub use naming::{DefaultNamer, TestNamer};
pub use result::{FailureKind, FailureRecord, Recorder, TestName, TestResult, TestStatus};
pub use session::{SessionBuilder, SessionConfig, SessionError, TestSession};
pub use suite::Suite;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=attest_runner=debug`
/// or `RUST_LOG=attest_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
