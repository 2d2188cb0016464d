//! Test sessions.
//!
//! A session runs suites, skipping filtered tests, creating each suite's
//! fixture lazily and releasing it afterwards, and aggregates every result
//! into a [`SessionSummary`]. Suites are the unit of parallel work; the
//! tests of one suite always run in order on one worker.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;

use crate::case::Test;
use crate::executor::TestExecutor;
use crate::logger::{MulticastLogger, NullLogger, SessionLogger, SessionReport, SessionSummary};
use crate::result::{FailureKind, Recorder, TestResult};
use crate::suite::Suite;

/// Session wiring errors, reported when the session is built.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session needs at least one worker")]
    NoWorkers,
    #[error("invalid skip pattern `{pattern}`: {source}")]
    SkipPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Session options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Suites run concurrently. 1 runs everything on the calling thread.
    pub workers: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { workers: 1 }
    }
}

type TestPredicate = Arc<dyn Fn(&Test) -> bool + Send + Sync>;
type SuitePredicate = Arc<dyn Fn(&Suite) -> bool + Send + Sync>;

/// Runs suites and aggregates their results.
pub struct TestSession {
    config: SessionConfig,
    logger: Arc<dyn SessionLogger>,
    skip: Vec<TestPredicate>,
    include: Vec<SuitePredicate>,
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("config", &self.config)
            .field("skip", &self.skip.len())
            .field("include", &self.include.len())
            .finish_non_exhaustive()
    }
}

impl TestSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs every included suite and returns the aggregated results.
    pub fn run(&self, suites: &[Suite]) -> SessionSummary {
        let report = SessionReport::new();
        let logger =
            MulticastLogger::new(vec![self.logger.as_ref(), &report as &dyn SessionLogger]);
        let suites: Vec<&Suite> = suites
            .iter()
            .filter(|suite| self.include.iter().all(|include| include(suite)))
            .collect();

        logger.begin_session();
        if self.config.workers <= 1 || suites.len() <= 1 {
            for suite in &suites {
                self.run_suite(suite, &logger);
            }
        } else {
            self.run_parallel(&suites, &logger);
        }
        logger.end_session();

        report.summary()
    }

    /// Runs suites on a scoped pool of `workers` threads.
    fn run_parallel(&self, suites: &[&Suite], logger: &dyn SessionLogger) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    suites
                        .par_iter()
                        .for_each(|suite| self.run_suite(suite, logger));
                });
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                for suite in suites {
                    self.run_suite(suite, logger);
                }
            });
    }

    #[tracing::instrument(level = "debug", skip_all, fields(suite = suite.name()))]
    fn run_suite(&self, suite: &Suite, logger: &dyn SessionLogger) {
        let mut suite_log = logger.begin_suite(suite.name());
        let executor = TestExecutor::new(suite.fixture());

        for test in suite.tests() {
            let mut log = suite_log.begin_test(test.name());
            if self.skip.iter().any(|skip| skip(test)) {
                log.skipped();
                log.end_test();
                continue;
            }

            let mut result = Recorder::new(test.name().clone(), &mut *log);
            match executor.initialize() {
                Ok(instance) => executor.run(test, instance, &mut result),
                Err(error) => result.failure(FailureKind::Setup, error.clone()),
            }
            result.finish();
            log.end_test();
        }

        if let Err(error) = executor.release() {
            tracing::warn!(suite = suite.name(), %error, "fixture release failed");
        }
        suite_log.end_suite();
    }
}

/// Configures a [`TestSession`].
#[derive(Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    logger: Option<Arc<dyn SessionLogger>>,
    skip: Vec<TestPredicate>,
    skip_patterns: Vec<String>,
    include: Vec<SuitePredicate>,
}

impl SessionBuilder {
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Receives every event alongside the session's own report.
    #[must_use]
    pub fn logger(mut self, logger: impl SessionLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Skips tests for which `predicate` holds. Skipped tests are counted
    /// as excluded.
    #[must_use]
    pub fn skip_when(mut self, predicate: impl Fn(&Test) -> bool + Send + Sync + 'static) -> Self {
        self.skip.push(Arc::new(predicate));
        self
    }

    /// Skips tests whose full name matches `pattern`.
    #[must_use]
    pub fn skip_matching(mut self, pattern: impl Into<String>) -> Self {
        self.skip_patterns.push(pattern.into());
        self
    }

    /// Runs only suites for which `predicate` holds.
    #[must_use]
    pub fn include_suite(
        mut self,
        predicate: impl Fn(&Suite) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.include.push(Arc::new(predicate));
        self
    }

    pub fn build(self) -> Result<TestSession, SessionError> {
        if self.config.workers == 0 {
            return Err(SessionError::NoWorkers);
        }

        let mut skip = self.skip;
        for pattern in self.skip_patterns {
            let regex = Regex::new(&pattern)
                .map_err(|source| SessionError::SkipPattern { pattern, source })?;
            skip.push(Arc::new(move |test: &Test| {
                regex.is_match(&test.name().to_string())
            }));
        }

        Ok(TestSession {
            config: self.config,
            logger: self.logger.unwrap_or_else(|| Arc::new(NullLogger)),
            skip,
            include: self.include,
        })
    }
}
