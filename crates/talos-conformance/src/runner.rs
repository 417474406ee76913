//! Conformance runner: check every vector of a corpus and collect outcomes.
//!
//! A vector failure never aborts the run. Vectors are checked positives
//! first, then negatives, each in file order.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::matcher::{self, VectorRoute};
use crate::report::{ReportGenerator, RunReport, TestOutcome, DEFAULT_SUITE_NAME};
use crate::vectors::{Polarity, TestVector, VectorCorpus};

/// Runner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Name written to the report's `<testsuite>`.
    pub suite_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            suite_name: DEFAULT_SUITE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConformanceRunner {
    config: RunnerConfig,
}

impl ConformanceRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Check every vector in `corpus`.
    pub fn run(&self, corpus: &VectorCorpus) -> RunReport {
        info!(
            suite = %self.config.suite_name,
            positive = corpus.vectors.len(),
            negative = corpus.negative_cases.len(),
            "starting conformance run"
        );

        let started = Instant::now();
        let outcomes: Vec<TestOutcome> = corpus
            .iter_with_polarity()
            .map(|(polarity, vector)| run_vector(vector, polarity))
            .collect();
        let report = ReportGenerator::generate(outcomes, &self.config.suite_name, started.elapsed());

        info!(
            tests = report.total_count,
            failures = report.failure_count,
            elapsed_ms = report.total_duration.as_millis() as u64,
            "conformance run finished"
        );
        report
    }
}

/// Check a single vector and time it.
pub fn run_vector(vector: &TestVector, polarity: Polarity) -> TestOutcome {
    let route = VectorRoute::for_test_id(&vector.test_id);
    let started = Instant::now();
    let result = matcher::check_routed(vector, route, polarity);
    let duration = started.elapsed();

    debug!(
        test_id = %vector.test_id,
        polarity = polarity.as_str(),
        route = route.as_str(),
        elapsed_us = duration.as_micros() as u64,
        passed = result.is_ok(),
        "checked vector"
    );

    match result {
        Ok(()) => TestOutcome::passed(&vector.test_id, duration),
        Err(err) => {
            warn!(test_id = %vector.test_id, error = %err, "vector failed");
            TestOutcome::failed(&vector.test_id, duration, err.to_string())
        }
    }
}
