//! Test utilities for Carnival.
//!
//! Provides the parser and runner for `tests/validator/*.test`: a Carnival
//! document per case together with the findings the validator must produce.

pub mod validator;

use std::fmt;

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    /// Produced findings differ from the expected ones.
    Fail { expected: String, actual: String },
    /// The case itself is malformed.
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }
}

/// A case that did not pass.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

/// Tally of a test file run.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failures: Vec<TestFailure>,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        if result.is_pass() {
            self.passed += 1;
        } else {
            self.failures.push(TestFailure {
                name: name.into(),
                line,
                result,
            });
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} cases: {} passed, {} failed",
            self.total(),
            self.passed,
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
            match &failure.result {
                TestResult::Fail { expected, actual } => {
                    writeln!(f, "    expected:")?;
                    for line in expected.lines() {
                        writeln!(f, "      {line}")?;
                    }
                    writeln!(f, "    actual:")?;
                    for line in actual.lines() {
                        writeln!(f, "      {line}")?;
                    }
                }
                TestResult::Error { message } => writeln!(f, "    error: {message}")?,
                TestResult::Pass => {}
            }
        }
        Ok(())
    }
}
