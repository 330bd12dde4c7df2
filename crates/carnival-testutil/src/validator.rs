//! Validator test file parser and runner.
//!
//! Format:
//!
//! ```text
//! # test: arity_too_few
//! ---
//! MOV 5
//! ---
//! info 1:0..0 missing_meta.name
//! error 1:0..5 arity_mismatch
//! ===
//! ```
//!
//! The block between the two `---` lines is the document. Each expectation is
//! `<severity> <line>:<start>..<end> <code>`, with a one-based line and
//! zero-based byte columns. An empty expectation block means no findings.

use std::str::FromStr;

use carnival_kernel::{Finding, IssueCode, Severity, validate};
use thiserror::Error;

use crate::{TestResult, TestSummary};

/// Malformed expectation line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestFileError {
    #[error("expected `<severity> <line>:<start>..<end> <code>`, got `{0}`")]
    Shape(String),
    #[error("unknown severity `{0}`")]
    Severity(String),
    #[error("bad position `{0}`")]
    Position(String),
    #[error(transparent)]
    Code(#[from] carnival_kernel::IssueCodeParseError),
}

/// One expected finding, compared without its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFinding {
    pub severity: Severity,
    /// One-based line.
    pub line: u32,
    pub start: u32,
    pub end: u32,
    pub code: IssueCode,
}

impl ExpectedFinding {
    pub fn from_finding(finding: &Finding) -> Option<Self> {
        Some(Self {
            severity: finding.severity,
            line: finding.span.line + 1,
            start: finding.span.start,
            end: finding.span.end,
            code: finding.code?,
        })
    }
}

impl std::fmt::Display for ExpectedFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}:{}..{} {}",
            self.severity, self.line, self.start, self.end, self.code
        )
    }
}

impl FromStr for ExpectedFinding {
    type Err = TestFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [severity, position, code] = parts.as_slice() else {
            return Err(TestFileError::Shape(s.to_string()));
        };

        let severity = match *severity {
            "error" => Severity::Error,
            "info" => Severity::Info,
            other => return Err(TestFileError::Severity(other.to_string())),
        };

        let bad_position = || TestFileError::Position(position.to_string());
        let (line, cols) = position.split_once(':').ok_or_else(bad_position)?;
        let (start, end) = cols.split_once("..").ok_or_else(bad_position)?;
        let parse = |n: &str| n.parse::<u32>().map_err(|_| bad_position());

        Ok(Self {
            severity,
            line: parse(line)?,
            start: parse(start)?,
            end: parse(end)?,
            code: code.parse()?,
        })
    }
}

/// A single validator test case.
#[derive(Debug, Clone)]
pub struct ValidatorTestCase {
    /// Test name from the `# test: name` line.
    pub name: String,
    /// Line number of the header (1-indexed).
    pub line_number: usize,
    /// The document text.
    pub input: String,
    /// Raw expectation lines.
    pub expected: Vec<String>,
}

/// Parse a `.test` file into cases.
pub fn parse_validator_tests(content: &str) -> Vec<ValidatorTestCase> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let line_number = i + 1;
        i += 1;

        while i < lines.len() && lines[i].trim() != "---" {
            i += 1;
        }
        i += 1;

        let mut input_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input_lines.push(lines[i]);
            i += 1;
        }
        i += 1;

        let mut expected = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            let line = lines[i].trim();
            if !line.is_empty() {
                expected.push(line.to_string());
            }
            i += 1;
        }
        i += 1;

        let mut input = input_lines.join("\n");
        if !input.is_empty() {
            input.push('\n');
        }

        cases.push(ValidatorTestCase {
            name,
            line_number,
            input,
            expected,
        });
    }

    cases
}

impl ValidatorTestCase {
    /// Validate the input and compare against the expectations.
    pub fn run(&self) -> TestResult {
        let expected = match self
            .expected
            .iter()
            .map(|line| line.parse::<ExpectedFinding>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(expected) => expected,
            Err(e) => {
                return TestResult::Error {
                    message: e.to_string(),
                };
            }
        };

        let actual: Vec<ExpectedFinding> = validate(&self.input)
            .iter()
            .filter_map(ExpectedFinding::from_finding)
            .collect();

        if actual == expected {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: render(&expected),
                actual: render(&actual),
            }
        }
    }
}

fn render(findings: &[ExpectedFinding]) -> String {
    if findings.is_empty() {
        return "(no findings)".to_string();
    }
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run all cases and summarize.
pub fn run_validator_tests(cases: &[ValidatorTestCase]) -> TestSummary {
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_case() {
        let content = r#"
# test: arity
---
  MOV 5
---
error 1:2..7 arity_mismatch
===
"#;
        let cases = parse_validator_tests(content);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "arity");
        assert_eq!(cases[0].line_number, 2);
        assert_eq!(cases[0].input, "  MOV 5\n");
        assert_eq!(cases[0].expected, vec!["error 1:2..7 arity_mismatch"]);
    }

    #[test]
    fn empty_expectation_block() {
        let content = "# test: clean\n---\n# nothing\n---\n===\n";
        let cases = parse_validator_tests(content);
        assert_eq!(cases.len(), 1);
        assert!(cases[0].expected.is_empty());
    }

    #[test]
    fn expectation_lines_parse() {
        let parsed: ExpectedFinding = "info 1:0..0 missing_meta.author".parse().expect("valid");
        assert_eq!(parsed.severity, Severity::Info);
        assert_eq!(parsed.to_string(), "info 1:0..0 missing_meta.author");

        assert!(matches!(
            "warn 1:0..0 arity_mismatch".parse::<ExpectedFinding>(),
            Err(TestFileError::Severity(_))
        ));
        assert!(matches!(
            "error 1-0 arity_mismatch".parse::<ExpectedFinding>(),
            Err(TestFileError::Position(_))
        ));
        assert!(matches!(
            "error 1:0..3".parse::<ExpectedFinding>(),
            Err(TestFileError::Shape(_))
        ));
        assert!(matches!(
            "error 1:0..3 nope".parse::<ExpectedFinding>(),
            Err(TestFileError::Code(_))
        ));
    }

    #[test]
    fn malformed_case_is_an_error_not_a_failure() {
        let case = ValidatorTestCase {
            name: "broken".to_string(),
            line_number: 1,
            input: String::new(),
            expected: vec!["nonsense".to_string()],
        };
        assert!(matches!(case.run(), TestResult::Error { .. }));
    }
}
