//! Run results and their serialized forms.
//!
//! The JUnit XML layout is fixed: one `<testsuite>` inside `<testsuites>`,
//! one `<testcase>` per vector in run order with the suite name as its
//! `classname`, durations in seconds with four decimals. `errors` is always
//! 0; every failing vector is a `<failure>`.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

/// Default suite name for reports.
pub const DEFAULT_SUITE_NAME: &str = "Conformance";

/// Result of checking one vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub vector_id: String,
    pub passed: bool,
    pub duration: Duration,
    /// Error text for a failed vector; `None` when it passed.
    pub failure_detail: Option<String>,
}

impl TestOutcome {
    pub fn passed(vector_id: impl Into<String>, duration: Duration) -> Self {
        Self {
            vector_id: vector_id.into(),
            passed: true,
            duration,
            failure_detail: None,
        }
    }

    pub fn failed(
        vector_id: impl Into<String>,
        duration: Duration,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            vector_id: vector_id.into(),
            passed: false,
            duration,
            failure_detail: Some(detail.into()),
        }
    }
}

/// Aggregate of a conformance run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub suite_name: String,
    pub total_count: usize,
    pub failure_count: usize,
    pub error_count: usize,
    pub total_duration: Duration,
    pub outcomes: Vec<TestOutcome>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.failure_count == 0 && self.error_count == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// `OK` or `FAILED (failures=N)`.
    pub fn summary_line(&self) -> String {
        if self.all_passed() {
            "OK".to_string()
        } else {
            format!("FAILED (failures={})", self.failure_count)
        }
    }

    /// Render the JUnit XML document.
    pub fn to_junit_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<testsuites>\n");
        // Writing into a String cannot fail.
        let _ = writeln!(
            xml,
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{}\">",
            xml_escape(&self.suite_name),
            self.total_count,
            self.failure_count,
            self.error_count,
            format_seconds(self.total_duration),
        );

        let classname = xml_escape(&self.suite_name);
        for outcome in &self.outcomes {
            let name = xml_escape(&outcome.vector_id);
            let time = format_seconds(outcome.duration);
            match &outcome.failure_detail {
                Some(detail) if !outcome.passed => {
                    let detail = xml_escape(detail);
                    let _ = writeln!(
                        xml,
                        "    <testcase name=\"{name}\" classname=\"{classname}\" time=\"{time}\">"
                    );
                    let _ = writeln!(xml, "      <failure message=\"{detail}\">{detail}</failure>");
                    xml.push_str("    </testcase>\n");
                }
                _ => {
                    let _ = writeln!(
                        xml,
                        "    <testcase name=\"{name}\" classname=\"{classname}\" time=\"{time}\"/>"
                    );
                }
            }
        }

        xml.push_str("  </testsuite>\n");
        xml.push_str("</testsuites>\n");
        xml
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// Same record as the XML form: `name`, `tests`, `failures`, `errors`,
    /// `time` and an ordered `testcases` list of `{name, classname, time}`
    /// with a `failure: {message, text}` on failed cases.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonSuite {
            name: &self.suite_name,
            tests: self.total_count,
            failures: self.failure_count,
            errors: self.error_count,
            time: format_seconds(self.total_duration),
            testcases: self
                .outcomes
                .iter()
                .map(|o| JsonTestCase {
                    name: &o.vector_id,
                    classname: &self.suite_name,
                    time: format_seconds(o.duration),
                    failure: o
                        .failure_detail
                        .as_deref()
                        .filter(|_| !o.passed)
                        .map(|detail| JsonFailure {
                            message: detail,
                            text: detail,
                        }),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }
}

#[derive(Serialize)]
struct JsonSuite<'a> {
    name: &'a str,
    tests: usize,
    failures: usize,
    errors: usize,
    time: String,
    testcases: Vec<JsonTestCase<'a>>,
}

#[derive(Serialize)]
struct JsonTestCase<'a> {
    name: &'a str,
    classname: &'a str,
    time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<JsonFailure<'a>>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    message: &'a str,
    text: &'a str,
}

/// Builds a [`RunReport`] from per-vector outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn generate(
        outcomes: Vec<TestOutcome>,
        suite_name: impl Into<String>,
        total_duration: Duration,
    ) -> RunReport {
        let failure_count = outcomes.iter().filter(|o| !o.passed).count();
        RunReport {
            suite_name: suite_name.into(),
            total_count: outcomes.len(),
            failure_count,
            error_count: 0,
            total_duration,
            outcomes,
        }
    }
}

/// Seconds with exactly four decimals.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.4}", duration.as_secs_f64())
}

/// Escape text for use in both attribute values and element content.
///
/// Characters XML 1.0 cannot carry at all are replaced with U+FFFD.
fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
