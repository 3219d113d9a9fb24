//! Executes suites and collects per-case outcomes.

use std::fmt;

use polyrt_core::{RtResult, RuntimeConfig, Value, repr};
use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::error::HarnessResult;
use crate::suite::{Case, Expectation, Suite};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed { expected: String, actual: String },
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub suite: String,
    pub case: String,
    pub outcome: Outcome,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Results of a whole run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    /// Set when `fail_fast` stopped the run early.
    pub stopped_early: bool,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.cases {
            match &report.outcome {
                Outcome::Passed => writeln!(f, "PASS {}::{}", report.suite, report.case)?,
                Outcome::Failed { expected, actual } => writeln!(
                    f,
                    "FAIL {}::{}\n  expected: {expected}\n    actual: {actual}",
                    report.suite, report.case
                )?,
            }
        }
        if self.stopped_early {
            writeln!(f, "stopped after first failure")?;
        }
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

pub struct Runner {
    config: RunnerConfig,
    runtime: RuntimeConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        let runtime = config.runtime();
        Runner { config, runtime }
    }

    pub fn run(&self, suites: &[Suite]) -> HarnessResult<RunReport> {
        let mut report = RunReport::default();
        for suite in suites {
            let before = report.cases.len();
            for case in &suite.cases {
                if !self.config.selects(&suite.name, &case.name) {
                    continue;
                }
                let case_report = self.run_case(&suite.name, case)?;
                let failed = !case_report.passed();
                report.cases.push(case_report);
                if failed && self.config.fail_fast {
                    report.stopped_early = true;
                    return Ok(report);
                }
            }
            info!(
                suite = %suite.name,
                ran = report.cases.len() - before,
                "suite finished"
            );
        }
        Ok(report)
    }

    fn run_case(&self, suite: &str, case: &Case) -> HarnessResult<CaseReport> {
        let args = case.decode_args()?;
        let policy = case.policy.unwrap_or(self.runtime.index_policy);
        debug!(suite, case = %case.name, op = %case.op, %policy, "running case");
        let result = case.op.apply(&args, policy);

        let outcome = match case.expectation() {
            Some(expectation) => judge(expectation, &result),
            // Suite::parse rejects such cases; a hand-built Case may still lack one.
            None => Outcome::Failed {
                expected: "an expectation".to_owned(),
                actual: describe(&result),
            },
        };
        if let Outcome::Failed { expected, actual } = &outcome {
            warn!(suite, case = %case.name, %expected, %actual, "case failed");
        }
        Ok(CaseReport {
            suite: suite.to_owned(),
            case: case.name.clone(),
            outcome,
        })
    }
}

fn judge(expectation: Expectation<'_>, result: &RtResult<Value>) -> Outcome {
    let passed = match (expectation, result) {
        (Expectation::Repr(expected), Ok(value)) => repr(value) == expected,
        (Expectation::Raises(expected), Err(error)) => error.name() == expected,
        _ => false,
    };
    if passed {
        return Outcome::Passed;
    }
    Outcome::Failed {
        expected: match expectation {
            Expectation::Repr(repr) => repr.to_owned(),
            Expectation::Raises(name) => format!("raises {name}"),
        },
        actual: describe(result),
    }
}

fn describe(result: &RtResult<Value>) -> String {
    match result {
        Ok(value) => repr(value),
        Err(error) => format!("raises {}: {error}", error.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use polyrt_core::IndexPolicy;

    const SUITE: &str = r#"
        name = "demo"

        [[case]]
        name = "wrap"
        op = "get_index"
        args = [[10, 20, 30], -1]
        expect = "30"

        [[case]]
        name = "wrong"
        op = "floordiv"
        args = [-7, 2]
        expect = "-3"

        [[case]]
        name = "strict read"
        op = "get_index"
        args = [[10, 20, 30], 5]
        raises = "IndexError"
        policy = "strict"
    "#;

    fn demo() -> Suite {
        Suite::parse(SUITE, "demo").unwrap()
    }

    #[test]
    fn report_lists_every_case() {
        let report = Runner::new(RunnerConfig::default()).run(&[demo()]).unwrap();
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_snapshot!(report, @r"
        PASS demo::wrap
        FAIL demo::wrong
          expected: -3
            actual: -4
        PASS demo::strict read
        2 passed, 1 failed
        ");
    }

    #[test]
    fn fail_fast_stops_at_first_failure() {
        let config = RunnerConfig {
            fail_fast: true,
            ..RunnerConfig::default()
        };
        let report = Runner::new(config).run(&[demo()]).unwrap();
        assert_eq!(report.cases.len(), 2);
        assert!(report.stopped_early);
    }

    #[test]
    fn filter_selects_cases() {
        let config = RunnerConfig {
            filter: Some("demo::wrap".to_owned()),
            ..RunnerConfig::default()
        };
        let report = Runner::new(config).run(&[demo()]).unwrap();
        assert_eq!(report.cases.len(), 1);
        assert!(report.is_success());
    }

    #[test]
    fn unexpected_errors_are_described() {
        let suite = Suite::parse(
            r#"
            name = "errs"
            [[case]]
            name = "div"
            op = "mod"
            args = [1, 0]
            expect = "0"
            "#,
            "inline",
        )
        .unwrap();
        let config = RunnerConfig {
            index_policy: IndexPolicy::Strict,
            ..RunnerConfig::default()
        };
        let report = Runner::new(config).run(&[suite]).unwrap();
        let failure = report.failures().next().unwrap();
        assert_eq!(
            failure.outcome,
            Outcome::Failed {
                expected: "0".to_owned(),
                actual: "raises DivisionByZero: ZeroDivisionError: mod: 1 (int) divided by 0 (int)"
                    .to_owned(),
            }
        );
    }
}
