//! Conformance suite files.
//!
//! ```toml
//! name = "core"
//! description = "optional"
//!
//! [[case]]
//! name = "floor division rounds down"
//! op = "floordiv"
//! args = [-7, 2]
//! expect = "-4"          # repr of the result
//!
//! [[case]]
//! name = "zero step"
//! op = "range"
//! args = [0, 5, 0]
//! raises = "ValueError"  # error kind name
//! policy = "strict"      # optional, overrides the run's index policy
//! ```

use std::collections::HashSet;
use std::path::Path;

use polyrt_core::{IndexPolicy, Value};
use serde::Deserialize;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::literal::decode;
use crate::operation::Operation;

/// The suite embedded in the binary, pinning every runtime behaviour.
pub const BUILTIN_SUITE: &str = include_str!("../conformance/core.toml");

const ERROR_NAMES: &[&str] = &[
    "DivisionByZero",
    "ValueError",
    "TypeError",
    "IndexError",
    "KeyError",
    "OverflowError",
    "MemoryError",
    "Io",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Suite {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "case")]
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub name: String,
    pub op: Operation,
    #[serde(default)]
    pub args: Vec<toml::Value>,
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(default)]
    pub raises: Option<String>,
    #[serde(default)]
    pub policy: Option<IndexPolicy>,
}

/// What a case requires of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation<'a> {
    /// The call returns a value with this `repr`.
    Repr(&'a str),
    /// The call raises the named error kind.
    Raises(&'a str),
}

impl Case {
    pub fn expectation(&self) -> Option<Expectation<'_>> {
        match (&self.expect, &self.raises) {
            (Some(repr), None) => Some(Expectation::Repr(repr)),
            (None, Some(name)) => Some(Expectation::Raises(name)),
            _ => None,
        }
    }

    /// Fresh runtime values for the arguments. Each call builds new
    /// containers, so a case that mutates its arguments can run again.
    pub fn decode_args(&self) -> HarnessResult<Vec<Value>> {
        self.args.iter().map(decode).collect()
    }

    fn validate(&self, suite: &str) -> HarnessResult<()> {
        let invalid = |message: String| HarnessError::invalid_case(suite, &self.name, message);
        match self.expectation() {
            None => {
                return Err(invalid(
                    "exactly one of 'expect' or 'raises' is required".to_owned(),
                ));
            }
            Some(Expectation::Raises(name)) if !ERROR_NAMES.contains(&name) => {
                return Err(invalid(format!(
                    "unknown error kind '{name}', expected one of {}",
                    ERROR_NAMES.join(", ")
                )));
            }
            Some(_) => {}
        }
        let arity = self.op.arity();
        if !arity.contains(&self.args.len()) {
            return Err(invalid(format!(
                "'{}' takes {} arguments, got {}",
                self.op,
                describe_arity(arity.start(), arity.end()),
                self.args.len()
            )));
        }
        self.decode_args()
            .map_err(|error| invalid(error.to_string()))?;
        Ok(())
    }
}

fn describe_arity(min: &usize, max: &usize) -> String {
    match (min, max) {
        (min, &usize::MAX) => format!("at least {min}"),
        (min, max) if min == max => min.to_string(),
        (min, max) => format!("{min} to {max}"),
    }
}

impl Suite {
    /// Parses and validates suite text. `source` names it in error messages.
    pub fn parse(text: &str, source: &str) -> HarnessResult<Suite> {
        let suite: Suite =
            toml::from_str(text).map_err(|error| HarnessError::parse(source, error))?;
        let mut seen = HashSet::new();
        for case in &suite.cases {
            if !seen.insert(case.name.as_str()) {
                return Err(HarnessError::invalid_case(
                    &suite.name,
                    &case.name,
                    "duplicate case name",
                ));
            }
            case.validate(&suite.name)?;
        }
        debug!(suite = %suite.name, cases = suite.cases.len(), source, "loaded suite");
        Ok(suite)
    }

    pub fn load(path: &Path) -> HarnessResult<Suite> {
        let text = std::fs::read_to_string(path).map_err(|error| HarnessError::read(path, error))?;
        Suite::parse(&text, &path.display().to_string())
    }

    pub fn builtin() -> HarnessResult<Suite> {
        Suite::parse(BUILTIN_SUITE, "builtin suite")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cases() {
        let suite = Suite::parse(
            r#"
            name = "tiny"

            [[case]]
            name = "wrap"
            op = "get_index"
            args = [[1, 2, 3], -1]
            expect = "3"

            [[case]]
            name = "zero"
            op = "mod"
            args = [1, 0]
            raises = "DivisionByZero"
            policy = "strict"
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(suite.name, "tiny");
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].expectation(), Some(Expectation::Repr("3")));
        assert_eq!(suite.cases[1].op, Operation::Mod);
        assert_eq!(suite.cases[1].policy, Some(IndexPolicy::Strict));
    }

    #[test]
    fn rejects_case_without_expectation() {
        let err = Suite::parse(
            r#"
            name = "bad"
            [[case]]
            name = "nothing"
            op = "len"
            args = ["a"]
            "#,
            "inline",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid case 'nothing' in suite 'bad': exactly one of 'expect' or 'raises' is required"
        );
    }

    #[test]
    fn rejects_wrong_arity_and_unknown_errors() {
        let err = Suite::parse(
            r#"
            name = "bad"
            [[case]]
            name = "short"
            op = "set_index"
            args = [[1], 0]
            expect = "[1]"
            "#,
            "inline",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid case 'short' in suite 'bad': 'set_index' takes 3 arguments, got 2"
        );

        let err = Suite::parse(
            r#"
            name = "bad"
            [[case]]
            name = "oops"
            op = "len"
            args = [1]
            raises = "Oops"
            "#,
            "inline",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown error kind 'Oops'"));
    }

    #[test]
    fn rejects_unknown_operations_and_duplicates() {
        let err = Suite::parse(
            "name = \"bad\"\n[[case]]\nname = \"x\"\nop = \"explode\"\nexpect = \"1\"\n",
            "inline",
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Malformed inline: "));

        let duplicate = "name = \"dup\"\n\
            [[case]]\nname = \"a\"\nop = \"len\"\nargs = [\"x\"]\nexpect = \"1\"\n\
            [[case]]\nname = \"a\"\nop = \"len\"\nargs = [\"y\"]\nexpect = \"1\"\n";
        let err = Suite::parse(duplicate, "inline").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid case 'a' in suite 'dup': duplicate case name"
        );
    }

    #[test]
    fn builtin_suite_is_valid() {
        let suite = Suite::builtin().unwrap();
        assert_eq!(suite.name, "core");
        assert!(!suite.cases.is_empty());
    }
}
