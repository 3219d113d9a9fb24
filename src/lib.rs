//! Conformance harness for the `polyrt-core` runtime.
//!
//! A suite is a TOML file of cases, each naming a runtime primitive, its
//! arguments, and either the `repr` of the expected result or the kind of
//! error it must raise. The built-in suite pins every behaviour a generated
//! program may rely on.

pub mod config;
pub mod error;
pub mod literal;
pub mod operation;
pub mod runner;
pub mod suite;

pub use crate::config::RunnerConfig;
pub use crate::error::{HarnessError, HarnessErrorKind, HarnessResult};
pub use crate::operation::Operation;
pub use crate::runner::{CaseReport, Outcome, RunReport, Runner};
pub use crate::suite::{Case, Expectation, Suite};
