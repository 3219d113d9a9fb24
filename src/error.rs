//! Errors raised while loading or running conformance suites.
//!
//! A case whose runtime call raises is not a harness error; it is an outcome
//! compared against the case's expectation. These errors mean the suite or
//! configuration itself could not be used.

use std::path::{Path, PathBuf};

use derive_more::{Display, From};
use polyrt_core::RuntimeError;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Display, Debug, From)]
#[display("{kind}")]
pub struct HarnessError {
    #[from]
    kind: Box<HarnessErrorKind>,
}

impl<E> From<E> for HarnessError
where
    HarnessErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        HarnessError {
            kind: Box::new(HarnessErrorKind::from(error)),
        }
    }
}

impl HarnessError {
    pub fn kind(&self) -> &HarnessErrorKind {
        &self.kind
    }

    pub(crate) fn read(path: &Path, error: std::io::Error) -> Self {
        HarnessErrorKind::Read {
            path: path.to_owned(),
            error,
        }
        .into()
    }

    pub(crate) fn parse(source: impl std::fmt::Display, error: toml::de::Error) -> Self {
        HarnessErrorKind::Parse {
            source_name: source.to_string(),
            error,
        }
        .into()
    }

    pub(crate) fn invalid_case(
        suite: &str,
        case: &str,
        message: impl std::fmt::Display,
    ) -> Self {
        HarnessErrorKind::InvalidCase {
            suite: suite.to_owned(),
            case: case.to_owned(),
            message: message.to_string(),
        }
        .into()
    }

    pub(crate) fn invalid_literal(message: impl std::fmt::Display) -> Self {
        HarnessErrorKind::InvalidLiteral(message.to_string()).into()
    }
}

#[derive(Display, Debug)]
pub enum HarnessErrorKind {
    #[display("Cannot read {}: {error}", path.display())]
    Read { path: PathBuf, error: std::io::Error },

    #[display("Malformed {source_name}: {error}")]
    Parse {
        source_name: String,
        error: toml::de::Error,
    },

    #[display("Invalid case '{case}' in suite '{suite}': {message}")]
    InvalidCase {
        suite: String,
        case: String,
        message: String,
    },

    #[display("Invalid literal: {_0}")]
    InvalidLiteral(String),

    #[display("{_0}")]
    Runtime(RuntimeError),
}

impl From<RuntimeError> for HarnessErrorKind {
    fn from(error: RuntimeError) -> Self {
        HarnessErrorKind::Runtime(error)
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            HarnessErrorKind::Read { error, .. } => Some(error),
            HarnessErrorKind::Parse { error, .. } => Some(error),
            HarnessErrorKind::Runtime(error) => Some(error),
            _ => None,
        }
    }
}
