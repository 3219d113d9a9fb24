//! Runner configuration file.
//!
//! ```toml
//! index_policy = "strict"
//! fail_fast = true
//! filter = "floordiv"
//! include_builtin = true
//! suites = ["suites/extra.toml"]
//! ```
//!
//! Relative suite paths resolve against the directory of the config file.
//! Command-line flags override these values.

use std::path::{Path, PathBuf};

use polyrt_core::{IndexPolicy, RuntimeConfig};
use serde::Deserialize;

use crate::error::{HarnessError, HarnessResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub index_policy: IndexPolicy,
    /// Stop at the first failing case.
    pub fail_fast: bool,
    /// Only run cases whose `suite::case` name contains this text.
    pub filter: Option<String>,
    pub suites: Vec<PathBuf>,
    pub include_builtin: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            index_policy: IndexPolicy::default(),
            fail_fast: false,
            filter: None,
            suites: Vec::new(),
            include_builtin: true,
        }
    }
}

impl RunnerConfig {
    pub fn load(path: &Path) -> HarnessResult<RunnerConfig> {
        let text = std::fs::read_to_string(path).map_err(|error| HarnessError::read(path, error))?;
        let mut config: RunnerConfig = toml::from_str(&text)
            .map_err(|error| HarnessError::parse(path.display(), error))?;
        if let Some(base) = path.parent() {
            for suite in &mut config.suites {
                if suite.is_relative() {
                    *suite = base.join(&*suite);
                }
            }
        }
        Ok(config)
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            index_policy: self.index_policy,
        }
    }

    /// Whether the case named `suite::case` is selected by the filter.
    pub fn selects(&self, suite: &str, case: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| format!("{suite}::{case}").contains(filter))
    }
}
