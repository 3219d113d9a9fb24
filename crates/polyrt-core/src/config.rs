use derive_more::Display;
use serde::Deserialize;

/// How subscripts outside a container behave.
#[derive(Display, Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Reads yield the neutral default and writes are dropped.
    #[default]
    #[display("lenient")]
    Lenient,
    /// Out-of-range access raises `IndexError`.
    #[display("strict")]
    Strict,
}

/// Runtime settings a host may choose per program.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub index_policy: IndexPolicy,
}
