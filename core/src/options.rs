//! Option dictionaries and the per-key merge that produces effective options.
//!
//! Precedence, per key: call-site value, then the driver's default
//! dictionary, then the hard-coded default.

use serde::{Deserialize, Serialize};

use crate::compression::constants::DEFAULT_LEVEL;
use crate::compression::types::Encoding;

/// Sparse option set. Used both for per-call overrides and for a driver's
/// configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub level: Option<i32>,
    pub encoding: Option<Encoding>,
    /// Storage backend name; `None` means the local filesystem.
    pub disk: Option<String>,
    /// Cap on decompressed size; `0` behaves like `None`.
    pub max_length: Option<usize>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

/// Bare string shorthand: just a disk name.
impl From<&str> for Options {
    fn from(disk: &str) -> Self {
        Options { disk: Some(disk.to_owned()), ..Options::default() }
    }
}

impl From<String> for Options {
    fn from(disk: String) -> Self {
        Options { disk: Some(disk), ..Options::default() }
    }
}

/// Fully resolved options a codec call runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveOptions {
    pub level: i32,
    pub encoding: Encoding,
    pub disk: Option<String>,
    pub max_length: Option<usize>,
}

/// Merge `call` over `defaults`, falling back to `-1` / `default_encoding` /
/// local filesystem / unbounded. Pure and total.
pub fn resolve(call: &Options, defaults: &Options, default_encoding: Encoding) -> EffectiveOptions {
    EffectiveOptions {
        level: call.level.or(defaults.level).unwrap_or(DEFAULT_LEVEL),
        encoding: call.encoding.or(defaults.encoding).unwrap_or(default_encoding),
        disk: call.disk.clone().or_else(|| defaults.disk.clone()),
        max_length: call
            .max_length
            .or(defaults.max_length)
            .filter(|&n| n > 0),
    }
}

/// The driver's default dictionary with hard-coded fallbacks filled in.
pub fn with_fallbacks(defaults: &Options, default_encoding: Encoding) -> Options {
    let eff = resolve(&Options::default(), defaults, default_encoding);
    Options {
        level: Some(eff.level),
        encoding: Some(eff.encoding),
        disk: eff.disk,
        max_length: eff.max_length,
    }
}
