//! Driver configuration.
//!
//! Shape:
//! ```json
//! { "default": "gzip",
//!   "drivers": { "gzip": { "level": -1, "encoding": "gzip" },
//!                "zlib": { "level": -1, "encoding": "zlib" } } }
//! ```
//! Both directions read the same driver table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::compression::constants::DEFAULT_LEVEL;
use crate::compression::types::Encoding;
use crate::constants::{env_keys, extensions};
use crate::options::Options;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Gzip,
    Zlib,
}

impl DriverKind {
    pub fn name(self) -> &'static str {
        match self {
            DriverKind::Gzip => "gzip",
            DriverKind::Zlib => "zlib",
        }
    }

    /// Framing used when neither call nor config pins an encoding.
    pub fn default_encoding(self) -> Encoding {
        match self {
            DriverKind::Gzip => Encoding::Gzip,
            DriverKind::Zlib => Encoding::Zlib,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DriverKind::Gzip => extensions::GZIP,
            DriverKind::Zlib => extensions::ZLIB,
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown driver: {0}")]
pub struct UnknownDriver(pub String);

impl FromStr for DriverKind {
    type Err = UnknownDriver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gzip" => Ok(DriverKind::Gzip),
            "zlib" => Ok(DriverKind::Zlib),
            other => Err(UnknownDriver(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverTable {
    pub gzip: Options,
    pub zlib: Options,
}

impl Default for DriverTable {
    fn default() -> Self {
        Self {
            gzip: Options::new().level(DEFAULT_LEVEL).encoding(Encoding::Gzip),
            zlib: Options::new().level(DEFAULT_LEVEL).encoding(Encoding::Zlib),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionSettings {
    pub default: DriverKind,
    pub drivers: DriverTable,
}

impl CompressionSettings {
    pub fn from_json(text: &str) -> crate::types::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn driver(&self, kind: DriverKind) -> &Options {
        match kind {
            DriverKind::Gzip => &self.drivers.gzip,
            DriverKind::Zlib => &self.drivers.zlib,
        }
    }

    /// Apply `COMPRESSION_DRIVER`, `GZIP_LEVEL` and `ZLIB_LEVEL` from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any lookup. Unparseable values are ignored.
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup(env_keys::DRIVER).and_then(|v| v.parse().ok()) {
            self.default = kind;
        }
        if let Some(level) = lookup(env_keys::GZIP_LEVEL).and_then(|v| v.trim().parse().ok()) {
            self.drivers.gzip.level = Some(level);
        }
        if let Some(level) = lookup(env_keys::ZLIB_LEVEL).and_then(|v| v.trim().parse().ok()) {
            self.drivers.zlib.level = Some(level);
        }
        debug!(default = %self.default, gzip_level = ?self.drivers.gzip.level, zlib_level = ?self.drivers.zlib.level, "settings resolved");
        self
    }
}
