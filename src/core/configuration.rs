//! Named dependency configurations.
//!
//! The host build exposes configurations by name. The packager only ever
//! consults a fixed set of them, so they are an explicit enumeration here.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// A dependency configuration the packager knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationName {
    #[serde(rename = "runtime")]
    Runtime,
    #[serde(rename = "runtimeClasspath")]
    RuntimeClasspath,
    #[serde(rename = "cordapp")]
    Cordapp,
    #[serde(rename = "cordaCompile")]
    CordaCompile,
    #[serde(rename = "cordaRuntime")]
    CordaRuntime,
}

/// Configurations whose dependencies the runtime supplies.
pub const PLATFORM_CONFIGURATIONS: [ConfigurationName; 3] = [
    ConfigurationName::Cordapp,
    ConfigurationName::CordaCompile,
    ConfigurationName::CordaRuntime,
];

impl ConfigurationName {
    /// All known configurations.
    pub const ALL: [ConfigurationName; 5] = [
        ConfigurationName::Runtime,
        ConfigurationName::RuntimeClasspath,
        ConfigurationName::Cordapp,
        ConfigurationName::CordaCompile,
        ConfigurationName::CordaRuntime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationName::Runtime => "runtime",
            ConfigurationName::RuntimeClasspath => "runtimeClasspath",
            ConfigurationName::Cordapp => "cordapp",
            ConfigurationName::CordaCompile => "cordaCompile",
            ConfigurationName::CordaRuntime => "cordaRuntime",
        }
    }

    /// Whether dependencies in this configuration are provided by the platform.
    pub fn is_platform_provided(&self) -> bool {
        PLATFORM_CONFIGURATIONS.contains(self)
    }
}

impl fmt::Display for ConfigurationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ConfigurationName::ALL.iter().find(|c| c.as_str() == s) {
            Some(c) => Ok(*c),
            None => bail!(
                "unknown configuration `{}` (expected one of: {})",
                s,
                ConfigurationName::ALL
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
