//! The `[cordapp]` settings block.
//!
//! Most of these fields describe the CorDapp for the ledger runtime. The
//! packager itself only reads `multi-module-filter` and
//! `on-missing-artifact`; the rest are validated so that a misconfigured
//! CorDapp fails before any archive is written.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::packager::{FilterMode, MissingArtifactPolicy};
use crate::util::diagnostic::Diagnostic;

/// Platform version assumed when `minimum-platform-version` is not set.
pub const DEFAULT_MINIMUM_PLATFORM_VERSION: u32 = 1;

/// Descriptive metadata for the contract or workflow half of a CorDapp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CordappInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default)]
    pub licence: Option<String>,

    /// Integer version of this half of the CorDapp
    #[serde(default)]
    pub version_id: Option<u32>,
}

/// Settings read from the `[cordapp]` table of `Cordpack.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CordappSettings {
    /// Use recursive multi-module filtering instead of the flat filter
    pub multi_module_filter: bool,

    pub target_platform_version: Option<u32>,

    pub minimum_platform_version: Option<u32>,

    /// Whether the produced jar is sealed
    pub sealing: bool,

    pub contract: Option<CordappInfo>,

    pub workflow: Option<CordappInfo>,

    /// What to do when a sub-project has no discoverable archive
    pub on_missing_artifact: Option<MissingArtifactPolicy>,
}

impl Default for CordappSettings {
    fn default() -> Self {
        CordappSettings {
            multi_module_filter: false,
            target_platform_version: None,
            minimum_platform_version: None,
            sealing: true,
            contract: None,
            workflow: None,
            on_missing_artifact: None,
        }
    }
}

/// Fatal misconfiguration of the `[cordapp]` block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("`target-platform-version` is not set in the [cordapp] block")]
    MissingTargetPlatformVersion,

    #[error("`{field}` must be at least 1, found {value}")]
    InvalidPlatformVersion { field: &'static str, value: u32 },

    #[error("`minimum-platform-version` ({minimum}) is greater than `target-platform-version` ({target})")]
    MinimumAboveTarget { minimum: u32, target: u32 },

    #[error("`version-id` is not set in the [cordapp.{block}] block")]
    MissingVersionId { block: &'static str },
}

impl SettingsError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            SettingsError::MissingTargetPlatformVersion => diag.with_suggestion(
                "Add `target-platform-version = <n>` under [cordapp] in Cordpack.toml",
            ),
            SettingsError::InvalidPlatformVersion { field, .. } => {
                diag.with_suggestion(format!("Set `{}` to a positive integer", field))
            }
            SettingsError::MinimumAboveTarget { .. } => diag
                .with_context("a CorDapp cannot require a newer platform than it targets")
                .with_suggestion("Lower `minimum-platform-version` or raise `target-platform-version`"),
            SettingsError::MissingVersionId { block } => diag.with_suggestion(format!(
                "Add `version-id = <n>` under [cordapp.{}]",
                block
            )),
        }
    }
}

impl CordappSettings {
    /// The filter mode selected by `multi-module-filter`.
    pub fn filter_mode(&self) -> FilterMode {
        if self.multi_module_filter {
            FilterMode::MultiModule
        } else {
            FilterMode::Direct
        }
    }

    /// Minimum platform version, defaulted when unset.
    pub fn minimum_platform_version(&self) -> u32 {
        self.minimum_platform_version
            .unwrap_or(DEFAULT_MINIMUM_PLATFORM_VERSION)
    }

    /// Check the settings for fatal misconfiguration.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let target = self
            .target_platform_version
            .ok_or(SettingsError::MissingTargetPlatformVersion)?;
        if target < 1 {
            return Err(SettingsError::InvalidPlatformVersion {
                field: "target-platform-version",
                value: target,
            });
        }

        let minimum = match self.minimum_platform_version {
            Some(0) => {
                return Err(SettingsError::InvalidPlatformVersion {
                    field: "minimum-platform-version",
                    value: 0,
                })
            }
            Some(v) => v,
            None => {
                tracing::warn!(
                    "`minimum-platform-version` not set, assuming {}",
                    DEFAULT_MINIMUM_PLATFORM_VERSION
                );
                DEFAULT_MINIMUM_PLATFORM_VERSION
            }
        };
        if minimum > target {
            return Err(SettingsError::MinimumAboveTarget { minimum, target });
        }

        for (block, info) in [("contract", &self.contract), ("workflow", &self.workflow)] {
            if let Some(info) = info {
                if info.version_id.is_none() {
                    return Err(SettingsError::MissingVersionId { block });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> CordappSettings {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = parse("target-platform-version = 4");
        assert!(!settings.multi_module_filter);
        assert!(settings.sealing);
        assert_eq!(settings.filter_mode(), FilterMode::Direct);
        assert_eq!(settings.minimum_platform_version(), 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_target_platform_version() {
        let settings = parse("multi-module-filter = true");
        assert_eq!(settings.filter_mode(), FilterMode::MultiModule);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::MissingTargetPlatformVersion)
        );
    }

    #[test]
    fn test_minimum_above_target() {
        let settings = parse(
            r#"
target-platform-version = 4
minimum-platform-version = 5
"#,
        );
        assert_eq!(
            settings.validate(),
            Err(SettingsError::MinimumAboveTarget { minimum: 5, target: 4 })
        );
    }

    #[test]
    fn test_workflow_requires_version_id() {
        let settings = parse(
            r#"
target-platform-version = 4

[workflow]
name = "Example Flows"
vendor = "Example Co"
"#,
        );
        let err = settings.validate().unwrap_err();
        assert_eq!(err, SettingsError::MissingVersionId { block: "workflow" });

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("[cordapp.workflow]"));
    }

    #[test]
    fn test_missing_artifact_policy_parses() {
        let settings = parse(
            r#"
target-platform-version = 4
on-missing-artifact = "fail"
"#,
        );
        assert_eq!(settings.on_missing_artifact, Some(MissingArtifactPolicy::Fail));
    }
}
