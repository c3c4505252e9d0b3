//! Configuration for environment identification and dispute resolution.
//!
//! Values come from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. A YAML file ([`CommonConfig::load`] / [`CommonConfig::parse`])
//! 3. Environment variables ([`CommonConfig::with_env_overrides`])
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `OB_SSA_ENV_PROPERTY_NAME` | SSA claim inspected for the environment (default: `software_environment`) |
//! | `OB_SSA_ENV_SANDBOX_VALUE` | Claim value that marks a sandbox statement (default: `sandbox`) |
//! | `OB_DISPUTE_RESOLUTION_ENABLED` | Enable dispute resolution data capture |
//! | `OB_PUBLISH_NON_ERROR_DISPUTE_DATA` | Publish dispute data for non-error status codes |

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CommonError, CommonResult};

pub const ENV_SSA_PROPERTY_NAME: &str = "OB_SSA_ENV_PROPERTY_NAME";
pub const ENV_SSA_SANDBOX_VALUE: &str = "OB_SSA_ENV_SANDBOX_VALUE";
pub const ENV_DISPUTE_RESOLUTION_ENABLED: &str = "OB_DISPUTE_RESOLUTION_ENABLED";
pub const ENV_PUBLISH_NON_ERROR_DISPUTE_DATA: &str = "OB_PUBLISH_NON_ERROR_DISPUTE_DATA";

/// Source of the configuration values the decision functions depend on.
///
/// Implementations are queried on every decision, so a provider backed by
/// reloadable state takes effect without rebuilding its consumers.
pub trait ConfigProvider: Send + Sync {
    /// Name of the SSA claim that identifies the software environment.
    fn sandbox_claim_name(&self) -> String;

    /// Claim value (compared case-insensitively) that marks a sandbox statement.
    fn sandbox_claim_expected_value(&self) -> String;

    /// Whether dispute data for non-error status codes may be published.
    fn is_non_error_dispute_publishing_enabled(&self) -> bool;

    /// Full dispute resolution settings.
    fn dispute_resolution(&self) -> DisputeResolutionConfig {
        DisputeResolutionConfig {
            publish_non_error_data: self.is_non_error_dispute_publishing_enabled(),
            ..DisputeResolutionConfig::default()
        }
    }
}

/// How the software environment is identified from an SSA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareEnvIdentification {
    /// Claim inspected in the SSA body.
    #[serde(default = "default_ssa_property_name")]
    pub ssa_property_name: String,

    /// Claim value that identifies the sandbox environment.
    #[serde(default = "default_ssa_property_value_for_sandbox")]
    pub ssa_property_value_for_sandbox: String,
}

fn default_ssa_property_name() -> String {
    "software_environment".to_string()
}

fn default_ssa_property_value_for_sandbox() -> String {
    "sandbox".to_string()
}

impl Default for SoftwareEnvIdentification {
    fn default() -> Self {
        Self {
            ssa_property_name: default_ssa_property_name(),
            ssa_property_value_for_sandbox: default_ssa_property_value_for_sandbox(),
        }
    }
}

/// Dispute resolution data settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeResolutionConfig {
    /// Master switch for dispute resolution data capture.
    #[serde(default)]
    pub enabled: bool,

    /// Publish dispute data for status codes below 400.
    #[serde(default)]
    pub publish_non_error_data: bool,

    /// Maximum characters kept from a request body.
    #[serde(default = "default_max_body_length")]
    pub max_request_body_length: usize,

    /// Maximum characters kept from a response body.
    #[serde(default = "default_max_body_length")]
    pub max_response_body_length: usize,

    /// Maximum characters kept from serialized headers.
    #[serde(default = "default_max_header_length")]
    pub max_header_length: usize,
}

fn default_max_body_length() -> usize {
    4096
}

fn default_max_header_length() -> usize {
    2048
}

impl Default for DisputeResolutionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            publish_non_error_data: false,
            max_request_body_length: default_max_body_length(),
            max_response_body_length: default_max_body_length(),
            max_header_length: default_max_header_length(),
        }
    }
}

/// Common configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonConfig {
    #[serde(default)]
    pub software_environment_identification: SoftwareEnvIdentification,

    #[serde(default)]
    pub dispute_resolution: DisputeResolutionConfig,
}

impl CommonConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> CommonResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CommonError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CommonError::config(format!("failed to read config: {}", e)))?;

        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded common config");
        Ok(config)
    }

    /// Parse from YAML content and validate.
    pub fn parse(content: &str) -> CommonResult<Self> {
        let config: CommonConfig = serde_yaml::from_str(content)
            .map_err(|e| CommonError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `OB_*` environment variables on top of the current values.
    pub fn with_env_overrides(mut self) -> Self {
        let ident = &mut self.software_environment_identification;
        if let Some(name) = env_string(ENV_SSA_PROPERTY_NAME) {
            ident.ssa_property_name = name;
        }
        if let Some(value) = env_string(ENV_SSA_SANDBOX_VALUE) {
            ident.ssa_property_value_for_sandbox = value;
        }

        let dispute = &mut self.dispute_resolution;
        if let Some(enabled) = env_flag(ENV_DISPUTE_RESOLUTION_ENABLED) {
            dispute.enabled = enabled;
        }
        if let Some(publish) = env_flag(ENV_PUBLISH_NON_ERROR_DISPUTE_DATA) {
            dispute.publish_non_error_data = publish;
        }
        self
    }

    pub fn validate(&self) -> CommonResult<()> {
        let ident = &self.software_environment_identification;
        if ident.ssa_property_name.trim().is_empty() {
            return Err(CommonError::config(
                "software_environment_identification.ssa_property_name must not be empty",
            ));
        }
        if ident.ssa_property_value_for_sandbox.trim().is_empty() {
            return Err(CommonError::config(
                "software_environment_identification.ssa_property_value_for_sandbox must not be empty",
            ));
        }
        Ok(())
    }

    /// Set the SSA claim name and sandbox value.
    pub fn with_sandbox_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.software_environment_identification = SoftwareEnvIdentification {
            ssa_property_name: name.into(),
            ssa_property_value_for_sandbox: value.into(),
        };
        self
    }

    /// Allow publishing dispute data for non-error status codes.
    pub fn with_publish_non_error_dispute_data(mut self, publish: bool) -> Self {
        self.dispute_resolution.publish_non_error_data = publish;
        self
    }

    /// Replace the dispute resolution settings.
    pub fn with_dispute_resolution(mut self, dispute: DisputeResolutionConfig) -> Self {
        self.dispute_resolution = dispute;
        self
    }
}

impl ConfigProvider for CommonConfig {
    fn sandbox_claim_name(&self) -> String {
        self.software_environment_identification
            .ssa_property_name
            .clone()
    }

    fn sandbox_claim_expected_value(&self) -> String {
        self.software_environment_identification
            .ssa_property_value_for_sandbox
            .clone()
    }

    fn is_non_error_dispute_publishing_enabled(&self) -> bool {
        self.dispute_resolution.publish_non_error_data
    }

    fn dispute_resolution(&self) -> DisputeResolutionConfig {
        self.dispute_resolution.clone()
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_flag(key: &str) -> Option<bool> {
    env_string(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
