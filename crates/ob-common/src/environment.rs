//! Software environment classification from a software statement (SSA).
//!
//! A client presenting no statement is treated as production. When a
//! statement is present its body claim named by the configured
//! `ssa_property_name` is compared case-insensitively against the configured
//! sandbox value; only an exact match selects the sandbox environment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claims::{ClaimDecoder, JwsClaimDecoder, JwtPart};
use crate::config::ConfigProvider;
use crate::error::{CommonError, CommonResult};

/// Environment a client operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SoftwareEnvironment {
    Sandbox,
    #[default]
    Production,
}

impl SoftwareEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "SANDBOX",
            Self::Production => "PRODUCTION",
        }
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for SoftwareEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoftwareEnvironment {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sandbox") {
            Ok(Self::Sandbox)
        } else if s.eq_ignore_ascii_case("production") {
            Ok(Self::Production)
        } else {
            Err(CommonError::Config {
                message: format!("unknown software environment: {}", s),
            })
        }
    }
}

/// Classifies software statements as sandbox or production.
///
/// Both collaborators are consulted on every call; nothing is cached.
#[derive(Clone)]
pub struct EnvironmentClassifier {
    decoder: Arc<dyn ClaimDecoder>,
    config: Arc<dyn ConfigProvider>,
}

impl EnvironmentClassifier {
    pub fn new(decoder: Arc<dyn ClaimDecoder>, config: Arc<dyn ConfigProvider>) -> Self {
        Self { decoder, config }
    }

    /// Classifier using the default [`JwsClaimDecoder`].
    pub fn with_config(config: Arc<dyn ConfigProvider>) -> Self {
        Self::new(Arc::new(JwsClaimDecoder::default()), config)
    }

    /// Classify a software statement.
    ///
    /// An absent or empty statement is [`SoftwareEnvironment::Production`]
    /// and is never decoded. A statement that fails to decode is an error.
    pub fn classify(&self, software_statement: Option<&str>) -> CommonResult<SoftwareEnvironment> {
        software_environment_from_statement(
            software_statement,
            self.decoder.as_ref(),
            self.config.as_ref(),
        )
    }
}

impl fmt::Debug for EnvironmentClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentClassifier").finish_non_exhaustive()
    }
}

/// Classify a software statement against borrowed collaborators.
pub fn software_environment_from_statement(
    software_statement: Option<&str>,
    decoder: &dyn ClaimDecoder,
    config: &dyn ConfigProvider,
) -> CommonResult<SoftwareEnvironment> {
    let Some(statement) = software_statement.filter(|s| !s.is_empty()) else {
        debug!(environment = %SoftwareEnvironment::Production, "no software statement presented");
        return Ok(SoftwareEnvironment::Production);
    };

    let body = decoder.decode(statement, JwtPart::Body)?;

    let claim_name = config.sandbox_claim_name();
    let sandbox_value = config.sandbox_claim_expected_value();

    let environment = match body.get_as_string(&claim_name) {
        Some(value) if equals_ignore_case(&sandbox_value, &value) => SoftwareEnvironment::Sandbox,
        _ => SoftwareEnvironment::Production,
    };

    debug!(
        claim = %claim_name,
        claim_present = body.contains(&claim_name),
        environment = %environment,
        "classified software statement"
    );
    Ok(environment)
}

/// Case-insensitive comparison, character by character.
///
/// Characters match when equal, equal after upper-casing, or equal after
/// lower-casing.
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    if a.len() == b.len() && a.eq_ignore_ascii_case(b) {
        return true;
    }
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) => {
                if l != r
                    && !l.to_uppercase().eq(r.to_uppercase())
                    && !l.to_lowercase().eq(r.to_lowercase())
                {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
