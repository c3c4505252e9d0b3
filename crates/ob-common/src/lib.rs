//! Common decision utilities for open banking services.
//!
//! This crate provides:
//!
//! - Software environment classification (sandbox or production) from a
//!   software statement (SSA)
//! - Dispute resolution data publishing policy
//! - Bounded-length rendering of dispute payload fields
//! - A named constructor registry for configuration-selected implementations
//!
//! Statement decoding and configuration are reached through the
//! [`ClaimDecoder`] and [`ConfigProvider`] traits. [`JwsClaimDecoder`] and
//! [`CommonConfig`] are the bundled implementations.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use ob_common::{CommonConfig, DisputePublishingGate, EnvironmentClassifier, SoftwareEnvironment};
//!
//! let config = Arc::new(CommonConfig::from_env());
//!
//! let classifier = EnvironmentClassifier::with_config(config.clone());
//! assert_eq!(classifier.classify(None).unwrap(), SoftwareEnvironment::Production);
//!
//! let gate = DisputePublishingGate::new(config);
//! assert!(gate.is_publishable(500));
//! ```
//!
//! # Logging
//!
//! Decisions are reported through `tracing` at debug level. Statement
//! contents and claim values are never logged.

pub mod claims;
pub mod config;
pub mod dispute;
pub mod environment;
pub mod error;
pub mod factory;
pub mod text;

pub use claims::{ClaimDecoder, ClaimMap, JwsClaimDecoder, JwtPart, DEFAULT_MAX_STATEMENT_BYTES};
pub use config::{CommonConfig, ConfigProvider, DisputeResolutionConfig, SoftwareEnvIdentification};
pub use dispute::{
    is_publishable_dispute_data, DisputeField, DisputePublishingGate, ERROR_STATUS_THRESHOLD,
};
pub use environment::{
    equals_ignore_case, software_environment_from_statement, EnvironmentClassifier,
    SoftwareEnvironment,
};
pub use error::{CommonError, CommonResult};
pub use factory::InstanceRegistry;
pub use text::truncate;
