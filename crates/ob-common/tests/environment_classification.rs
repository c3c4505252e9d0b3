//! End-to-end classification with the bundled JWS decoder and YAML config.

use std::sync::{Arc, RwLock};
use std::thread;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use ob_common::{
    CommonConfig, CommonError, ConfigProvider, EnvironmentClassifier, JwsClaimDecoder,
    SoftwareEnvironment,
};
use serde_json::{json, Value};

fn ssa(body: Value) -> String {
    let header = BASE64URL.encode(br#"{"alg":"PS256","typ":"JWT","kid":"ssa-signing"}"#);
    let payload = BASE64URL.encode(serde_json::to_vec(&body).unwrap());
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}

fn classifier(config: CommonConfig) -> EnvironmentClassifier {
    EnvironmentClassifier::new(Arc::new(JwsClaimDecoder::default()), Arc::new(config))
}

#[test]
fn test_sandbox_statement() {
    let classifier = classifier(CommonConfig::default());
    let statement = ssa(json!({
        "software_id": "9ZzFFBxSLGEjPZogRAbvFd",
        "software_environment": "SandBox",
        "org_id": "0015800001HQQrZAAX"
    }));

    assert_eq!(
        classifier.classify(Some(&statement)).unwrap(),
        SoftwareEnvironment::Sandbox
    );
}

#[test]
fn test_production_statement() {
    let classifier = classifier(CommonConfig::default());
    let statement = ssa(json!({"software_environment": "production"}));

    assert_eq!(
        classifier.classify(Some(&statement)).unwrap(),
        SoftwareEnvironment::Production
    );
}

#[test]
fn test_statement_without_environment_claim() {
    let classifier = classifier(CommonConfig::default());
    let statement = ssa(json!({"software_id": "abc"}));

    assert_eq!(
        classifier.classify(Some(&statement)).unwrap(),
        SoftwareEnvironment::Production
    );
}

#[test]
fn test_no_statement() {
    let classifier = classifier(CommonConfig::default());
    assert_eq!(classifier.classify(None).unwrap(), SoftwareEnvironment::Production);
    assert_eq!(classifier.classify(Some("")).unwrap(), SoftwareEnvironment::Production);
}

#[test]
fn test_malformed_statement_is_error() {
    let classifier = classifier(CommonConfig::default());
    let err = classifier.classify(Some("definitely-not-a-jws")).unwrap_err();
    assert!(matches!(err, CommonError::ClaimDecode { .. }));
    assert_eq!(err.kind(), "claim_decode");
}

#[test]
fn test_custom_claim_from_yaml() {
    let config = CommonConfig::parse(
        r#"
software_environment_identification:
  ssa_property_name: org_environment
  ssa_property_value_for_sandbox: TEST
"#,
    )
    .unwrap();
    let classifier = classifier(config);

    let sandbox = ssa(json!({"org_environment": "test", "software_environment": "production"}));
    let production = ssa(json!({"software_environment": "sandbox"}));

    assert_eq!(
        classifier.classify(Some(&sandbox)).unwrap(),
        SoftwareEnvironment::Sandbox
    );
    assert_eq!(
        classifier.classify(Some(&production)).unwrap(),
        SoftwareEnvironment::Production
    );
}

/// Provider whose matching rule can change between calls.
struct ReloadableConfig {
    inner: RwLock<CommonConfig>,
}

impl ConfigProvider for ReloadableConfig {
    fn sandbox_claim_name(&self) -> String {
        self.inner.read().unwrap().sandbox_claim_name()
    }

    fn sandbox_claim_expected_value(&self) -> String {
        self.inner.read().unwrap().sandbox_claim_expected_value()
    }

    fn is_non_error_dispute_publishing_enabled(&self) -> bool {
        self.inner.read().unwrap().is_non_error_dispute_publishing_enabled()
    }
}

#[test]
fn test_matching_rule_is_read_per_call() {
    let config = Arc::new(ReloadableConfig {
        inner: RwLock::new(CommonConfig::default()),
    });
    let classifier = EnvironmentClassifier::with_config(config.clone());
    let statement = ssa(json!({"software_environment": "test"}));

    assert_eq!(
        classifier.classify(Some(&statement)).unwrap(),
        SoftwareEnvironment::Production
    );

    *config.inner.write().unwrap() =
        CommonConfig::default().with_sandbox_claim("software_environment", "Test");

    assert_eq!(
        classifier.classify(Some(&statement)).unwrap(),
        SoftwareEnvironment::Sandbox
    );
}

#[test]
fn test_concurrent_classification() {
    let classifier = classifier(CommonConfig::default());
    let sandbox = ssa(json!({"software_environment": "sandbox"}));
    let production = ssa(json!({"software_environment": "production"}));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let classifier = classifier.clone();
            let statement = if i % 2 == 0 {
                sandbox.clone()
            } else {
                production.clone()
            };
            thread::spawn(move || {
                (0..50)
                    .map(|_| classifier.classify(Some(&statement)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 {
            SoftwareEnvironment::Sandbox
        } else {
            SoftwareEnvironment::Production
        };
        assert!(handle.join().unwrap().iter().all(|env| *env == expected));
    }
}
