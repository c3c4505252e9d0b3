//! Dispute resolution data publishing policy.

use std::fmt;
use std::sync::Arc;

use crate::config::ConfigProvider;
use crate::text::truncate;

/// Lowest status code treated as an error.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// Dispute payload field subject to a length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeField {
    RequestBody,
    ResponseBody,
    Headers,
}

/// Decides whether dispute data may be published.
#[derive(Clone)]
pub struct DisputePublishingGate {
    config: Arc<dyn ConfigProvider>,
}

impl DisputePublishingGate {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self { config }
    }

    /// Error statuses (>= 400) are always publishable. Other statuses are
    /// publishable only when non-error publishing is enabled.
    pub fn is_publishable(&self, status_code: u16) -> bool {
        is_publishable_dispute_data(status_code, self.config.as_ref())
    }

    /// Whether dispute resolution data capture is enabled at all.
    pub fn is_enabled(&self) -> bool {
        self.config.dispute_resolution().enabled
    }

    /// Cut a dispute payload field down to its configured limit.
    pub fn render<'a>(&self, field: DisputeField, value: &'a str) -> &'a str {
        let limits = self.config.dispute_resolution();
        let max = match field {
            DisputeField::RequestBody => limits.max_request_body_length,
            DisputeField::ResponseBody => limits.max_response_body_length,
            DisputeField::Headers => limits.max_header_length,
        };
        truncate(value, max)
    }
}

impl fmt::Debug for DisputePublishingGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisputePublishingGate").finish_non_exhaustive()
    }
}

/// Publishability of dispute data for `status_code` under `config`.
pub fn is_publishable_dispute_data(status_code: u16, config: &dyn ConfigProvider) -> bool {
    status_code >= ERROR_STATUS_THRESHOLD || config.is_non_error_dispute_publishing_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommonConfig, DisputeResolutionConfig};
    use proptest::prelude::*;

    fn gate(publish_non_error: bool) -> DisputePublishingGate {
        DisputePublishingGate::new(Arc::new(
            CommonConfig::default().with_publish_non_error_dispute_data(publish_non_error),
        ))
    }

    #[test]
    fn test_success_status_follows_flag() {
        assert!(!gate(false).is_publishable(200));
        assert!(gate(true).is_publishable(200));
    }

    #[test]
    fn test_threshold_boundary() {
        let gate = gate(false);
        assert!(!gate.is_publishable(399));
        assert!(gate.is_publishable(400));
        assert!(gate.is_publishable(500));
    }

    #[test]
    fn test_is_enabled() {
        let config = CommonConfig::default().with_dispute_resolution(DisputeResolutionConfig {
            enabled: true,
            ..DisputeResolutionConfig::default()
        });
        assert!(DisputePublishingGate::new(Arc::new(config)).is_enabled());
        assert!(!gate(true).is_enabled());
    }

    #[test]
    fn test_render_applies_field_limits() {
        let config = CommonConfig::default().with_dispute_resolution(DisputeResolutionConfig {
            max_request_body_length: 3,
            max_response_body_length: 5,
            max_header_length: 1,
            ..DisputeResolutionConfig::default()
        });
        let gate = DisputePublishingGate::new(Arc::new(config));
        assert_eq!(gate.render(DisputeField::RequestBody, "abcdefgh"), "abc");
        assert_eq!(gate.render(DisputeField::ResponseBody, "abcdefgh"), "abcde");
        assert_eq!(gate.render(DisputeField::Headers, "abcdefgh"), "a");
        assert_eq!(gate.render(DisputeField::Headers, ""), "");
    }

    proptest! {
        #[test]
        fn prop_error_status_always_publishable(status in 400u16..=u16::MAX, flag: bool) {
            prop_assert!(gate(flag).is_publishable(status));
        }

        #[test]
        fn prop_non_error_status_follows_flag(status in 0u16..400, flag: bool) {
            prop_assert_eq!(gate(flag).is_publishable(status), flag);
        }
    }
}
