//! Software statement claim decoding.
//!
//! A software statement is a compact JWS:
//!
//! ```text
//! base64url(header) "." base64url(payload) "." base64url(signature)
//! ```
//!
//! [`JwsClaimDecoder`] only splits and decodes the header and payload into a
//! [`ClaimMap`]. It does not verify the signature; trust decisions belong to
//! the caller.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use serde_json::{Map, Value};

use crate::error::{CommonError, CommonResult};

/// Default maximum size of an encoded statement (64 KiB).
pub const DEFAULT_MAX_STATEMENT_BYTES: usize = 64 * 1024;

/// Part of a compact JWS to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtPart {
    Header,
    Body,
}

/// Decoded claims of one JWS part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimMap(Map<String, Value>);

impl ClaimMap {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Claim rendered as a string.
    ///
    /// Strings are returned as-is; numbers, booleans, arrays and objects in
    /// their JSON text form. `null` and absent claims yield `None`.
    pub fn get_as_string(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ClaimMap {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

impl FromIterator<(String, Value)> for ClaimMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decodes a software statement into claims.
pub trait ClaimDecoder: Send + Sync {
    /// Decode `part` of `blob`.
    ///
    /// Fails with [`CommonError::ClaimDecode`] when the blob is malformed.
    fn decode(&self, blob: &str, part: JwtPart) -> CommonResult<ClaimMap>;
}

/// Compact JWS decoder without signature verification.
#[derive(Debug, Clone)]
pub struct JwsClaimDecoder {
    max_statement_bytes: usize,
}

impl Default for JwsClaimDecoder {
    fn default() -> Self {
        Self {
            max_statement_bytes: DEFAULT_MAX_STATEMENT_BYTES,
        }
    }
}

impl JwsClaimDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum accepted statement size in bytes.
    pub fn with_max_statement_bytes(mut self, max: usize) -> Self {
        self.max_statement_bytes = max;
        self
    }
}

impl ClaimDecoder for JwsClaimDecoder {
    fn decode(&self, blob: &str, part: JwtPart) -> CommonResult<ClaimMap> {
        let blob = blob.trim();
        if blob.len() > self.max_statement_bytes {
            return Err(CommonError::claim_decode(format!(
                "statement exceeds {} bytes",
                self.max_statement_bytes
            )));
        }

        let segments: Vec<&str> = blob.split('.').collect();
        if segments.len() != 3 {
            return Err(CommonError::claim_decode(format!(
                "expected 3 compact JWS segments, found {}",
                segments.len()
            )));
        }

        // Header is validated for both parts.
        let header = decode_segment(segments[0], "header")?;
        if !header.get("alg").is_some_and(Value::is_string) {
            return Err(CommonError::claim_decode("header is missing \"alg\""));
        }

        match part {
            JwtPart::Header => Ok(ClaimMap(header)),
            JwtPart::Body => decode_segment(segments[1], "payload").map(ClaimMap),
        }
    }
}

fn decode_segment(segment: &str, label: &str) -> CommonResult<Map<String, Value>> {
    if segment.is_empty() {
        return Err(CommonError::claim_decode(format!("empty {} segment", label)));
    }

    let bytes = BASE64URL
        .decode(segment.trim_end_matches('='))
        .map_err(|e| CommonError::claim_decode(format!("invalid base64url {}: {}", label, e)))?;

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(map) => Ok(map),
        _ => Err(CommonError::claim_decode(format!(
            "{} is not a JSON object",
            label
        ))),
    }
}
