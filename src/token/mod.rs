//! Bearer token codec.
//!
//! Reads claims out of a JWT-shaped token without verifying its signature.
//! The decoded values are only used to drive the client UI; the backend stays
//! the sole authority on whether a token is valid.
//!
//! ```
//! use taskdeck::token::TokenCodec;
//!
//! let codec = TokenCodec::default();
//! assert!(codec.decode("not-a-token").is_err());
//! assert!(codec.is_expired("not-a-token"));
//! ```

pub mod claims;

pub use claims::{ClaimKeys, Claims};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

use crate::errors::DecodeError;

const SEGMENT_DELIMITER: char = '.';

/// Decodes token claims and maps them onto session fields.
#[derive(Debug, Clone, Default)]
pub struct TokenCodec {
    keys: ClaimKeys,
}

impl TokenCodec {
    pub fn new(keys: ClaimKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &ClaimKeys {
        &self.keys
    }

    /// Decode the payload segment into a claims map.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let segments: Vec<&str> = token.split(SEGMENT_DELIMITER).collect();
        if segments.len() != 3 {
            return Err(DecodeError::SegmentCount {
                found: segments.len(),
            });
        }

        // Some issuers keep base64 padding on the payload; the URL-safe engine rejects it.
        let payload = segments[1].trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(Claims::new(map)),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Whether the token is expired at the current time.
    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now())
    }

    /// Whether the token is expired at `now`.
    ///
    /// Undecodable tokens and tokens without an `exp` claim count as expired.
    pub fn is_expired_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.expires_at(token) {
            Some(expiry) => now >= expiry,
            None => true,
        }
    }

    /// Expiry instant carried by the token, if decodable.
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        let exp = self.decode(token).ok()?.exp()?;
        DateTime::from_timestamp(exp, 0)
    }

    /// Time left until expiry; zero when expired or undecodable.
    pub fn time_to_expire(&self, token: &str) -> Duration {
        self.time_to_expire_at(token, Utc::now())
    }

    pub fn time_to_expire_at(&self, token: &str, now: DateTime<Utc>) -> Duration {
        self.expires_at(token)
            .and_then(|expiry| (expiry - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }

    pub fn extract_subject_id(&self, token: &str) -> Option<String> {
        self.decode(token).ok()?.first_string(&self.keys.subject)
    }

    pub fn extract_display_name(&self, token: &str) -> Option<String> {
        self.decode(token).ok()?.first_string(&self.keys.name)
    }

    pub fn extract_roles(&self, token: &str) -> Vec<String> {
        self.decode(token)
            .map(|claims| claims.roles(&self.keys.roles))
            .unwrap_or_default()
    }
}
