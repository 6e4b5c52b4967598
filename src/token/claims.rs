//! Claim payloads and the wire-key → semantic-field mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim key the backend uses for the user id.
pub const NAME_IDENTIFIER_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
/// Claim key the backend uses for the display name.
pub const NAME_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
/// Claim key the backend uses for roles.
pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Which wire keys carry each semantic field.
///
/// Each list is tried in order; the first key present with a usable value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimKeys {
    #[serde(default = "default_subject_keys")]
    pub subject: Vec<String>,
    #[serde(default = "default_name_keys")]
    pub name: Vec<String>,
    #[serde(default = "default_role_keys")]
    pub roles: Vec<String>,
}

fn default_subject_keys() -> Vec<String> {
    vec![NAME_IDENTIFIER_CLAIM.to_string(), "sub".to_string()]
}

fn default_name_keys() -> Vec<String> {
    vec![NAME_CLAIM.to_string()]
}

fn default_role_keys() -> Vec<String> {
    vec![ROLE_CLAIM.to_string()]
}

impl Default for ClaimKeys {
    fn default() -> Self {
        Self {
            subject: default_subject_keys(),
            name: default_name_keys(),
            roles: default_role_keys(),
        }
    }
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First non-empty string found under any of `keys`.
    pub fn first_string(&self, keys: &[String]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.0.get(k))
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Expiry in seconds since the epoch. Fractional values are truncated.
    pub fn exp(&self) -> Option<i64> {
        let exp = self.0.get("exp")?;
        exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
    }

    /// Role list under the first present key in `keys`.
    ///
    /// A single string is normalised to a one-element list; anything else
    /// yields an empty list.
    pub fn roles(&self, keys: &[String]) -> Vec<String> {
        let Some(value) = keys.iter().find_map(|k| self.0.get(k)) else {
            return Vec::new();
        };
        match value {
            Value::String(role) => vec![role.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
