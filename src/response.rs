//! RFC 7662 introspection response model.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decoded body of a 200 introspection response.
///
/// Only `active` is authoritative; every other field is optional and
/// defaults to empty when the endpoint omits it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IntrospectionResult {
    /// Whether the token is currently active; `null` reads as false
    #[serde(default, deserialize_with = "null_as_false")]
    pub active: bool,
    /// Vendor-specific claims
    #[serde(default, rename = "ext")]
    pub extra: Option<HashMap<String, Value>>,
    /// Subject of the token
    #[serde(default, rename = "sub")]
    pub subject: Option<String>,
    /// Resource owner who authorized the token
    #[serde(default)]
    pub username: Option<String>,
    /// Intended audiences, in the order returned
    #[serde(default, rename = "aud", deserialize_with = "one_or_many")]
    pub audience: Vec<String>,
    /// Type of the token, e.g. `access_token`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Issuer of the token
    #[serde(default, rename = "iss")]
    pub issuer: Option<String>,
    /// Client the token was issued to
    #[serde(default)]
    pub client_id: Option<String>,
    /// Space-delimited granted scopes
    #[serde(default)]
    pub scope: Option<String>,
}

impl IntrospectionResult {
    /// Returns the granted scopes split on single spaces.
    ///
    /// An absent scope yields a single empty entry, matching a plain split
    /// of the empty string.
    pub fn granted_scopes(&self) -> Vec<&str> {
        self.scope.as_deref().unwrap_or("").split(' ').collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

// `aud` may be a single string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(aud)) => vec![aud],
        Some(OneOrMany::Many(auds)) => auds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_response() {
        let body = r#"{
            "active": true,
            "ext": {"tenant": "acme"},
            "sub": "user-1",
            "username": "alice",
            "aud": ["svc1", "svc2"],
            "token_type": "access_token",
            "iss": "https://issuer.example",
            "client_id": "web",
            "scope": "read write"
        }"#;

        let result: IntrospectionResult = serde_json::from_str(body).unwrap();

        assert!(result.active);
        assert_eq!(result.subject.as_deref(), Some("user-1"));
        assert_eq!(result.username.as_deref(), Some("alice"));
        assert_eq!(result.audience, vec!["svc1", "svc2"]);
        assert_eq!(result.issuer.as_deref(), Some("https://issuer.example"));
        assert_eq!(result.client_id.as_deref(), Some("web"));
        assert_eq!(result.extra.unwrap()["tenant"], "acme");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result: IntrospectionResult = serde_json::from_str(r#"{"active":false}"#).unwrap();

        assert!(!result.active);
        assert!(result.audience.is_empty());
        assert!(result.extra.is_none());
        assert!(result.subject.is_none());
    }

    #[test]
    fn audience_accepts_single_string() {
        let result: IntrospectionResult =
            serde_json::from_str(r#"{"active":true,"aud":"svc1"}"#).unwrap();
        assert_eq!(result.audience, vec!["svc1"]);
    }

    #[test]
    fn null_active_is_inactive() {
        let result: IntrospectionResult =
            serde_json::from_str(r#"{"active":null,"username":"alice"}"#).unwrap();
        assert!(!result.active);
        assert_eq!(result.username.as_deref(), Some("alice"));
    }

    #[test]
    fn audience_accepts_null() {
        let result: IntrospectionResult =
            serde_json::from_str(r#"{"active":true,"aud":null}"#).unwrap();
        assert!(result.audience.is_empty());
    }

    #[test]
    fn wrong_shape_fails_to_decode() {
        assert!(serde_json::from_str::<IntrospectionResult>(r#"{"active":"yes"}"#).is_err());
        assert!(serde_json::from_str::<IntrospectionResult>(r#"{"scope":5}"#).is_err());
        assert!(serde_json::from_str::<IntrospectionResult>("<html>").is_err());
    }

    #[test]
    fn granted_scopes_preserve_order() {
        let result = IntrospectionResult {
            scope: Some("write read".to_string()),
            ..Default::default()
        };
        assert_eq!(result.granted_scopes(), vec!["write", "read"]);
    }

    #[test]
    fn granted_scopes_of_absent_scope() {
        assert_eq!(IntrospectionResult::default().granted_scopes(), vec![""]);
    }
}
