use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::response::IntrospectionResult;

/// Key under which the username is stored in [`Session::extra`].
pub const USERNAME_KEY: &str = "username";
/// Key under which the client identifier is stored in [`Session::extra`].
pub const CLIENT_ID_KEY: &str = "client_id";
/// Key under which the granted scope string is stored in [`Session::extra`].
pub const SCOPE_KEY: &str = "scope";

/// Token data handed to downstream handlers after a successful introspection.
///
/// A `Session` exists only for requests whose introspection result passed
/// every policy check. It is stored in the per-request context under the
/// configured context key and is not retained afterwards.
///
/// # Examples
///
/// ```
/// use introspect_gate::{IntrospectionResult, Session};
///
/// let result = IntrospectionResult {
///     active: true,
///     subject: Some("user-1".to_string()),
///     username: Some("alice".to_string()),
///     scope: Some("read write".to_string()),
///     ..Default::default()
/// };
///
/// let session = Session::from_result(result);
/// assert_eq!(session.subject, "user-1");
/// assert_eq!(session.username(), Some("alice"));
/// assert_eq!(session.client_id(), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    /// Subject of the token, empty when the endpoint omitted it
    pub subject: String,
    /// Vendor claims plus `username`, `client_id` and `scope`
    pub extra: HashMap<String, Value>,
}

impl Session {
    /// Builds a session from an accepted introspection result.
    ///
    /// Starts from the result's `ext` map (or an empty map) and overwrites
    /// the `username`, `client_id` and `scope` keys with the top-level
    /// fields. Absent fields become empty strings so the three keys are
    /// always present.
    pub fn from_result(result: IntrospectionResult) -> Self {
        let mut extra = result.extra.unwrap_or_default();

        extra.insert(
            USERNAME_KEY.to_string(),
            Value::String(result.username.unwrap_or_default()),
        );
        extra.insert(
            CLIENT_ID_KEY.to_string(),
            Value::String(result.client_id.unwrap_or_default()),
        );
        extra.insert(
            SCOPE_KEY.to_string(),
            Value::String(result.scope.unwrap_or_default()),
        );

        Self {
            subject: result.subject.unwrap_or_default(),
            extra,
        }
    }

    /// Returns the username claim.
    pub fn username(&self) -> Option<&str> {
        self.extra_str(USERNAME_KEY)
    }

    /// Returns the client identifier claim.
    pub fn client_id(&self) -> Option<&str> {
        self.extra_str(CLIENT_ID_KEY)
    }

    /// Returns the granted scope string as returned by the endpoint.
    pub fn scope(&self) -> Option<&str> {
        self.extra_str(SCOPE_KEY)
    }

    /// Returns the granted scopes, skipping empty entries.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope()
            .unwrap_or("")
            .split(' ')
            .filter(|s| !s.is_empty())
    }

    fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seeds_keys_when_extra_is_absent() {
        let session = Session::from_result(IntrospectionResult {
            active: true,
            ..Default::default()
        });

        assert_eq!(session.subject, "");
        assert_eq!(session.extra.len(), 3);
        assert_eq!(session.extra[USERNAME_KEY], json!(""));
        assert_eq!(session.extra[CLIENT_ID_KEY], json!(""));
        assert_eq!(session.extra[SCOPE_KEY], json!(""));
    }

    #[test]
    fn top_level_fields_overwrite_ext_claims() {
        let mut ext = HashMap::new();
        ext.insert("username".to_string(), json!("spoofed"));
        ext.insert("tenant".to_string(), json!("acme"));

        let session = Session::from_result(IntrospectionResult {
            active: true,
            extra: Some(ext),
            username: Some("alice".to_string()),
            client_id: Some("web".to_string()),
            scope: Some("read write".to_string()),
            ..Default::default()
        });

        assert_eq!(session.username(), Some("alice"));
        assert_eq!(session.client_id(), Some("web"));
        assert_eq!(session.scope(), Some("read write"));
        assert_eq!(session.extra["tenant"], json!("acme"));
    }

    #[test]
    fn scopes_skip_empty_entries() {
        let session = Session::from_result(IntrospectionResult {
            scope: Some("read  write".to_string()),
            ..Default::default()
        });
        assert_eq!(session.scopes().collect::<Vec<_>>(), vec!["read", "write"]);
    }

    #[test]
    fn serializes_for_downstream_consumers() {
        let session = Session::from_result(IntrospectionResult {
            subject: Some("user-1".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["subject"], "user-1");
        assert_eq!(value["extra"]["scope"], "");
    }
}
