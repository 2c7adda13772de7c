//! Owned request/response adapter for hosts without a native binding.

use std::collections::HashMap;

use reqwest::StatusCode;

use crate::session::Session;

use super::Exchange;

/// Framework-agnostic [`Exchange`] over owned request data.
///
/// `RequestAdapter` holds the inbound request parts as plain maps and
/// records whatever the gate writes back: the response status and body,
/// stored sessions, and whether control was passed on. Framework-specific
/// code can populate one from its own request type, run the gate, and then
/// translate the recorded outcome into a native response.
///
/// Header names are matched case-insensitively.
///
/// # Examples
///
/// ```
/// use introspect_gate::web::{Exchange, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-12345".to_string());
/// adapter.add_header("Authorization".to_string(), "Bearer abc123".to_string());
/// adapter.add_query_param("page".to_string(), "2".to_string());
///
/// assert_eq!(adapter.header("authorization"), Some("Bearer abc123"));
/// assert_eq!(adapter.query("page"), Some("2"));
/// assert!(adapter.status().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestAdapter {
    request_id: String,
    headers: HashMap<String, String>,
    query_params: HashMap<String, String>,
    path_params: HashMap<String, String>,
    cookies: HashMap<String, String>,
    sessions: HashMap<String, Session>,
    status: Option<StatusCode>,
    body: Option<String>,
    forwarded: bool,
}

impl RequestAdapter {
    /// Creates a new request adapter with the given request ID.
    ///
    /// All request parts start empty. Use the `add_*` methods to populate them.
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            ..Default::default()
        }
    }

    /// Adds a request header.
    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.insert(key.to_ascii_lowercase(), value);
    }

    /// Adds a query parameter.
    pub fn add_query_param(&mut self, key: String, value: String) {
        self.query_params.insert(key, value);
    }

    /// Adds a path parameter.
    pub fn add_path_param(&mut self, key: String, value: String) {
        self.path_params.insert(key, value);
    }

    /// Adds a cookie.
    pub fn add_cookie(&mut self, key: String, value: String) {
        self.cookies.insert(key, value);
    }

    /// Returns the session stored under `key`, if any.
    pub fn session(&self, key: &str) -> Option<&Session> {
        self.sessions.get(key)
    }

    /// Returns the response status written so far.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the response body written so far.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns `true` if control was passed to the next handler.
    pub fn forwarded(&self) -> bool {
        self.forwarded
    }
}

impl Exchange for RequestAdapter {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn set_session(&mut self, key: &str, session: Session) {
        self.sessions.insert(key.to_string(), session);
    }

    fn send_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.body = None;
    }

    fn send_text(&mut self, status: StatusCode, body: &str) {
        self.status = Some(status);
        self.body = Some(body.to_string());
    }

    fn next(&mut self) {
        self.forwarded = true;
    }

    fn request_id(&self) -> Option<&str> {
        Some(&self.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_adapter_new() {
        let adapter = RequestAdapter::new("req-test".to_string());
        assert_eq!(adapter.request_id(), Some("req-test"));
        assert!(!adapter.forwarded());
        assert!(adapter.status().is_none());
    }

    #[test]
    fn headers_are_case_insensitive() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_header("X-Custom".to_string(), "value".to_string());

        assert_eq!(adapter.header("x-custom"), Some("value"));
        assert_eq!(adapter.header("X-CUSTOM"), Some("value"));
    }

    #[test]
    fn request_parts_are_separate() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.add_query_param("token".to_string(), "q".to_string());
        adapter.add_path_param("token".to_string(), "p".to_string());
        adapter.add_cookie("token".to_string(), "c".to_string());

        assert_eq!(adapter.query("token"), Some("q"));
        assert_eq!(adapter.path_param("token"), Some("p"));
        assert_eq!(adapter.cookie("token"), Some("c"));
        assert_eq!(adapter.header("token"), None);
    }

    #[test]
    fn records_text_response() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.send_text(StatusCode::BAD_REQUEST, "Missing or malformed token");

        assert_eq!(adapter.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(adapter.body(), Some("Missing or malformed token"));
    }

    #[test]
    fn send_status_clears_body() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        adapter.send_text(StatusCode::BAD_REQUEST, "oops");
        adapter.send_status(StatusCode::UNAUTHORIZED);

        assert_eq!(adapter.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(adapter.body().is_none());
    }

    #[test]
    fn stores_sessions_by_key() {
        let mut adapter = RequestAdapter::new("req-1".to_string());
        let session = Session {
            subject: "user-1".to_string(),
            ..Default::default()
        };
        adapter.set_session("user", session.clone());

        assert_eq!(adapter.session("user"), Some(&session));
        assert!(adapter.session("other").is_none());
    }
}
