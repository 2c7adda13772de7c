//! Host-dispatcher boundary trait.
//!
//! This module defines what the gate needs from the framework that
//! dispatches requests to it.

use reqwest::StatusCode;

use crate::session::Session;

/// A single in-flight request as seen by the introspection gate.
///
/// Framework integrations implement this trait over their own request and
/// response types. It provides:
/// - Read access to headers, query parameters, path parameters and cookies
/// - A per-request store for the resulting [`Session`]
/// - A response writer for rejections
/// - The continuation to the next handler
///
/// The gate calls exactly one of [`next`](Self::next),
/// [`send_status`](Self::send_status) or [`send_text`](Self::send_text)
/// per request when the default disposition handlers are used.
///
/// The gate drives an `Exchange` synchronously. Async hosts move theirs
/// into a blocking task (e.g. `tokio::task::spawn_blocking`) for the
/// duration of [`IntrospectGate::handle`](crate::IntrospectGate::handle).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use introspect_gate::web::Exchange;
/// use introspect_gate::Session;
/// use reqwest::StatusCode;
///
/// #[derive(Default)]
/// struct MyFrameworkRequest {
///     headers: HashMap<String, String>,
///     locals: HashMap<String, Session>,
///     status: Option<StatusCode>,
///     forwarded: bool,
/// }
///
/// impl Exchange for MyFrameworkRequest {
///     fn header(&self, name: &str) -> Option<&str> {
///         self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
///     }
///     fn query(&self, _name: &str) -> Option<&str> { None }
///     fn path_param(&self, _name: &str) -> Option<&str> { None }
///     fn cookie(&self, _name: &str) -> Option<&str> { None }
///     fn set_session(&mut self, key: &str, session: Session) {
///         self.locals.insert(key.to_string(), session);
///     }
///     fn send_status(&mut self, status: StatusCode) {
///         self.status = Some(status);
///     }
///     fn send_text(&mut self, status: StatusCode, _body: &str) {
///         self.status = Some(status);
///     }
///     fn next(&mut self) {
///         self.forwarded = true;
///     }
/// }
/// ```
pub trait Exchange {
    /// Returns the value of a request header. Lookup is case-insensitive.
    fn header(&self, name: &str) -> Option<&str>;

    /// Returns the value of a query-string parameter.
    fn query(&self, name: &str) -> Option<&str>;

    /// Returns the value of a routed path parameter.
    fn path_param(&self, name: &str) -> Option<&str>;

    /// Returns the value of a request cookie.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Stores the session for downstream handlers under `key`.
    fn set_session(&mut self, key: &str, session: Session);

    /// Writes a bodiless response with the given status.
    fn send_status(&mut self, status: StatusCode);

    /// Writes a plain-text response with the given status.
    fn send_text(&mut self, status: StatusCode, body: &str);

    /// Passes control to the next handler in the chain.
    fn next(&mut self);

    /// Returns an identifier used to correlate log events, if the host has one.
    fn request_id(&self) -> Option<&str> {
        None
    }
}
