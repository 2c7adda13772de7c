//! Credential extraction from inbound requests.

use std::fmt;
use std::sync::Arc;

use crate::web::Exchange;

/// A bearer credential extracted from a request.
///
/// The token is forwarded to the introspection endpoint and nowhere else.
/// `Debug` and `Display` always print `[REDACTED]`; the raw value is only
/// reachable through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use introspect_gate::BearerToken;
///
/// let token = BearerToken::new("abc123".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "abc123");
/// ```
// Do not derive Clone or Debug: both would make leaking the token easy.
pub struct BearerToken {
    inner: String,
}

impl BearerToken {
    /// Wraps a raw token value.
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Returns the raw token for the introspection request body.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Strategy for locating the credential in a request.
///
/// A lookup is a pure function of the request returning the raw token, or
/// an empty string when no credential is present. The four built-in sources
/// cover the usual places a bearer token travels; [`TokenLookup::custom`]
/// accepts any other function.
///
/// # Examples
///
/// ```
/// use introspect_gate::TokenLookup;
/// use introspect_gate::web::RequestAdapter;
///
/// let lookup = TokenLookup::header("Authorization", "Bearer");
///
/// let mut adapter = RequestAdapter::new("req-1".to_string());
/// adapter.add_header("Authorization".to_string(), "Bearer abc123".to_string());
///
/// let token = lookup.lookup(&adapter).expect("token present");
/// assert_eq!(token.expose_secret(), "abc123");
/// ```
#[derive(Clone)]
pub struct TokenLookup {
    f: Arc<dyn Fn(&dyn Exchange) -> String + Send + Sync>,
}

impl TokenLookup {
    /// Reads the token from `header`, stripping `scheme` and one separator.
    ///
    /// Yields nothing unless the header value starts with `scheme` and is
    /// longer than the scheme plus the separator.
    pub fn header(header: impl Into<String>, scheme: impl Into<String>) -> Self {
        let header = header.into();
        let scheme = scheme.into();
        Self::custom(move |ex| {
            ex.header(&header)
                .map(|auth| strip_scheme(auth, &scheme))
                .unwrap_or_default()
                .to_string()
        })
    }

    /// Reads the token from the query-string parameter `name`.
    pub fn query(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::custom(move |ex| ex.query(&name).unwrap_or_default().to_string())
    }

    /// Reads the token from the routed path parameter `name`.
    pub fn param(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::custom(move |ex| ex.path_param(&name).unwrap_or_default().to_string())
    }

    /// Reads the token from the cookie `name`.
    pub fn cookie(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::custom(move |ex| ex.cookie(&name).unwrap_or_default().to_string())
    }

    /// Wraps an arbitrary lookup function. An empty return means "absent".
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&dyn Exchange) -> String + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Runs the lookup against a request.
    ///
    /// Returns `None` when the strategy yields an empty string.
    pub fn lookup(&self, ex: &dyn Exchange) -> Option<BearerToken> {
        let raw = (self.f)(ex);
        if raw.is_empty() {
            None
        } else {
            Some(BearerToken::new(raw))
        }
    }
}

impl fmt::Debug for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenLookup")
    }
}

fn strip_scheme<'a>(auth: &'a str, scheme: &str) -> &'a str {
    let l = scheme.len();
    if auth.len() > l + 1 && auth.starts_with(scheme) {
        auth.get(l + 1..).unwrap_or_default()
    } else {
        ""
    }
}
