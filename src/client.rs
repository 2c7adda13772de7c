//! RFC 7662 introspection exchange.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, IntrospectError};
use crate::response::IntrospectionResult;
use crate::token::BearerToken;

/// Outbound request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Blocking client for a token introspection endpoint.
///
/// Built once per gate and shared read-only by every request. Each call to
/// [`introspect`](Self::introspect) issues exactly one POST; nothing is
/// retried or cached.
///
/// The request body is `application/x-www-form-urlencoded` and carries
/// `token` plus, when a scope parameter was configured, `scope`.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    endpoint: Url,
    headers: HeaderMap,
    scope_param: Option<String>,
    http: Client,
}

impl IntrospectionClient {
    /// Creates a client for `endpoint`.
    ///
    /// `headers` are attached to every introspection request, except
    /// `Content-Type`, which is always the form encoding.
    /// `scope_param`, when present, is sent as the `scope` form field.
    ///
    /// Building the client must happen outside an async runtime; see
    /// [`introspect`](Self::introspect).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: Url,
        mut headers: HeaderMap,
        scope_param: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        headers.remove(CONTENT_TYPE);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::Client)?;

        Ok(Self {
            endpoint,
            headers,
            scope_param,
            http,
        })
    }

    /// Returns the endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the `scope` form value sent with each request, if any.
    pub fn scope_param(&self) -> Option<&str> {
        self.scope_param.as_deref()
    }

    /// Introspects a token.
    ///
    /// Only the first JSON value of the body is decoded; anything after it
    /// is ignored.
    ///
    /// This call blocks the current thread. From async code run it through
    /// `tokio::task::spawn_blocking` or an equivalent; calling it on an
    /// async executor thread panics.
    ///
    /// # Errors
    ///
    /// - [`IntrospectError::Transport`] if the request fails, times out, or
    ///   the body cannot be read
    /// - [`IntrospectError::EndpointDeclined`] for any status other than 200
    /// - [`IntrospectError::Decode`] if a 200 body is not a valid response
    pub fn introspect(&self, token: &BearerToken) -> Result<IntrospectionResult, IntrospectError> {
        let mut form = vec![("token", token.expose_secret())];
        if let Some(scope) = &self.scope_param {
            form.push(("scope", scope.as_str()));
        }

        let resp = self
            .http
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .form(&form)
            .send()
            .map_err(IntrospectError::Transport)?;

        let status = resp.status();
        tracing::debug!(endpoint = %self.endpoint, status = %status, "introspection response");

        if status != StatusCode::OK {
            return Err(IntrospectError::EndpointDeclined(status));
        }

        let body = resp.bytes().map_err(IntrospectError::Transport)?;
        let mut de = serde_json::Deserializer::from_slice(&body);
        IntrospectionResult::deserialize(&mut de).map_err(IntrospectError::Decode)
    }
}
