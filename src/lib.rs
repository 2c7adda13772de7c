//! OAuth2 token introspection gate (RFC 7662).
//!
//! This crate verifies bearer credentials on inbound requests by asking a
//! remote introspection endpoint about them, then enforces local policy
//! before letting the request continue:
//! - **Token lookup**: pluggable extraction from a header, query parameter,
//!   path parameter or cookie
//! - **Introspection**: one form-encoded POST per request, bounded by a timeout
//! - **Response policy**: active flag, token type, audience, issuer and scopes
//! - **Session**: a minimal record stored in the request context on success
//! - **Dispositions**: replaceable handlers for malformed, unauthorized,
//!   forbidden and error outcomes
//!
//! The gate is framework-agnostic. Hosts implement [`web::Exchange`] over
//! their request type, or populate a [`web::RequestAdapter`].
//!
//! # Core Types
//!
//! - [`IntrospectGate`]: The per-request pipeline, built once and shared
//! - [`IntrospectionClient`]: The outbound RFC 7662 exchange
//! - [`ResponsePolicy`]: Pure evaluation of an [`IntrospectionResult`]
//! - [`Session`]: What downstream handlers see
//! - [`BearerToken`]: Redacting wrapper for the extracted credential
//!
//! # Examples
//!
//! ```
//! use introspect_gate::{IntrospectGate, Outcome, ScopeStrategy};
//! use introspect_gate::web::RequestAdapter;
//!
//! let gate = IntrospectGate::builder("https://auth.example.com/oauth2/introspect")
//!     .audience(["orders-api"])
//!     .scopes(["orders.read"])
//!     .scope_strategy(ScopeStrategy::hierarchic())
//!     .build()
//!     .expect("valid configuration");
//!
//! // In a request handler:
//! let mut adapter = RequestAdapter::new("req-123".to_string());
//! if gate.handle(&mut adapter) == Outcome::Proceeded {
//!     let session = adapter.session(gate.context_key()).unwrap();
//!     tracing::info!(subject = %session.subject, "authorized");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
pub mod disposition;
mod error;
mod gate;
mod policy;
mod response;
mod session;
mod token;
pub mod web;

pub use client::{IntrospectionClient, DEFAULT_TIMEOUT};
pub use config::{
    IntrospectGateBuilder, IntrospectSettings, RequestFilter, TokenSource, DEFAULT_AUTH_SCHEME,
    DEFAULT_CONTEXT_KEY,
};
pub use disposition::Disposition;
pub use error::{ConfigError, IntrospectError, Rejection, RejectionKind};
pub use gate::{IntrospectGate, Outcome};
pub use policy::{ResponsePolicy, ScopeStrategy, DEFAULT_TOKEN_TYPE};
pub use response::IntrospectionResult;
pub use session::{Session, CLIENT_ID_KEY, SCOPE_KEY, USERNAME_KEY};
pub use token::{BearerToken, TokenLookup};
