//! Host-dispatcher integration surface.
//!
//! This module is the boundary between request-dispatch frameworks and the
//! introspection gate. It contains no framework-specific code:
//! - [`Exchange`] is the contract a host implements over its own request
//!   and response types
//! - [`RequestAdapter`] is an owned implementation for hosts without a
//!   native binding, and for tests
//!
//! # Integration Model
//!
//! The gate is synchronous: each request blocks on one outbound HTTP call.
//! Framework-specific middleware should:
//! 1. Wrap the framework request in an `Exchange` implementation
//! 2. Call [`IntrospectGate::handle`](crate::IntrospectGate::handle), off the
//!    async executor when the host is async
//! 3. If the gate called `next()`, run the inner handler, which reads the
//!    [`Session`](crate::Session) from the context key
//! 4. Otherwise return the response the gate wrote
//!
//! # Example Flow
//!
//! ```ignore
//! // In an async integration (e.g., axum, actix). Calling `handle` directly
//! // on an executor thread panics inside the blocking HTTP client.
//! let gate = gate.clone();
//! let (outcome, exchange) = tokio::task::spawn_blocking(move || {
//!     let mut exchange = FrameworkExchange::new(req);
//!     (gate.handle(&mut exchange), exchange)
//! })
//! .await?;
//! match outcome {
//!     Outcome::Proceeded | Outcome::Skipped => inner.call(exchange.into_request()).await,
//!     Outcome::Rejected(_) => exchange.into_response(),
//! }
//! ```

mod adapter;
mod extract;

pub use adapter::RequestAdapter;
pub use extract::Exchange;
