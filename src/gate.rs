use std::sync::Arc;

use crate::client::IntrospectionClient;
use crate::config::{GateConfig, IntrospectGateBuilder};
use crate::disposition::Disposition;
use crate::error::IntrospectError;
use crate::policy::ResponsePolicy;
use crate::session::Session;
use crate::web::Exchange;

/// Terminal action the gate took for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request filter matched; the gate did nothing but continue.
    Skipped,
    /// The token was accepted, the session stored, and control passed on.
    Proceeded,
    /// The request ended in a rejection handler.
    Rejected(Disposition),
}

/// The introspection gate.
///
/// `IntrospectGate` runs the validation pipeline for each inbound request:
///
/// ```text
/// token lookup ── empty ──────────────────────────▶ malformed
///      │
/// introspection ── transport / decode failure ───▶ error
///      │        ── non-200 status ───────────────▶ unauthorized
/// response policy ── rejected ───────────────────▶ unauthorized (or forbidden)
///      │
/// session stored ▶ success hook ▶ next handler
/// ```
///
/// A built gate is immutable and cheap to clone; clones share one
/// configuration and one outbound HTTP client.
///
/// The client is blocking. Async hosts must build the gate and call
/// [`handle`](Self::handle) or [`authorize`](Self::authorize) off the
/// executor, e.g. in `tokio::task::spawn_blocking`; doing either on an
/// executor thread panics.
///
/// # Examples
///
/// ```
/// use introspect_gate::{IntrospectGate, Outcome};
/// use introspect_gate::disposition::Disposition;
/// use introspect_gate::web::RequestAdapter;
///
/// let gate = IntrospectGate::builder("http://127.0.0.1:9/introspect")
///     .build()
///     .unwrap();
///
/// // No credential: rejected without contacting the endpoint.
/// let mut adapter = RequestAdapter::new("req-1".to_string());
/// assert_eq!(
///     gate.handle(&mut adapter),
///     Outcome::Rejected(Disposition::MalformedToken)
/// );
/// assert_eq!(adapter.status().map(|s| s.as_u16()), Some(400));
/// ```
#[derive(Debug, Clone)]
pub struct IntrospectGate {
    config: Arc<GateConfig>,
}

impl IntrospectGate {
    /// Starts building a gate for the given introspection endpoint.
    pub fn builder(endpoint: impl Into<String>) -> IntrospectGateBuilder {
        IntrospectGateBuilder::new(endpoint)
    }

    pub(crate) fn from_config(config: GateConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the key the session is stored under.
    pub fn context_key(&self) -> &str {
        &self.config.context_key
    }

    /// Returns the introspection client.
    pub fn client(&self) -> &IntrospectionClient {
        &self.config.client
    }

    /// Returns the local response policy.
    pub fn policy(&self) -> &ResponsePolicy {
        &self.config.policy
    }

    /// Runs the gate for one request.
    ///
    /// Exactly one of the following happens:
    /// - the filter matches and the request continues untouched
    /// - the session is stored, the success hook runs, and the request continues
    /// - one rejection handler runs
    ///
    /// Blocks the calling thread for up to the configured timeout.
    pub fn handle(&self, ex: &mut dyn Exchange) -> Outcome {
        let cfg = &*self.config;

        let span = tracing::debug_span!(
            "introspect",
            request_id = ex.request_id().unwrap_or("-"),
            context_key = %cfg.context_key
        );
        let _guard = span.enter();

        if let Some(filter) = &cfg.filter {
            if filter(&*ex) {
                tracing::trace!("request filtered, skipping introspection");
                ex.next();
                return Outcome::Skipped;
            }
        }

        match self.authorize(&*ex) {
            Ok(session) => {
                tracing::debug!(subject = %session.subject, "token accepted");
                ex.set_session(&cfg.context_key, session);
                cfg.dispositions.succeed(ex);
                ex.next();
                Outcome::Proceeded
            }
            Err(err) => {
                let disposition = err.disposition(cfg.forbid_insufficient_scope);
                match disposition {
                    Disposition::Error => {
                        tracing::warn!(error = %err, %disposition, "introspection failed")
                    }
                    Disposition::MalformedToken => {
                        tracing::debug!(%disposition, "no credential in request")
                    }
                    Disposition::Unauthorized | Disposition::Forbidden => {
                        tracing::info!(error = %err, %disposition, "token rejected")
                    }
                }
                cfg.dispositions.dispatch(disposition, ex, &err);
                Outcome::Rejected(disposition)
            }
        }
    }

    /// Validates the request's credential and builds its session.
    ///
    /// This is the pipeline without any response handling, for hosts that
    /// want to act on the error themselves.
    ///
    /// # Errors
    ///
    /// Returns the first failure: missing token, transport or decode
    /// failure, endpoint decline, or policy rejection.
    pub fn authorize(&self, ex: &dyn Exchange) -> Result<Session, IntrospectError> {
        let cfg = &*self.config;

        let token = cfg
            .token_lookup
            .lookup(ex)
            .ok_or(IntrospectError::MalformedToken)?;

        let result = cfg.client.introspect(&token)?;
        cfg.policy.evaluate(&result)?;

        Ok(Session::from_result(result))
    }
}
