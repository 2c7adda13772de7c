//! Terminal actions for requests that do not pass the gate.

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;

use crate::error::IntrospectError;
use crate::web::Exchange;

/// Body written by the default malformed-token handler.
pub const MALFORMED_TOKEN_MESSAGE: &str = "Missing or malformed token";

/// The class of failure a request ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No credential was found; introspection was never attempted.
    MalformedToken,
    /// The endpoint declined the token or local policy rejected it.
    Unauthorized,
    /// The token is valid but lacks a required scope.
    Forbidden,
    /// Transport or decode failure talking to the endpoint.
    Error,
}

impl Disposition {
    /// Status written by the default handler for this disposition.
    pub fn default_status(self) -> StatusCode {
        match self {
            Disposition::MalformedToken => StatusCode::BAD_REQUEST,
            Disposition::Unauthorized => StatusCode::UNAUTHORIZED,
            Disposition::Forbidden => StatusCode::FORBIDDEN,
            Disposition::Error => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::MalformedToken => write!(f, "malformed_token"),
            Disposition::Unauthorized => write!(f, "unauthorized"),
            Disposition::Forbidden => write!(f, "forbidden"),
            Disposition::Error => write!(f, "error"),
        }
    }
}

/// Handler invoked for a failed request together with the failure.
pub type RejectHandler = Arc<dyn Fn(&mut dyn Exchange, &IntrospectError) + Send + Sync>;

/// Handler invoked after a session has been stored, before the continuation.
pub type SuccessHandler = Arc<dyn Fn(&mut dyn Exchange) + Send + Sync>;

/// The set of disposition handlers a gate dispatches to.
///
/// Each handler is independently replaceable. The defaults write bare
/// status responses; only the malformed-token handler writes a body, and
/// that body is the fixed [`MALFORMED_TOKEN_MESSAGE`].
#[derive(Clone)]
pub struct Dispositions {
    pub(crate) on_malformed: RejectHandler,
    pub(crate) on_unauthorized: RejectHandler,
    pub(crate) on_forbidden: RejectHandler,
    pub(crate) on_error: RejectHandler,
    pub(crate) on_success: Option<SuccessHandler>,
}

impl Default for Dispositions {
    fn default() -> Self {
        Self {
            on_malformed: Arc::new(|ex: &mut dyn Exchange, _: &IntrospectError| {
                ex.send_text(
                    Disposition::MalformedToken.default_status(),
                    MALFORMED_TOKEN_MESSAGE,
                )
            }),
            on_unauthorized: status_only(Disposition::Unauthorized),
            on_forbidden: status_only(Disposition::Forbidden),
            on_error: status_only(Disposition::Error),
            on_success: None,
        }
    }
}

impl Dispositions {
    /// Invokes the handler registered for `disposition`.
    pub fn dispatch(
        &self,
        disposition: Disposition,
        ex: &mut dyn Exchange,
        err: &IntrospectError,
    ) {
        let handler = match disposition {
            Disposition::MalformedToken => &self.on_malformed,
            Disposition::Unauthorized => &self.on_unauthorized,
            Disposition::Forbidden => &self.on_forbidden,
            Disposition::Error => &self.on_error,
        };
        handler(ex, err);
    }

    /// Invokes the success handler, if one is registered.
    pub fn succeed(&self, ex: &mut dyn Exchange) {
        if let Some(handler) = &self.on_success {
            handler(ex);
        }
    }
}

impl fmt::Debug for Dispositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispositions")
            .field("on_success", &self.on_success.is_some())
            .finish_non_exhaustive()
    }
}

fn status_only(disposition: Disposition) -> RejectHandler {
    Arc::new(move |ex: &mut dyn Exchange, _: &IntrospectError| {
        ex.send_status(disposition.default_status())
    })
}
