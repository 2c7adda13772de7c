use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::disposition::Disposition;

/// Errors that terminate the introspection pipeline for a single request.
///
/// Every variant maps onto exactly one [`Disposition`] through
/// [`IntrospectError::disposition`].
#[derive(Debug, Error)]
pub enum IntrospectError {
    /// No credential could be extracted from the request.
    #[error("Missing or malformed token")]
    MalformedToken,

    /// The introspection endpoint could not be reached, timed out, or the
    /// response body could not be read.
    #[error("introspection transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered 200 but the body is not a valid introspection
    /// response.
    #[error("introspection response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// The endpoint answered with a status other than 200.
    ///
    /// This is policy information, not a system fault, and is classified
    /// as unauthorized.
    #[error("introspection endpoint declined with status {0}")]
    EndpointDeclined(StatusCode),

    /// The decoded result failed local policy.
    #[error("token rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl IntrospectError {
    /// Classifies this error into the disposition that handles it.
    ///
    /// Scope rejections classify as [`Disposition::Forbidden`] only when
    /// `forbid_insufficient_scope` is set.
    pub fn disposition(&self, forbid_insufficient_scope: bool) -> Disposition {
        match self {
            IntrospectError::MalformedToken => Disposition::MalformedToken,
            IntrospectError::Transport(_) | IntrospectError::Decode(_) => Disposition::Error,
            IntrospectError::EndpointDeclined(_) => Disposition::Unauthorized,
            IntrospectError::Rejected(r) => {
                if forbid_insufficient_scope && r.kind == RejectionKind::Scope {
                    Disposition::Forbidden
                } else {
                    Disposition::Unauthorized
                }
            }
        }
    }
}

/// A local policy rejection with details about which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The check that failed
    pub kind: RejectionKind,
    /// Human-readable message explaining the rejection
    pub message: String,
}

impl Rejection {
    /// Creates a new rejection.
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Rejection {}

/// The policy check that rejected a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// `token_type` present and not the expected type
    TokenType,
    /// `active` is false
    Inactive,
    /// A required audience value is missing
    Audience,
    /// The issuer is not in the configured set
    Issuer,
    /// A required scope is not granted
    Scope,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::TokenType => write!(f, "token_type"),
            RejectionKind::Inactive => write!(f, "inactive"),
            RejectionKind::Audience => write!(f, "audience"),
            RejectionKind::Issuer => write!(f, "issuer"),
            RejectionKind::Scope => write!(f, "scope"),
        }
    }
}

/// Errors raised while building an [`IntrospectGate`](crate::IntrospectGate).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The introspection endpoint was empty.
    #[error("introspection endpoint is required")]
    MissingEndpoint,

    /// The introspection endpoint is not a valid URL.
    #[error("invalid introspection endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// An extra request header has an invalid name.
    #[error("invalid introspection request header name '{0}'")]
    InvalidHeaderName(String),

    /// An extra request header has an invalid value.
    #[error("invalid value for introspection request header '{0}'")]
    InvalidHeaderValue(String),

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build introspection client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_token_message_is_fixed() {
        assert_eq!(
            IntrospectError::MalformedToken.to_string(),
            "Missing or malformed token"
        );
    }

    #[test]
    fn endpoint_declined_is_unauthorized_not_error() {
        let err = IntrospectError::EndpointDeclined(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.disposition(false), Disposition::Unauthorized);
        assert_eq!(err.disposition(true), Disposition::Unauthorized);
    }

    #[test]
    fn decode_failure_is_error() {
        let decode = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = IntrospectError::Decode(decode);
        assert_eq!(err.disposition(false), Disposition::Error);
    }

    #[test]
    fn scope_rejection_is_forbidden_only_when_enabled() {
        let err: IntrospectError = Rejection::new(RejectionKind::Scope, "missing 'admin'").into();
        assert_eq!(err.disposition(false), Disposition::Unauthorized);
        assert_eq!(err.disposition(true), Disposition::Forbidden);
    }

    #[test]
    fn non_scope_rejection_never_forbidden() {
        for kind in [
            RejectionKind::TokenType,
            RejectionKind::Inactive,
            RejectionKind::Audience,
            RejectionKind::Issuer,
        ] {
            let err: IntrospectError = Rejection::new(kind, "nope").into();
            assert_eq!(err.disposition(true), Disposition::Unauthorized);
        }
    }

    #[test]
    fn rejection_display_includes_kind() {
        let r = Rejection::new(RejectionKind::Audience, "missing 'svc1'");
        assert_eq!(r.to_string(), "audience: missing 'svc1'");
    }
}
