use std::fmt;
use std::sync::Arc;

use crate::error::{Rejection, RejectionKind};
use crate::response::IntrospectionResult;

/// Token type accepted when none is configured.
pub const DEFAULT_TOKEN_TYPE: &str = "access_token";

/// Predicate deciding whether a set of granted scopes satisfies one required scope.
///
/// Strategies are plain values. [`ScopeStrategy::exact`] is used whenever
/// the caller does not supply one.
///
/// # Examples
///
/// ```
/// use introspect_gate::ScopeStrategy;
///
/// let granted = ["photos.read", "profile"];
///
/// assert!(ScopeStrategy::exact().matches(&granted, "profile"));
/// assert!(!ScopeStrategy::exact().matches(&granted, "photos.read.thumbnails"));
/// assert!(ScopeStrategy::hierarchic().matches(&granted, "photos.read.thumbnails"));
/// ```
#[derive(Clone)]
pub struct ScopeStrategy {
    f: Arc<dyn Fn(&[&str], &str) -> bool + Send + Sync>,
}

impl ScopeStrategy {
    /// Matches when `required` is one of the granted scopes.
    pub fn exact() -> Self {
        Self::custom(|granted, required| granted.iter().any(|g| *g == required))
    }

    /// Matches when a granted scope equals `required` or is a dotted prefix of it.
    ///
    /// `photos` grants `photos.read`, but `photos.read` does not grant `photos`.
    pub fn hierarchic() -> Self {
        Self::custom(|granted, required| {
            granted.iter().any(|g| {
                *g == required
                    || (!g.is_empty()
                        && required.len() > g.len()
                        && required.starts_with(g)
                        && required.as_bytes()[g.len()] == b'.')
            })
        })
    }

    /// Matches dotted scopes where a granted `*` segment stands for any one
    /// non-empty segment.
    ///
    /// `photos.*` grants `photos.read` but not `photos.read.all`.
    pub fn wildcard() -> Self {
        Self::custom(|granted, required| {
            granted.iter().any(|g| {
                if *g == required {
                    return true;
                }
                let have: Vec<&str> = g.split('.').collect();
                let want: Vec<&str> = required.split('.').collect();
                have.len() == want.len()
                    && have
                        .iter()
                        .zip(&want)
                        .all(|(h, w)| h == w || (*h == "*" && !w.is_empty()))
            })
        })
    }

    /// Wraps an arbitrary predicate `(granted, required) -> bool`.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[&str], &str) -> bool + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Evaluates the strategy for one required scope.
    pub fn matches(&self, granted: &[&str], required: &str) -> bool {
        (self.f)(granted, required)
    }
}

impl Default for ScopeStrategy {
    fn default() -> Self {
        Self::exact()
    }
}

impl fmt::Debug for ScopeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScopeStrategy")
    }
}

/// Local authorization policy applied to a decoded introspection result.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. token type (only when the result carries one)
/// 2. active flag
/// 3. every required audience is present
/// 4. issuer is in the configured set (only when issuers are configured)
/// 5. every required scope satisfies the scope strategy
///
/// Evaluation is pure: no I/O, no shared state.
///
/// # Examples
///
/// ```
/// use introspect_gate::{IntrospectionResult, ResponsePolicy};
///
/// let policy = ResponsePolicy::new().require_audience("svc1");
///
/// let result = IntrospectionResult {
///     active: true,
///     audience: vec!["svc1".to_string()],
///     ..Default::default()
/// };
/// assert!(policy.evaluate(&result).is_ok());
///
/// let inactive = IntrospectionResult { active: false, ..result };
/// assert!(policy.evaluate(&inactive).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    expected_token_type: String,
    audience: Vec<String>,
    issuers: Vec<String>,
    scopes: Vec<String>,
    scope_strategy: ScopeStrategy,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponsePolicy {
    /// Creates a policy that only requires an active `access_token`.
    pub fn new() -> Self {
        Self {
            expected_token_type: DEFAULT_TOKEN_TYPE.to_string(),
            audience: Vec::new(),
            issuers: Vec::new(),
            scopes: Vec::new(),
            scope_strategy: ScopeStrategy::exact(),
        }
    }

    /// Sets the token type a result must carry when it reports one.
    pub fn expect_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.expected_token_type = token_type.into();
        self
    }

    /// Adds an audience value the result must contain.
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        push_unique(&mut self.audience, audience.into());
        self
    }

    /// Adds an issuer to the accepted set.
    pub fn allow_issuer(mut self, issuer: impl Into<String>) -> Self {
        push_unique(&mut self.issuers, issuer.into());
        self
    }

    /// Adds a scope the result must grant.
    pub fn require_scope(mut self, scope: impl Into<String>) -> Self {
        push_unique(&mut self.scopes, scope.into());
        self
    }

    /// Replaces the scope-matching strategy.
    pub fn scope_strategy(mut self, strategy: ScopeStrategy) -> Self {
        self.scope_strategy = strategy;
        self
    }

    /// Returns the required scopes in configuration order.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Evaluates a decoded result.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] for the first check that fails.
    pub fn evaluate(&self, result: &IntrospectionResult) -> Result<(), Rejection> {
        if let Some(token_type) = result.token_type.as_deref() {
            if !token_type.is_empty() && token_type != self.expected_token_type {
                return Err(Rejection::new(
                    RejectionKind::TokenType,
                    format!(
                        "expected token type '{}', got '{}'",
                        self.expected_token_type, token_type
                    ),
                ));
            }
        }

        if !result.active {
            return Err(Rejection::new(RejectionKind::Inactive, "token is not active"));
        }

        for aud in &self.audience {
            if !result.audience.contains(aud) {
                return Err(Rejection::new(
                    RejectionKind::Audience,
                    format!("required audience '{}' not present", aud),
                ));
            }
        }

        if !self.issuers.is_empty() {
            let issuer = result.issuer.as_deref().unwrap_or("");
            if !self.issuers.iter().any(|i| i == issuer) {
                return Err(Rejection::new(
                    RejectionKind::Issuer,
                    format!("issuer '{}' not allowed", issuer),
                ));
            }
        }

        let granted = result.granted_scopes();
        for scope in &self.scopes {
            if !self.scope_strategy.matches(&granted, scope) {
                return Err(Rejection::new(
                    RejectionKind::Scope,
                    format!("required scope '{}' not granted", scope),
                ));
            }
        }

        Ok(())
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> IntrospectionResult {
        IntrospectionResult {
            active: true,
            ..Default::default()
        }
    }

    fn kind(policy: &ResponsePolicy, result: &IntrospectionResult) -> Option<RejectionKind> {
        policy.evaluate(result).err().map(|r| r.kind)
    }

    #[test]
    fn active_token_passes_empty_policy() {
        assert!(ResponsePolicy::new().evaluate(&active()).is_ok());
    }

    #[test]
    fn inactive_token_rejected() {
        let result = IntrospectionResult::default();
        assert_eq!(kind(&ResponsePolicy::new(), &result), Some(RejectionKind::Inactive));
    }

    #[test]
    fn token_type_checked_before_active() {
        let result = IntrospectionResult {
            active: false,
            token_type: Some("refresh_token".to_string()),
            ..Default::default()
        };
        assert_eq!(kind(&ResponsePolicy::new(), &result), Some(RejectionKind::TokenType));
    }

    #[test]
    fn empty_token_type_is_ignored() {
        let result = IntrospectionResult {
            token_type: Some(String::new()),
            ..active()
        };
        assert!(ResponsePolicy::new().evaluate(&result).is_ok());
    }

    #[test]
    fn configured_token_type() {
        let policy = ResponsePolicy::new().expect_token_type("Bearer");
        let result = IntrospectionResult {
            token_type: Some("Bearer".to_string()),
            ..active()
        };
        assert!(policy.evaluate(&result).is_ok());
    }

    #[test]
    fn every_required_audience_must_be_present() {
        let policy = ResponsePolicy::new()
            .require_audience("svc1")
            .require_audience("svc2");

        let partial = IntrospectionResult {
            audience: vec!["svc1".to_string()],
            ..active()
        };
        assert_eq!(kind(&policy, &partial), Some(RejectionKind::Audience));

        let full = IntrospectionResult {
            audience: vec!["svc2".to_string(), "svc3".to_string(), "svc1".to_string()],
            ..active()
        };
        assert!(policy.evaluate(&full).is_ok());
    }

    #[test]
    fn issuer_must_be_in_configured_set() {
        let policy = ResponsePolicy::new()
            .allow_issuer("https://a.example")
            .allow_issuer("https://b.example");

        let ok = IntrospectionResult {
            issuer: Some("https://b.example".to_string()),
            ..active()
        };
        assert!(policy.evaluate(&ok).is_ok());

        let wrong = IntrospectionResult {
            issuer: Some("https://evil.example".to_string()),
            ..active()
        };
        assert_eq!(kind(&policy, &wrong), Some(RejectionKind::Issuer));

        assert_eq!(kind(&policy, &active()), Some(RejectionKind::Issuer));
    }

    #[test]
    fn missing_scope_rejected_with_exact_strategy() {
        let policy = ResponsePolicy::new().require_scope("admin");
        let result = IntrospectionResult {
            scope: Some("read write".to_string()),
            ..active()
        };
        assert_eq!(kind(&policy, &result), Some(RejectionKind::Scope));
    }

    #[test]
    fn all_required_scopes_must_match() {
        let policy = ResponsePolicy::new()
            .require_scope("read")
            .require_scope("write");
        let result = IntrospectionResult {
            scope: Some("write read".to_string()),
            ..active()
        };
        assert!(policy.evaluate(&result).is_ok());
    }

    #[test]
    fn permissive_strategy_accepts_any_scope() {
        let policy = ResponsePolicy::new()
            .require_scope("admin")
            .scope_strategy(ScopeStrategy::custom(|_, _| true));
        assert!(policy.evaluate(&active()).is_ok());
    }

    #[test]
    fn requirements_are_deduplicated() {
        let policy = ResponsePolicy::new()
            .require_scope("read")
            .require_scope("read");
        assert_eq!(policy.scopes(), ["read".to_string()]);
    }

    #[test]
    fn hierarchic_strategy() {
        let s = ScopeStrategy::hierarchic();
        assert!(s.matches(&["photos"], "photos"));
        assert!(s.matches(&["photos"], "photos.read"));
        assert!(!s.matches(&["photos.read"], "photos"));
        assert!(!s.matches(&["photo"], "photos.read"));
        assert!(!s.matches(&[""], "photos"));
    }

    #[test]
    fn wildcard_strategy() {
        let s = ScopeStrategy::wildcard();
        assert!(s.matches(&["photos.*"], "photos.read"));
        assert!(!s.matches(&["photos.*"], "photos.read.all"));
        assert!(!s.matches(&["photos.*"], "photos."));
        assert!(s.matches(&["*.read"], "videos.read"));
        assert!(s.matches(&["exact"], "exact"));
    }
}
