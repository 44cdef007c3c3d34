use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims carried by a verified session token.
///
/// The token payload is JSON with `iat`/`exp` timestamps in whole seconds
/// plus whatever identity fields the issuer attached. Unknown fields are
/// preserved so the session endpoints can echo the payload back untouched.
///
/// # Examples
///
/// ```
/// use core_auth::Claims;
///
/// let claims = Claims::new(Some("listener@example.com".into()), 1_700_000_000, 3600);
/// assert_eq!(claims.exp, claims.iat + 3600);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity (typically the listener's email). Optional because
    /// the gate only requires timing claims to authorize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch. Evaluated in whole seconds;
    /// a token is still valid at the exact expiry second.
    pub exp: i64,
    /// Any additional payload fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Create claims issued at `iat` and valid for `ttl_secs` seconds.
    pub fn new(sub: Option<String>, iat: i64, ttl_secs: i64) -> Self {
        Self {
            sub,
            iat,
            exp: iat + ttl_secs,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach an extra payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

// Subjects are identities; keep them out of Debug output.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &self.sub.as_deref().map(|_| "[REDACTED]"))
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Why a credential was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenyReason {
    /// No credential was attached to the request.
    Missing,
    /// The credential is not a 3-segment token or its payload is undecodable.
    Malformed,
    /// The keyed digest does not match the first two segments.
    Signature,
    /// Structure and signature are valid but `exp` is in the past.
    Expired,
}

impl DenyReason {
    /// Short wire identifier used in session JSON responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Missing => "none",
            DenyReason::Malformed => "format",
            DenyReason::Signature => "sig",
            DenyReason::Expired => "exp",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request authorization decision. Derived, never stored.
///
/// # Examples
///
/// ```
/// use core_auth::{AccessDecision, DenyReason};
///
/// let decision = AccessDecision::Denied(DenyReason::Missing);
/// assert!(!decision.is_authorized());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// Credential is valid; the decoded claims ride along.
    Authorized(Claims),
    /// Credential is absent or invalid.
    Denied(DenyReason),
}

impl AccessDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AccessDecision::Authorized(_))
    }

    /// Decoded claims, if authorized.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            AccessDecision::Authorized(claims) => Some(claims),
            AccessDecision::Denied(_) => None,
        }
    }

    /// Deny reason, if denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Authorized(_) => None,
            AccessDecision::Denied(reason) => Some(*reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_expiry_arithmetic() {
        let claims = Claims::new(Some("a@b.c".into()), 1000, 90);
        assert_eq!(claims.iat, 1000);
        assert_eq!(claims.exp, 1090);
    }

    #[test]
    fn claims_roundtrip_preserves_extra_fields() {
        let claims = Claims::new(Some("a@b.c".into()), 1, 2)
            .with_field("scope", serde_json::json!("listen"));
        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
        assert_eq!(back.extra.get("scope"), Some(&serde_json::json!("listen")));
    }

    #[test]
    fn claims_debug_redacts_subject() {
        let claims = Claims::new(Some("listener@example.com".into()), 1, 2);
        let debug = format!("{:?}", claims);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("listener@example.com"));
    }

    #[test]
    fn deny_reason_wire_names() {
        assert_eq!(DenyReason::Missing.as_str(), "none");
        assert_eq!(DenyReason::Malformed.as_str(), "format");
        assert_eq!(DenyReason::Signature.as_str(), "sig");
        assert_eq!(DenyReason::Expired.as_str(), "exp");
    }

    #[test]
    fn decision_accessors() {
        let ok = AccessDecision::Authorized(Claims::new(None, 1, 2));
        assert!(ok.is_authorized());
        assert!(ok.claims().is_some());
        assert_eq!(ok.deny_reason(), None);

        let denied = AccessDecision::Denied(DenyReason::Expired);
        assert!(!denied.is_authorized());
        assert!(denied.claims().is_none());
        assert_eq!(denied.deny_reason(), Some(DenyReason::Expired));
    }
}
