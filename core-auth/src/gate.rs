//! Session token verification and issuance.
//!
//! The credential is a compact 3-segment token: base64url(header JSON),
//! base64url(claims JSON), base64url(HMAC-SHA256 over the first two segments
//! joined by `.`). Segments use the URL-safe alphabet without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use tracing::debug;

use crate::error::{AuthError, Result};
use crate::types::{AccessDecision, Claims, DenyReason};

type HmacSha256 = Hmac<Sha256>;

/// Verifies and issues session tokens against a fixed server-held secret.
///
/// The gate holds no other state; `check` is safe to call per request from
/// any number of tasks.
///
/// # Examples
///
/// ```
/// use core_auth::SessionGate;
/// use chrono::{Duration, Utc};
///
/// let gate = SessionGate::new("dev-secret");
/// let now = Utc::now();
/// let token = gate.issue(Some("listener@example.com"), Duration::days(90), now).unwrap();
/// assert!(gate.check(Some(&token), now).is_authorized());
/// ```
#[derive(Clone)]
pub struct SessionGate {
    secret: Vec<u8>,
}

impl SessionGate {
    /// Create a gate over the given signing secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check a credential against the secret and the supplied clock.
    ///
    /// Decision order: presence, structure, signature, payload, expiry.
    /// The signature is verified before the payload is decoded, so a forged
    /// payload is never parsed.
    pub fn check(&self, credential: Option<&str>, now: DateTime<Utc>) -> AccessDecision {
        let Some(token) = credential else {
            return AccessDecision::Denied(DenyReason::Missing);
        };

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            debug!("credential rejected: wrong segment count");
            return AccessDecision::Denied(DenyReason::Malformed);
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            debug!("credential rejected: empty segment");
            return AccessDecision::Denied(DenyReason::Malformed);
        }

        let Ok(signature_bytes) = URL_SAFE_NO_PAD.decode(signature) else {
            debug!("credential rejected: undecodable signature segment");
            return AccessDecision::Denied(DenyReason::Signature);
        };
        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature_bytes).is_err() {
            debug!("credential rejected: signature mismatch");
            return AccessDecision::Denied(DenyReason::Signature);
        }

        let claims: Claims = match URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        {
            Some(claims) => claims,
            None => {
                debug!("credential rejected: undecodable claims payload");
                return AccessDecision::Denied(DenyReason::Malformed);
            }
        };

        // Whole-second comparison; a token is valid through its expiry second.
        if now.timestamp() > claims.exp {
            debug!(exp = claims.exp, "credential rejected: expired");
            return AccessDecision::Denied(DenyReason::Expired);
        }

        AccessDecision::Authorized(claims)
    }

    /// Issue a token for `sub`, valid for `ttl` from `now`.
    pub fn issue(
        &self,
        sub: Option<&str>,
        ttl: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let claims = Claims::new(
            sub.map(str::to_owned),
            now.timestamp(),
            ttl.num_seconds(),
        );
        self.issue_claims(&claims)
    }

    /// Issue a token carrying the exact claims given.
    pub fn issue_claims(&self, claims: &Claims) -> Result<String> {
        let header = serde_json::json!({ "alg": "HS256", "typ": "JWT" });
        let header_bytes = serde_json::to_vec(&header)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;
        let payload_bytes =
            serde_json::to_vec(claims).map_err(|e| AuthError::Encoding(e.to_string()))?;

        let p1 = URL_SAFE_NO_PAD.encode(header_bytes);
        let p2 = URL_SAFE_NO_PAD.encode(payload_bytes);

        let mut mac = self.mac();
        mac.update(p1.as_bytes());
        mac.update(b".");
        mac.update(p2.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{p1}.{p2}.{sig}"))
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key of any length is valid")
    }
}

// Never expose the signing secret through Debug.
impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
