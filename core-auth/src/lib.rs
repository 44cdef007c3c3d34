//! # Session Authentication Module
//!
//! Stateless verification of the session credential that gates access to
//! protected media.
//!
//! ## Overview
//!
//! This module handles:
//! - Verification of the 3-segment signed session token (header, claims,
//!   keyed digest) against a server-held secret
//! - Issuing tokens with `iat`/`exp` claims for login flows and tests
//! - Extracting the credential from a `Cookie` request header
//!
//! Verification is a pure function of `(credential, secret, clock)` — there is
//! no shared mutable state, so a single [`SessionGate`] can be checked from
//! any number of concurrent requests.

pub mod cookie;
pub mod error;
pub mod gate;
pub mod types;

pub use cookie::token_from_cookie_header;
pub use error::{AuthError, Result};
pub use gate::SessionGate;
pub use types::{AccessDecision, Claims, DenyReason};

/// Default name of the session cookie carrying the credential.
pub const SESSION_COOKIE: &str = "wl_session";
