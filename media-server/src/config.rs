//! # Server Configuration
//!
//! Environment-driven settings with development defaults, validated at
//! startup so a misconfigured service fails fast instead of serving.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `WAVELINE_BIND` | `127.0.0.1:8080` | Listen address |
//! | `WAVELINE_MEDIA_ROOT` | `./media` | Root directory of protected assets |
//! | `WAVELINE_CATALOG` | (built-in demo) | Path to the catalog JSON |
//! | `SESSION_SECRET` | `dev-secret` | HMAC key for session tokens |
//! | `SESSION_MAX_DAYS` | `90` | Session token lifetime |
//! | `WAVELINE_COOKIE` | `wl_session` | Session cookie name |

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub media_root: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub session_secret: String,
    pub session_max_days: i64,
    pub cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            media_root: PathBuf::from("./media"),
            catalog_path: None,
            session_secret: "dev-secret".to_string(),
            session_max_days: 90,
            cookie_name: core_auth::SESSION_COOKIE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to development
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for values that are present but
    /// unparseable; absent values are never an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("WAVELINE_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|e| ServerError::Config(format!("Invalid WAVELINE_BIND: {e}")))?;
        }
        if let Ok(root) = std::env::var("WAVELINE_MEDIA_ROOT") {
            config.media_root = PathBuf::from(root);
        }
        if let Ok(path) = std::env::var("WAVELINE_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            config.session_secret = secret;
        } else {
            warn!("SESSION_SECRET not set; using the development secret");
        }
        if let Ok(days) = std::env::var("SESSION_MAX_DAYS") {
            config.session_max_days = days
                .parse()
                .map_err(|e| ServerError::Config(format!("Invalid SESSION_MAX_DAYS: {e}")))?;
        }
        if let Ok(name) = std::env::var("WAVELINE_COOKIE") {
            config.cookie_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.session_secret.is_empty() {
            return Err(ServerError::Config(
                "SESSION_SECRET must not be empty".to_string(),
            ));
        }
        if self.session_max_days <= 0 {
            return Err(ServerError::Config(
                "SESSION_MAX_DAYS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cookie_name, "wl_session");
        assert_eq!(config.session_max_days, 90);
    }

    #[test]
    fn empty_secret_rejected() {
        let config = ServerConfig {
            session_secret: String::new(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn nonpositive_ttl_rejected() {
        let config = ServerConfig {
            session_max_days: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }
}
