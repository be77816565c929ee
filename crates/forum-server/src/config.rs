//! Server configuration from environment variables.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                reason: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => 3000,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        Ok(Self {
            port,
            log_level,
            cors_allowed_origins,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // SAFETY: This test is not run in parallel with other tests that read PORT.
        unsafe { env::remove_var("PORT") };

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.cors_allowed_origins, "*");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // SAFETY: This test is not run in parallel with other tests that read PORT.
        unsafe { env::set_var("PORT", "not-a-port") };

        let err = ServerConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        // SAFETY: This test is not run in parallel with other tests that read PORT.
        unsafe { env::remove_var("PORT") };
    }
}
