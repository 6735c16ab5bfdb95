//! Configuration loading: a TOML file with environment variable overrides.
//!
//! Looks for `eodsa.toml` in the working directory. Every field has a
//! default so the file is optional, except the session secret which must be
//! provided one way or the other. Environment variables take precedence over
//! file values.

use serde::Deserialize;

/// Shortest accepted session-signing secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = eodsa_adapter_crypto::MIN_SECRET_LEN;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Session tokens and the bootstrap admin.
    pub auth: AuthConfig,
    /// reCAPTCHA verification.
    pub recaptcha: RecaptchaConfig,
    /// Outbound email relay.
    pub mail: MailConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Read the client address from `X-Forwarded-For` (behind a proxy only).
    pub trust_forwarded_for: bool,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC key for session tokens.
    pub session_secret: String,
    pub session_ttl_minutes: i64,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    /// Server-side secret. Captcha tokens are not verified when unset.
    pub secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// JSON relay endpoint. Emails are only logged when unset.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from `eodsa.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("eodsa.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("EODSA_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("EODSA_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some((host, port)) = var("EODSA_BIND")
            .as_deref()
            .and_then(|v| v.rsplit_once(':'))
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("EODSA_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("EODSA_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("EODSA_SESSION_SECRET") {
            self.auth.session_secret = val;
        }
        if let Some(val) = var("EODSA_ADMIN_EMAIL") {
            self.auth.admin_email = Some(val);
        }
        if let Some(val) = var("EODSA_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(val);
        }
        if let Some(val) = var("EODSA_RECAPTCHA_SECRET") {
            self.recaptcha.secret = Some(val);
        }
        if let Some(val) = var("EODSA_MAIL_ENDPOINT") {
            self.mail.endpoint = Some(val);
        }
        if let Some(val) = var("EODSA_MAIL_API_KEY") {
            self.mail.api_key = Some(val);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.auth.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "session secret must be at least {MIN_SESSION_SECRET_LEN} bytes (set EODSA_SESSION_SECRET)"
            )));
        }
        if self.auth.session_ttl_minutes <= 0 {
            return Err(ConfigError::Validation(
                "session ttl must be positive".to_string(),
            ));
        }
        if self.auth.admin_email.is_some() != self.auth.admin_password.is_some() {
            return Err(ConfigError::Validation(
                "admin email and admin password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// The bootstrap admin's email and password, when configured.
    #[must_use]
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        self.auth
            .admin_email
            .as_deref()
            .zip(self.auth.admin_password.as_deref())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            trust_forwarded_for: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:eodsa.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "eodsad=info,eodsa=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: String::new(),
            session_ttl_minutes: 12 * 60,
            admin_email: None,
            admin_password: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
