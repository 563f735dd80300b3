//! Configuration loading, constants, and environment resolution.
//!
//! `AppConfig` holds the settings read from the optional TOML file; every
//! key has a default so the binary runs without one. `ServerConfig` is the
//! result of resolving the `ENV` variable once at startup: the listen
//! address plus, in production, the ACME certificate settings.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use const_format::formatcp;
use serde::{Deserialize, Serialize};

/// Environment variable that selects the operating mode.
pub const ENV_VAR: &str = "ENV";

/// Development listen port (plain HTTP).
pub const DEV_PORT: u16 = 3000;

/// Production listen port (TLS).
pub const TLS_PORT: u16 = 443;

/// Directory for static assets, served for any path without a dynamic route.
pub const PUBLIC_DIR: &str = "public";

/// Directory holding the numbered error pages (`<status>.html`).
pub const ERROR_PAGE_DIR: &str = "public/error";

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default filesystem cache for ACME-acquired certificates.
pub const DEFAULT_CERT_CACHE_DIR: &str = "/var/www/.cache";

/// Placeholder domain shipped in the default config. Deployments must
/// replace it; the certificate authority will not issue for it.
pub const PLACEHOLDER_DOMAIN: &str = "example.com";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "hearth=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Cache-Control headers for upstream caches. All values are in seconds.

/// Rendered pages - content changes only on redeploy, keep it short anyway
pub const HTTP_CACHE_PAGE_MAX_AGE: u32 = 60;

/// Static assets (CSS, images) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

/// Error responses - short TTL so failures are not pinned in caches
pub const HTTP_CACHE_ERROR_MAX_AGE: u32 = 5;

// Pre-formatted Cache-Control header values (compile-time string concatenation)
pub const CACHE_CONTROL_PAGE: &str = formatcp!("public, max-age={}", HTTP_CACHE_PAGE_MAX_AGE);

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

pub const CACHE_CONTROL_ERROR: &str = formatcp!("public, max-age={}", HTTP_CACHE_ERROR_MAX_AGE);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    /// HTTP server configuration
    pub http: HttpConfig,
    /// TLS / certificate management settings (production mode only)
    pub tls: TlsSettings,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the page header and titles.
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "hearth".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
        }
    }
}

/// Certificate management settings, only consulted in production mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// The single domain certificates are issued for.
    pub domain: String,
    /// Contact address registered with the ACME account.
    pub contact: Option<String>,
    /// Filesystem cache for acquired certificates.
    pub cache_dir: String,
    /// Use the production Let's Encrypt directory (staging when false).
    pub acme_production: bool,
    /// Redirect plain HTTP to HTTPS.
    pub redirect_http: bool,
    /// Port the redirect listener binds.
    pub redirect_port: u16,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            domain: PLACEHOLDER_DOMAIN.to_string(),
            contact: None,
            cache_dir: DEFAULT_CERT_CACHE_DIR.to_string(),
            acme_production: true,
            redirect_http: true,
            redirect_port: 80,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to the defaults
    /// when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Operating mode, derived once per process start from the `ENV` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Read the operating mode from the process environment.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(ENV_VAR).ok().as_deref())
    }

    /// Total over all inputs: anything but `production` is development.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// ACME certificate management settings, present only in production mode.
///
/// Certificate retrieval is delegated entirely to the ACME state machine,
/// keyed by the allow-listed domain; no static key or certificate pair is
/// read from disk. The cache directory is created lazily by the cache on
/// first write, not at resolve time.
#[derive(Debug, Clone)]
pub struct AcmeSettings {
    /// Host allow-list; exactly one domain.
    pub domains: Vec<String>,
    /// Optional mailto contact for the ACME account.
    pub contact: Option<String>,
    pub cache_dir: String,
    /// Production Let's Encrypt directory when true, staging otherwise.
    pub directory_production: bool,
    pub redirect_http: bool,
    pub redirect_port: u16,
}

/// Resolved server configuration: operating mode, listen address, and the
/// optional TLS settings. Created once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub env: Environment,
    pub addr: SocketAddr,
    pub acme: Option<AcmeSettings>,
}

impl ServerConfig {
    /// Resolve the server configuration from the process environment.
    ///
    /// Reads `ENV` exactly once. Total over all inputs; unrecognized values
    /// silently fall back to development.
    pub fn resolve(config: &AppConfig) -> Self {
        Self::for_environment(Environment::from_env(), config)
    }

    /// Build the configuration for a known operating mode.
    pub fn for_environment(env: Environment, config: &AppConfig) -> Self {
        match env {
            Environment::Production => Self {
                env,
                addr: SocketAddr::from(([0, 0, 0, 0], TLS_PORT)),
                acme: Some(AcmeSettings {
                    domains: vec![config.tls.domain.clone()],
                    contact: config.tls.contact.clone(),
                    cache_dir: config.tls.cache_dir.clone(),
                    directory_production: config.tls.acme_production,
                    redirect_http: config.tls.redirect_http,
                    redirect_port: config.tls.redirect_port,
                }),
            },
            Environment::Development => Self {
                env,
                addr: SocketAddr::from(([0, 0, 0, 0], DEV_PORT)),
                acme: None,
            },
        }
    }
}
