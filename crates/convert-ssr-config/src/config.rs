// crates/convert-ssr-config/src/config.rs
// ============================================================================
// Module: Convert SSR Configuration
// Description: Configuration loading and validation for the bootstrap server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: convert-ssr-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; nothing is started from a
//! half-valid config.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use convert_ssr_core::DEFAULT_BOOTSTRAP_QUERY_KEY;
use convert_ssr_core::DEFAULT_MODE_QUERY_KEY;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "convert-ssr.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONVERT_SSR_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address for the HTTP server.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Minimum bootstrap timeout in milliseconds.
pub const MIN_BOOTSTRAP_TIMEOUT_MS: u64 = 100;
/// Maximum bootstrap timeout in milliseconds.
pub const MAX_BOOTSTRAP_TIMEOUT_MS: u64 = 60_000;
/// Default bootstrap timeout in milliseconds.
pub(crate) const DEFAULT_BOOTSTRAP_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a query key.
pub(crate) const MAX_QUERY_KEY_LENGTH: usize = 64;
/// Minimum client connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum client connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum client request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum client request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;
/// Default client connect timeout in milliseconds.
pub(crate) const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 500;
/// Default client request timeout in milliseconds.
pub(crate) const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
/// Default maximum conversion response size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Upper bound for the conversion response size limit.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Maximum number of static fixtures.
pub(crate) const MAX_STATIC_FIXTURES: usize = 1024;
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// Root configuration for the bootstrap server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConvertSsrConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Bootstrap middleware configuration.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Conversion client configuration.
    #[serde(default)]
    pub client: ClientConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ConvertSsrConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.bootstrap.validate()?;
        self.client.validate()?;
        self.audit.validate()
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr().map(|_| ())
    }
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Strategy used to populate the store before rendering.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fetch conversion data first, then seed a fresh store.
    FetchFirst,
    /// Fire store actions and wait for completion events.
    #[default]
    Actions,
}

impl StrategyKind {
    /// Returns the config label for the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchFirst => "fetch_first",
            Self::Actions => "actions",
        }
    }
}

/// Bootstrap middleware configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Strategy selection.
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Upper bound on a single bootstrap, in milliseconds.
    #[serde(default = "default_bootstrap_timeout_ms")]
    pub timeout_ms: u64,
    /// Query parameter carrying the bootstrap instruction.
    #[serde(default = "default_query_key")]
    pub query_key: String,
    /// Query parameter carrying the render mode.
    #[serde(default = "default_mode_key")]
    pub mode_key: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            timeout_ms: default_bootstrap_timeout_ms(),
            query_key: default_query_key(),
            mode_key: default_mode_key(),
        }
    }
}

impl BootstrapConfig {
    /// Returns the bootstrap timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates bootstrap configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOOTSTRAP_TIMEOUT_MS..=MAX_BOOTSTRAP_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "bootstrap.timeout_ms must be between {MIN_BOOTSTRAP_TIMEOUT_MS} and \
                 {MAX_BOOTSTRAP_TIMEOUT_MS}"
            )));
        }
        validate_query_key("bootstrap.query_key", &self.query_key)?;
        validate_query_key("bootstrap.mode_key", &self.mode_key)?;
        if self.query_key == self.mode_key {
            return Err(ConfigError::Invalid(
                "bootstrap.query_key and bootstrap.mode_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Conversion client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientConfig {
    /// HTTP conversion service.
    Http(HttpClientSettings),
    /// Fixed fixture table served from memory.
    Static(StaticClientSettings),
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::Http(HttpClientSettings::default())
    }
}

impl ClientConfig {
    /// Returns the config label for the client type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Static(_) => "static",
        }
    }

    /// Validates client configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Http(settings) => settings.validate(),
            Self::Static(settings) => settings.validate(),
        }
    }
}

/// HTTP conversion client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HttpClientSettings {
    /// Base URL of the conversion service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path appended to the base URL.
    #[serde(default = "default_client_path")]
    pub path: String,
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Full request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext HTTP.
    #[serde(default)]
    pub allow_http: bool,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_client_path(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            allow_http: false,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpClientSettings {
    /// Validates HTTP client settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid("client.base_url must be non-empty".to_string()));
        }
        if base_url.starts_with("http://") {
            if !self.allow_http {
                return Err(ConfigError::Invalid(
                    "client.base_url uses http without allow_http".to_string(),
                ));
            }
        } else if !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "client.base_url must use http or https".to_string(),
            ));
        }
        if !(MIN_CONNECT_TIMEOUT_MS..=MAX_CONNECT_TIMEOUT_MS).contains(&self.connect_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "client.connect_timeout_ms must be between {MIN_CONNECT_TIMEOUT_MS} and \
                 {MAX_CONNECT_TIMEOUT_MS}"
            )));
        }
        if !(MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS).contains(&self.request_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "client.request_timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and \
                 {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.request_timeout_ms < self.connect_timeout_ms {
            return Err(ConfigError::Invalid(
                "client.request_timeout_ms must be >= client.connect_timeout_ms".to_string(),
            ));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "client.max_response_bytes must be between 1 and {MAX_MAX_RESPONSE_BYTES}"
            )));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() || user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "client.user_agent must be 1..={MAX_USER_AGENT_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Static fixture client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StaticClientSettings {
    /// Conversion data keyed by requested types.
    #[serde(default)]
    pub fixtures: BTreeMap<String, Value>,
}

impl StaticClientSettings {
    /// Validates static client settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fixtures.len() > MAX_STATIC_FIXTURES {
            return Err(ConfigError::Invalid(format!(
                "client.fixtures exceeds {MAX_STATIC_FIXTURES} entries"
            )));
        }
        if self.fixtures.keys().any(|types| types.trim().is_empty()) {
            return Err(ConfigError::Invalid("client.fixtures keys must be non-empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit disabled.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving bootstrap audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, self.path.as_deref()) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a query parameter name.
fn validate_query_key(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.len() > MAX_QUERY_KEY_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} must be 1..={MAX_QUERY_KEY_LENGTH} characters"
        )));
    }
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')) {
        return Err(ConfigError::Invalid(format!(
            "{field} may only contain ASCII letters, digits, '_', '-', or '.'"
        )));
    }
    Ok(())
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default bootstrap timeout in milliseconds.
const fn default_bootstrap_timeout_ms() -> u64 {
    DEFAULT_BOOTSTRAP_TIMEOUT_MS
}

/// Default instruction query key.
fn default_query_key() -> String {
    DEFAULT_BOOTSTRAP_QUERY_KEY.to_string()
}

/// Default render mode query key.
fn default_mode_key() -> String {
    DEFAULT_MODE_QUERY_KEY.to_string()
}

/// Default conversion service base URL.
fn default_base_url() -> String {
    "https://localhost".to_string()
}

/// Default conversion service path.
fn default_client_path() -> String {
    "/conversions".to_string()
}

/// Default connect timeout in milliseconds.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default request timeout in milliseconds.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default response size limit in bytes.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default user agent.
fn default_user_agent() -> String {
    format!("convert-ssr/{}", env!("CARGO_PKG_VERSION"))
}
