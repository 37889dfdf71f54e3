//! CLI configuration management
//!
//! Merges settings from the global config directory, an optional local
//! config file, environment variables, and command-line flags.

use std::path::{Path, PathBuf};

use billing_core::{BillingError, Result, Scope};
use serde::Deserialize;

/// API URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://api.billing.dev";

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Base URL of the billing API
    pub api_url: String,

    /// Bearer token for the billing API
    pub token: Option<String>,

    /// Team slug when operating on a team account
    pub team: Option<String>,

    /// Account owner, as recorded at login
    pub user: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Print diagnostics while running
    pub debug: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            team: None,
            user: None,
            timeout: 10,
            debug: false,
        }
    }
}

impl CliConfig {
    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// The team or user the commands operate on.
    pub fn scope(&self) -> Scope {
        match &self.team {
            Some(slug) => Scope::Team(slug.clone()),
            None => Scope::User(
                self.user
                    .clone()
                    .unwrap_or_else(|| "your account".to_string()),
            ),
        }
    }

    /// The API token, or a configuration error naming how to set one.
    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            BillingError::Config(
                "No API token configured. Set BILLING_TOKEN or add `token` to auth.toml"
                    .to_string(),
            )
        })
    }
}

/// Partial settings as they appear in a config file. Any file may set
/// any subset; auth.toml conventionally holds `token` and `user`.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    token: Option<String>,
    team: Option<String>,
    user: Option<String>,
    timeout: Option<u64>,
    debug: Option<bool>,
}

/// Default global configuration directory.
///
/// Uses the XDG config directory when available:
/// - Linux/macOS: `~/.config/billing`
/// - Fallback: `/etc/billing`
fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("billing")
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Global config directory (config.toml, auth.toml)
/// 3. Local config file
/// 4. Environment variables
/// 5. CLI arguments
///
/// Callers apply sources from highest priority to lowest; a value that is
/// already set is never overwritten.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_url: Option<String>,
    token: Option<String>,
    team: Option<String>,
    user: Option<String>,
    timeout: Option<u64>,
    debug: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API URL (with validation)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.api_url = Some(url);
        Ok(self)
    }

    /// Set API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set team slug
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Set debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.api_url.is_none() {
            if let Ok(api_url) = std::env::var("BILLING_API_URL") {
                // Validate before applying
                if Self::validate_url(&api_url).is_ok() {
                    self.api_url = Some(api_url);
                }
            }
        }

        if self.token.is_none() {
            if let Ok(token) = std::env::var("BILLING_TOKEN") {
                if !token.is_empty() {
                    self.token = Some(token);
                }
            }
        }

        if self.team.is_none() {
            if let Ok(team) = std::env::var("BILLING_TEAM") {
                if !team.is_empty() {
                    self.team = Some(team);
                }
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("BILLING_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    // Validate before applying
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        if self.debug.is_none() {
            if let Ok(debug) = std::env::var("BILLING_DEBUG") {
                self.debug = Some(debug.to_lowercase() == "true" || debug == "1");
            }
        }

        self
    }

    /// Merge an explicitly named config file. The file must exist.
    pub fn with_local_file(self, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => self.merge_file(path, true),
            None => Ok(self),
        }
    }

    /// Merge config.toml and auth.toml from a config directory. With no
    /// directory given, the default one is used; missing files are
    /// skipped, unreadable ones are an error.
    pub fn with_global_dir(self, dir: Option<&Path>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => default_config_dir(),
        };

        let builder = self.merge_file(&dir.join("config.toml"), false)?;
        builder.merge_file(&dir.join("auth.toml"), false)
    }

    fn merge_file(mut self, path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(BillingError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(self);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BillingError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|e| {
            BillingError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        // Only use file values if they weren't already set (preserving priority)
        self.api_url = self.api_url.or(file.api_url);
        self.token = self.token.or(file.token);
        self.team = self.team.or(file.team);
        self.user = self.user.or(file.user);
        self.timeout = self.timeout.or(file.timeout);
        self.debug = self.debug.or(file.debug);

        Ok(self)
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let api_url = self.api_url.unwrap_or(defaults.api_url);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        Self::validate_url(&api_url)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            api_url,
            token: self.token,
            team: self.team,
            user: self.user,
            timeout,
            debug: self.debug.unwrap_or(defaults.debug),
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(BillingError::Config("API URL cannot be empty".to_string()));
        }

        // Basic URL validation - must start with http:// or https://
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BillingError::Config(
                "API URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(BillingError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if timeout > 300 {
            return Err(BillingError::Config(
                "Timeout must be less than or equal to 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("BILLING_API_URL");
        std::env::remove_var("BILLING_TOKEN");
        std::env::remove_var("BILLING_TEAM");
        std::env::remove_var("BILLING_TIMEOUT");
        std::env::remove_var("BILLING_DEBUG");
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert!(config.team.is_none());
        assert_eq!(config.timeout, 10);
        assert!(!config.debug);
    }

    #[test]
    #[serial]
    fn test_builder_with_defaults() {
        clear_env();
        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_builder_with_custom_values() {
        let config = ConfigBuilder::new()
            .with_api_url("http://localhost:3000")
            .unwrap()
            .with_token("tok_secret")
            .with_team("acme")
            .with_debug(true)
            .with_timeout(30)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.token.as_deref(), Some("tok_secret"));
        assert_eq!(config.team.as_deref(), Some("acme"));
        assert!(config.debug);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn test_builder_url_validation() {
        // Empty URL
        assert!(ConfigBuilder::new().with_api_url("").is_err());

        // Invalid protocol
        assert!(ConfigBuilder::new()
            .with_api_url("ftp://example.com")
            .is_err());

        // Valid URLs
        assert!(ConfigBuilder::new()
            .with_api_url("http://localhost:3000")
            .is_ok());
        assert!(ConfigBuilder::new()
            .with_api_url("https://api.billing.dev")
            .is_ok());
    }

    #[test]
    fn test_builder_timeout_validation() {
        // Zero timeout
        assert!(ConfigBuilder::new().with_timeout(0).is_err());

        // Timeout too large
        assert!(ConfigBuilder::new().with_timeout(301).is_err());

        // Valid timeouts
        assert!(ConfigBuilder::new().with_timeout(1).is_ok());
        assert!(ConfigBuilder::new().with_timeout(300).is_ok());
    }

    #[test]
    #[serial]
    fn test_builder_env_overrides() {
        clear_env();
        std::env::set_var("BILLING_API_URL", "http://env.example.com:9000");
        std::env::set_var("BILLING_TOKEN", "tok_env");
        std::env::set_var("BILLING_TEAM", "env-team");
        std::env::set_var("BILLING_TIMEOUT", "25");
        std::env::set_var("BILLING_DEBUG", "true");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.api_url, "http://env.example.com:9000");
        assert_eq!(config.token.as_deref(), Some("tok_env"));
        assert_eq!(config.team.as_deref(), Some("env-team"));
        assert_eq!(config.timeout, 25);
        assert!(config.debug);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_priority_chain() {
        clear_env();
        std::env::set_var("BILLING_API_URL", "http://env.example.com:9000");
        std::env::set_var("BILLING_TIMEOUT", "25");

        // CLI args should override env vars
        let config = ConfigBuilder::new()
            .with_api_url("http://cli.example.com:7000")
            .unwrap()
            .with_env_overrides()
            .build()
            .unwrap();

        // CLI arg wins
        assert_eq!(config.api_url, "http://cli.example.com:7000");
        // Env var applies for timeout
        assert_eq!(config.timeout, 25);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_invalid_env_values_ignored() {
        clear_env();
        std::env::set_var("BILLING_API_URL", "not-a-url");
        std::env::set_var("BILLING_TIMEOUT", "invalid");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        // Should fall back to defaults
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, 10);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_local_file_merge() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billing.toml");
        std::fs::write(
            &path,
            "api_url = \"http://file.example.com\"\ntimeout = 42\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_local_file(Some(&path))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_url, "http://file.example.com");
        assert_eq!(config.timeout, 42);
    }

    #[test]
    fn test_local_file_missing_is_an_error() {
        let result = ConfigBuilder::new()
            .with_local_file(Some(Path::new("/nonexistent/billing.toml")));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_global_dir_merge() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "api_url = \"http://global.example.com\"\nteam = \"acme\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("auth.toml"),
            "token = \"tok_file\"\nuser = \"jane@example.com\"\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_global_dir(Some(dir.path()))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_url, "http://global.example.com");
        assert_eq!(config.team.as_deref(), Some("acme"));
        assert_eq!(config.token.as_deref(), Some("tok_file"));
        assert_eq!(config.user.as_deref(), Some("jane@example.com"));
    }

    #[test]
    #[serial]
    fn test_flags_beat_global_dir() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "api_url = \"http://global.example.com\"\n",
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .with_api_url("http://cli.example.com")
            .unwrap()
            .with_global_dir(Some(dir.path()))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_url, "http://cli.example.com");
    }

    #[test]
    fn test_global_dir_parse_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("auth.toml"), "token = [broken\n").unwrap();

        let result = ConfigBuilder::new().with_global_dir(Some(dir.path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_dir_ends_with_billing() {
        assert!(default_config_dir().ends_with("billing"));
    }

    #[test]
    fn test_scope_prefers_team() {
        let config = CliConfig {
            team: Some("acme".to_string()),
            user: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.scope(), Scope::Team("acme".to_string()));

        let config = CliConfig {
            user: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.scope(), Scope::User("jane@example.com".to_string()));

        let config = CliConfig::default();
        assert_eq!(config.scope(), Scope::User("your account".to_string()));
    }

    #[test]
    fn test_require_token() {
        assert!(CliConfig::default().require_token().is_err());

        let config = CliConfig {
            token: Some("tok_secret".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_token().unwrap(), "tok_secret");
    }
}
