use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HeartspaceError, Result};

/// Top-level configuration for the HeartSpace application.
///
/// Loaded from `~/.heartspace/config.toml` by default. Every section falls
/// back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartspaceConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub heartbot: HeartBotConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub community: CommunityConfig,
}

impl HeartspaceConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed values are inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HeartspaceConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject settings that would break runtime invariants.
    pub fn validate(&self) -> Result<()> {
        if self.heartbot.typing_delay_min_ms > self.heartbot.typing_delay_max_ms {
            return Err(HeartspaceError::Config(format!(
                "heartbot.typing_delay_min_ms ({}) exceeds typing_delay_max_ms ({})",
                self.heartbot.typing_delay_min_ms, self.heartbot.typing_delay_max_ms
            )));
        }
        if self.heartbot.max_message_length == 0 {
            return Err(HeartspaceError::Config(
                "heartbot.max_message_length must be greater than zero".to_string(),
            ));
        }
        if self.auth.rate_limit_per_sec == 0 {
            return Err(HeartspaceError::Config(
                "auth.rate_limit_per_sec must be greater than zero".to_string(),
            ));
        }
        if self.media.max_upload_bytes == 0 {
            return Err(HeartspaceError::Config(
                "media.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database and uploaded media.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP port the API listens on.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.heartspace/data".to_string(),
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

impl GeneralConfig {
    /// Resolve `data_dir`, expanding a leading `~` to the home directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        let raw = self.data_dir.as_str();
        if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
            let home_var = if cfg!(target_os = "windows") {
                "USERPROFILE"
            } else {
                "HOME"
            };
            if let Ok(home) = std::env::var(home_var) {
                return PathBuf::from(home).join(rest);
            }
        }
        PathBuf::from(raw)
    }
}

/// HeartBot chat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartBotConfig {
    /// Whether the chat endpoints accept messages.
    pub enabled: bool,
    /// Lower bound of the simulated typing delay in milliseconds.
    pub typing_delay_min_ms: u64,
    /// Upper bound of the simulated typing delay in milliseconds.
    pub typing_delay_max_ms: u64,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Idle minutes after which a chat session is discarded.
    pub session_timeout_minutes: u32,
}

impl Default for HeartBotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            typing_delay_min_ms: 1000,
            typing_delay_max_ms: 3000,
            max_message_length: 2000,
            session_timeout_minutes: 30,
        }
    }
}

impl HeartBotConfig {
    /// A configuration with no typing delay, for tests and scripted use.
    pub fn instant() -> Self {
        Self {
            typing_delay_min_ms: 0,
            typing_delay_max_ms: 0,
            ..Self::default()
        }
    }

    pub fn typing_delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.typing_delay_min_ms),
            Duration::from_millis(self.typing_delay_max_ms),
        )
    }
}

/// Account and session-token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minimum password length accepted at sign-up.
    pub min_password_length: usize,
    /// Lifetime of an issued bearer token in hours.
    pub token_ttl_hours: u32,
    /// Sign-up and login requests accepted per second across all clients.
    pub rate_limit_per_sec: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            token_ttl_hours: 24 * 7,
            rate_limit_per_sec: 10,
        }
    }
}

/// Media upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Uploads larger than this are rejected before anything is written.
    pub max_upload_bytes: usize,
    /// Subdirectory of the data directory holding uploaded files.
    pub dir_name: String,
    /// Accepted file extensions (lowercase, without the dot).
    pub allowed_extensions: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            dir_name: "media".to_string(),
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Community content configuration (affirmations, gratitude, comments).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Maximum length in characters of a post or comment body.
    pub max_content_length: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            max_content_length: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = HeartspaceConfig::default();
        assert_eq!(config.general.data_dir, "~/.heartspace/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.port, 3040);
        assert!(config.heartbot.enabled);
        assert_eq!(config.heartbot.typing_delay_min_ms, 1000);
        assert_eq!(config.heartbot.typing_delay_max_ms, 3000);
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.auth.rate_limit_per_sec, 10);
        assert_eq!(config.media.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.community.max_content_length, 1000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/srv/heartspace"
log_level = "debug"
port = 9000

[heartbot]
enabled = false
typing_delay_min_ms = 0
typing_delay_max_ms = 250
max_message_length = 500
session_timeout_minutes = 5

[auth]
min_password_length = 10
token_ttl_hours = 1

[media]
max_upload_bytes = 1024
dir_name = "uploads"
allowed_extensions = ["png"]
"#;
        let file = create_temp_config(content);
        let config = HeartspaceConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/srv/heartspace");
        assert_eq!(config.general.port, 9000);
        assert!(!config.heartbot.enabled);
        assert_eq!(config.heartbot.typing_delay_max_ms, 250);
        assert_eq!(config.heartbot.max_message_length, 500);
        assert_eq!(config.auth.min_password_length, 10);
        assert_eq!(config.media.dir_name, "uploads");
        assert_eq!(config.media.allowed_extensions, vec!["png"]);
        // Omitted section falls back to defaults.
        assert_eq!(config.community.max_content_length, 1000);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = HeartspaceConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.port, 3040);
        assert_eq!(config.heartbot.session_timeout_minutes, 30);
    }

    #[test]
    fn test_load_rejects_inverted_delay_range() {
        let content = r#"
[heartbot]
typing_delay_min_ms = 500
typing_delay_max_ms = 100
"#;
        let file = create_temp_config(content);
        let err = HeartspaceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, HeartspaceError::Config(_)));
        assert!(err.to_string().contains("typing_delay_min_ms"));
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[general\nport = ");
        let err = HeartspaceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, HeartspaceError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = HeartspaceConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.heartspace/data");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = HeartspaceConfig::default();
        config.general.port = 4242;
        config.heartbot.typing_delay_min_ms = 5;
        config.heartbot.typing_delay_max_ms = 10;
        config.save(&path).unwrap();

        let reloaded = HeartspaceConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.port, 4242);
        assert_eq!(reloaded.heartbot.typing_delay_min_ms, 5);
        assert_eq!(reloaded.heartbot.typing_delay_max_ms, 10);
        assert_eq!(
            reloaded.media.allowed_extensions,
            config.media.allowed_extensions
        );
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = HeartspaceConfig::default();
        config.heartbot.typing_delay_max_ms = 10;
        assert!(matches!(config.save(&path), Err(HeartspaceError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_instant_heartbot_config_has_zero_delay() {
        let cfg = HeartBotConfig::instant();
        let (min, max) = cfg.typing_delay_range();
        assert_eq!(min, Duration::ZERO);
        assert_eq!(max, Duration::ZERO);
        assert!(cfg.enabled);
    }

    #[test]
    fn test_resolved_data_dir_absolute_untouched() {
        let general = GeneralConfig {
            data_dir: "/var/lib/heartspace".to_string(),
            ..GeneralConfig::default()
        };
        assert_eq!(
            general.resolved_data_dir(),
            PathBuf::from("/var/lib/heartspace")
        );
    }

    #[test]
    fn test_resolved_data_dir_expands_home() {
        let general = GeneralConfig::default();
        let resolved = general.resolved_data_dir();
        assert!(resolved.ends_with(".heartspace/data") || resolved.ends_with(".heartspace\\data"));
        assert!(!resolved.to_string_lossy().starts_with('~') || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = HeartspaceConfig::default();
        config.media.max_upload_bytes = 0;
        assert!(config.validate().is_err());
    }
}
