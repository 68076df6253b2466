//! CLI argument definitions for the HeartSpace server.
//!
//! Priority resolution: CLI args > `HEARTSPACE_*` env vars > config file >
//! defaults.

use clap::Parser;
use std::path::PathBuf;

/// HeartSpace: a wellness companion for journaling, mood tracking,
/// community affirmations and the HeartBot chat.
#[derive(Parser, Debug)]
#[command(name = "heartspace", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Data directory for the database and uploaded media.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Disable the HeartBot chat endpoints.
    #[arg(long = "no-heartbot")]
    pub no_heartbot: bool,
}

impl CliArgs {
    /// Priority: --config > HEARTSPACE_CONFIG > ~/.heartspace/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HEARTSPACE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --port > HEARTSPACE_PORT > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        let env = std::env::var("HEARTSPACE_PORT").ok();
        self.port
            .or_else(|| env.and_then(|v| v.parse().ok()))
            .unwrap_or(config_port)
    }

    /// Priority: --data-dir > HEARTSPACE_DATA_DIR. `None` keeps the config value.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| std::env::var("HEARTSPACE_DATA_DIR").ok())
    }

    /// Priority: --log-level > HEARTSPACE_LOG_LEVEL. `None` keeps the config value.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level
            .clone()
            .or_else(|| std::env::var("HEARTSPACE_LOG_LEVEL").ok())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    let home_var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    match std::env::var(home_var) {
        Ok(home) => PathBuf::from(home).join(".heartspace").join("config.toml"),
        Err(_) => PathBuf::from("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = CliArgs::parse_from([
            "heartspace",
            "-c",
            "/tmp/hs.toml",
            "--port",
            "8080",
            "--data-dir",
            "/srv/hs",
            "-l",
            "debug",
            "--no-heartbot",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/hs.toml"));
        assert_eq!(args.resolve_port(3040), 8080);
        assert_eq!(args.resolve_data_dir().as_deref(), Some("/srv/hs"));
        assert_eq!(args.resolve_log_level().as_deref(), Some("debug"));
        assert!(args.no_heartbot);
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = CliArgs::parse_from(["heartspace"]);
        assert!(args.config.is_none());
        assert!(!args.no_heartbot);
        if std::env::var("HEARTSPACE_PORT").is_err() {
            assert_eq!(args.resolve_port(3040), 3040);
        }
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(CliArgs::try_parse_from(["heartspace", "--port", "70000"]).is_err());
    }
}
