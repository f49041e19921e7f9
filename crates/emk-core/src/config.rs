use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::storage::FilenameFormat;

/// Default wrapper API that renders a combination from two emoji in the URL path.
pub const DEFAULT_API_BASE_URL: &str = "https://emojik.vercel.app";

/// Default location of the combination catalog.
pub const DEFAULT_METADATA_URL: &str =
    "https://raw.githubusercontent.com/xsalazar/emoji-kitchen-backend/main/app/metadata.json";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per image (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Rejects a base delay that is negative, NaN, or too large for a `Duration`.
    pub fn validate(&self) -> Result<()> {
        if self.base_delay_secs.is_nan() || self.base_delay_secs < 0.0 {
            anyhow::bail!("retry.base_delay_secs must be >= 0, got {}", self.base_delay_secs);
        }
        Duration::try_from_secs_f64(self.base_delay_secs).map_err(|_| {
            anyhow::anyhow!("retry.base_delay_secs out of range: {}", self.base_delay_secs)
        })?;
        Ok(())
    }

    /// Out-of-range base delays that slipped past [`RetryConfig::validate`]
    /// fall back to `max_delay_secs`.
    pub fn to_policy(&self) -> RetryPolicy {
        let max_delay = Duration::from_secs(self.max_delay_secs);
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }
}

/// Global configuration loaded from `~/.config/emk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmkConfig {
    /// Where images are written. Relative paths resolve against the working directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Where session ledgers (successes/failures/summary JSON) are written.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Requested image size in pixels.
    pub size: u32,
    /// Maximum number of downloads in flight.
    pub max_concurrent: usize,
    /// Minimum spacing between request starts, in milliseconds.
    pub delay_ms: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Skip pairs whose image is already on disk.
    pub skip_existing: bool,
    #[serde(default)]
    pub filename_format: FilenameFormat,
    pub api_base_url: String,
    pub metadata_url: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for EmkConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            log_dir: None,
            size: 512,
            max_concurrent: 50,
            delay_ms: 100,
            timeout_secs: 15,
            skip_existing: true,
            filename_format: FilenameFormat::Auto,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            retry: None,
        }
    }
}

impl EmkConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("emoji-kitchen"))
    }

    /// Session ledger directory: configured value or `~/.local/state/emk/sessions`.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(state_dir()?.join("sessions")),
        }
    }
}

/// `~/.local/state/emk`.
pub fn state_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("emk")?;
    Ok(xdg_dirs.get_state_home())
}

/// `~/.cache/emk`, home of the cached metadata catalog.
pub fn cache_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("emk")?;
    Ok(xdg_dirs.get_cache_home())
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("emk")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EmkConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<EmkConfig> {
    if !path.exists() {
        let default_cfg = EmkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: EmkConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    if let Some(retry) = &cfg.retry {
        retry
            .validate()
            .with_context(|| format!("parse config: {}", path.display()))?;
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = EmkConfig::default();
        assert_eq!(cfg.size, 512);
        assert_eq!(cfg.max_concurrent, 50);
        assert_eq!(cfg.delay_ms, 100);
        assert!(cfg.skip_existing);
        assert_eq!(cfg.filename_format, FilenameFormat::Auto);
        assert_eq!(cfg.output_dir(), PathBuf::from("emoji-kitchen"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = EmkConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EmkConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.size, cfg.size);
        assert_eq!(parsed.api_base_url, cfg.api_base_url);
        assert_eq!(parsed.metadata_url, cfg.metadata_url);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            output_dir = "/tmp/emoji"
            size = 128
            max_concurrent = 8
            delay_ms = 25
            timeout_secs = 5
            skip_existing = false
            filename_format = "codepoint"
            api_base_url = "http://127.0.0.1:9000"
            metadata_url = "http://127.0.0.1:9000/metadata.json"
        "#;
        let cfg: EmkConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir(), PathBuf::from("/tmp/emoji"));
        assert_eq!(cfg.size, 128);
        assert_eq!(cfg.max_concurrent, 8);
        assert_eq!(cfg.delay(), Duration::from_millis(25));
        assert!(!cfg.skip_existing);
        assert_eq!(cfg.filename_format, FilenameFormat::Codepoint);
        assert!(cfg.retry.is_none());
        assert_eq!(cfg.retry_policy().max_attempts, 3);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            size = 512
            max_concurrent = 50
            delay_ms = 100
            timeout_secs = 15
            skip_existing = true
            api_base_url = "https://emojik.vercel.app"
            metadata_url = "https://example.com/metadata.json"

            [retry]
            max_attempts = 5
            base_delay_secs = 0.25
            max_delay_secs = 30
        "#;
        let cfg: EmkConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(30));
    }

    const HUGE_DELAY: &str = r#"
        size = 512
        max_concurrent = 50
        delay_ms = 100
        timeout_secs = 15
        skip_existing = true
        api_base_url = "https://emojik.vercel.app"
        metadata_url = "https://example.com/metadata.json"

        [retry]
        max_attempts = 3
        base_delay_secs = inf
        max_delay_secs = 10
    "#;

    #[test]
    fn unrepresentable_base_delay_is_clamped_not_panicking() {
        let cfg: EmkConfig = toml::from_str(HUGE_DELAY).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.base_delay, Duration::from_secs(10));
        assert_eq!(policy.max_delay, Duration::from_secs(10));

        let nan = RetryConfig {
            base_delay_secs: f64::NAN,
            ..RetryConfig::default()
        };
        assert_eq!(nan.to_policy().base_delay, Duration::ZERO);
        assert!(nan.validate().is_err());
        let huge = RetryConfig {
            base_delay_secs: 1e30,
            ..RetryConfig::default()
        };
        assert_eq!(huge.to_policy().base_delay, Duration::from_secs(10));
        assert!(huge.validate().is_err());
    }

    #[test]
    fn load_rejects_out_of_range_retry_delay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, HUGE_DELAY).unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("parse config"), "{}", msg);
        assert!(msg.contains("base_delay_secs"), "{}", msg);

        std::fs::write(&path, HUGE_DELAY.replace("inf", "-1.0")).unwrap();
        assert!(load_or_init_at(&path).is_err());
        std::fs::write(&path, HUGE_DELAY.replace("inf", "0.25")).unwrap();
        assert!(load_or_init_at(&path).is_ok());
    }

    #[test]
    fn load_or_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.size, 512);
        let again = load_or_init_at(&path).unwrap();
        assert_eq!(again.max_concurrent, cfg.max_concurrent);
    }
}
