use std::path::{Path, PathBuf};
use std::time::Duration;

use origami_core::config::{DEFAULT_LOCKOUT, DEFAULT_MAX_FAILED_ATTEMPTS};
use origami_core::crypto::KdfParams;
use origami_core::GuardConfig;
use serde::{Deserialize, Serialize};

/// Idle timeout written by `origami init`.
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Serialize, Deserialize)]
pub struct OrigamiConfig {
    pub journal: JournalSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub kdf: KdfSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JournalSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    /// 0 disables the idle timeout
    pub idle_timeout_seconds: u64,
    /// 0 disables lockout
    pub max_failed_attempts: u32,
    pub lockout_seconds: u64,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: DEFAULT_IDLE_TIMEOUT_SECONDS,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout_seconds: DEFAULT_LOCKOUT.as_secs(),
        }
    }
}

/// Argon2id cost for newly created passwords.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfSection {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfSection {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl OrigamiConfig {
    pub fn new(journal_path: PathBuf) -> Self {
        Self {
            journal: JournalSection {
                path: journal_path.to_string_lossy().to_string(),
            },
            security: SecuritySection::default(),
            kdf: KdfSection::default(),
        }
    }

    /// Guard settings described by this config.
    pub fn guard_config(&self) -> anyhow::Result<GuardConfig> {
        let kdf = KdfParams::new(
            self.kdf.memory_kib,
            self.kdf.iterations,
            self.kdf.parallelism,
        );
        kdf.validate()
            .map_err(|e| anyhow::anyhow!("Invalid [kdf] section in config: {}", e))?;

        let idle_timeout = match self.security.idle_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(GuardConfig::default()
            .with_idle_timeout(idle_timeout)
            .with_lockout(
                self.security.max_failed_attempts,
                Duration::from_secs(self.security.lockout_seconds),
            )
            .with_kdf(kdf))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_journal_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("journal.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<OrigamiConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &OrigamiConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    origami_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("origami"));
        }
    }
    Ok(home_dir()?.join(".config").join("origami"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("origami"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("origami"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
