use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classify::Requirement;
use crate::normalize::Loader;
use crate::retry::RetryPolicy;

/// Retry policy parameters (`[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per remote call (including the first).
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
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Remote catalog endpoint and matching parameters (`[catalog]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Search endpoint; the candidate name is sent as `query_param`.
    pub search_url: String,
    pub query_param: String,
    /// Regex matched against result hrefs to recognise detail pages.
    pub page_link_pattern: String,
    /// Minimum similarity (0.0..=1.0) a result title needs to be selected.
    pub similarity_threshold: f64,
    /// Per-call timeout for search and page fetches.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Remote calls allowed in flight across all pipelines.
    pub max_concurrent_requests: usize,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_url: "https://search.mcmod.cn/s".to_string(),
            query_param: "key".to_string(),
            page_link_pattern: r"mcmod\.cn/class/\d+\.html".to_string(),
            similarity_threshold: 0.6,
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
            max_concurrent_requests: 2,
            user_agent: concat!("modsort/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

/// Word lists used by the normalizer and the requirement extractor
/// (`[vocabulary]` section). Keys are matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Text that identifies the requirement section of a detail page.
    pub section_markers: Vec<String>,
    pub client_labels: Vec<String>,
    pub server_labels: Vec<String>,
    /// Loader token → loader tag.
    pub loaders: BTreeMap<String, Loader>,
    /// Field value text → requirement.
    pub requirements: BTreeMap<String, Requirement>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        let loaders = [
            ("forge", Loader::Forge),
            ("fabric", Loader::Fabric),
            ("neoforge", Loader::NeoForge),
            ("quilt", Loader::Quilt),
            ("rift", Loader::Rift),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let requirements = [
            ("需装", Requirement::Required),
            ("必需", Requirement::Required),
            ("必装", Requirement::Required),
            ("required", Requirement::Required),
            ("可选", Requirement::Optional),
            ("选装", Requirement::Optional),
            ("optional", Requirement::Optional),
            ("无效", Requirement::Invalid),
            ("无需", Requirement::Invalid),
            ("invalid", Requirement::Invalid),
            ("incompatible", Requirement::Invalid),
            ("unsupported", Requirement::Invalid),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            section_markers: vec!["运行环境".to_string(), "environment".to_string()],
            client_labels: vec!["客户端".to_string(), "client".to_string()],
            server_labels: vec![
                "服务端".to_string(),
                "服务器".to_string(),
                "server".to_string(),
            ],
            loaders,
            requirements,
        }
    }
}

/// Global configuration loaded from `~/.config/modsort/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModsortConfig {
    /// Maximum number of per-file pipelines in flight.
    pub max_concurrent_files: usize,
    /// Extensions (without dot, case-insensitive) treated as mod archives.
    pub archive_extensions: Vec<String>,
    pub catalog: CatalogConfig,
    pub retry: RetryConfig,
    pub vocabulary: VocabularyConfig,
}

impl Default for ModsortConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: 4,
            archive_extensions: vec!["jar".to_string()],
            catalog: CatalogConfig::default(),
            retry: RetryConfig::default(),
            vocabulary: VocabularyConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modsort")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ModsortConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ModsortConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<ModsortConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ModsortConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
