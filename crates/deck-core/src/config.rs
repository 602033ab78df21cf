//! Config - TOML 設定の読み込み
//!
//! すべての項目に既定値があるので、設定ファイルがなくても動きます。
//!
//! # 探索順
//! 1. 明示的に渡されたパス
//! 2. 環境変数 `DECK_CONFIG`
//! 3. 既定値

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_DECK_CONFIG: &str = "DECK_CONFIG";

const DEFAULT_NAME_MAX_LEN: usize = 32;
const DEFAULT_RECENT_JOBS_LIMIT: u32 = 10;
const DEFAULT_GATEWAY_LATENCY_MS: u64 = 0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub tour: TourConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// 名前入力欄の最大文字数
    #[serde(default = "default_name_max_len")]
    pub name_max_len: usize,
    /// ジョブ popover に出す最新件数
    #[serde(default = "default_recent_jobs_limit")]
    pub recent_jobs_limit: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name_max_len: DEFAULT_NAME_MAX_LEN,
            recent_jobs_limit: DEFAULT_RECENT_JOBS_LIMIT,
        }
    }
}

/// in-memory Gateway 用（本物の Gateway は自前の設定を持つ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_latency_ms")]
    pub latency_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_GATEWAY_LATENCY_MS,
        }
    }
}

impl GatewayConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TourConfig {
    /// ガイド完了状態の保存先。None ならプロセス内だけで保持
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

fn default_name_max_len() -> usize {
    DEFAULT_NAME_MAX_LEN
}

fn default_recent_jobs_limit() -> u32 {
    DEFAULT_RECENT_JOBS_LIMIT
}

fn default_gateway_latency_ms() -> u64 {
    DEFAULT_GATEWAY_LATENCY_MS
}

impl DeckConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: DeckConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// 明示パス → `DECK_CONFIG` → 既定値 の順に解決
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match std::env::var_os(ENV_DECK_CONFIG) {
            Some(path) if !path.is_empty() => Self::from_path(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.list.name_max_len == 0 {
            return Err(ConfigError::Invalid("list.name_max_len must be greater than 0".into()));
        }
        if self.list.recent_jobs_limit == 0 {
            return Err(ConfigError::Invalid(
                "list.recent_jobs_limit must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
