#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::domain::model::Region;
use crate::domain::services::regions::default_regions;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 快取最長保存一週
pub const MAX_CACHE_TTL_MINUTES: u64 = 7 * 24 * 60;

pub const DEFAULT_SKILLS: [&str; 12] = [
    "Java",
    "Spring Boot",
    "Vue.js",
    "JPA",
    "Node.js",
    "React",
    "JavaScript",
    "TypeScript",
    "Oracle",
    "MySQL",
    "Docker",
    "AWS",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub cache_ttl_minutes: u64,
    pub cache_capacity: usize,
    pub request_timeout_ms: u64,
    pub filter_limit: usize,
    pub top_matches_per_region: usize,
    pub user_agent: String,
    pub default_skills: Vec<String>,
    pub default_regions: Vec<Region>,
    pub sources: SourcesConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 30,
            cache_capacity: 50,
            request_timeout_ms: 10_000,
            filter_limit: 20,
            top_matches_per_region: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            default_regions: default_regions(),
            sources: SourcesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub saramin: SourceSettings,
    pub wanted: SourceSettings,
    pub jobkorea: SourceSettings,
    pub jumpit: SourceSettings,
    pub linkedin: LinkedInSettings,
    pub wishket: SourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub enabled: bool,
    /// 覆寫來源網址（測試或鏡像站）
    pub base_url: Option<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

impl SourceSettings {
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedInMode {
    /// 只產生搜尋連結，不抓取
    #[default]
    LinkOnly,
    Scrape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInSettings {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub mode: LinkedInMode,
}

impl Default for LinkedInSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            mode: LinkedInMode::LinkOnly,
        }
    }
}

impl LinkedInSettings {
    pub fn as_source_settings(&self) -> SourceSettings {
        SourceSettings {
            enabled: self.enabled,
            base_url: self.base_url.clone(),
        }
    }
}

impl SearchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 預設值，再以環境變數覆寫
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 讀取 TOML 檔（可省略），再套用環境變數並驗證
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(ttl) = env_number("JOB_SEARCH_CACHE_TTL_MINUTES")? {
            self.cache_ttl_minutes = ttl;
        }
        if let Some(capacity) = env_number("JOB_SEARCH_CACHE_CAPACITY")? {
            self.cache_capacity = capacity as usize;
        }
        if let Some(timeout) = env_number("JOB_SEARCH_REQUEST_TIMEOUT_MS")? {
            self.request_timeout_ms = timeout;
        }
        Ok(())
    }

    fn source_base_urls(&self) -> Vec<(&'static str, Option<&String>)> {
        vec![
            ("sources.saramin.base_url", self.sources.saramin.base_url.as_ref()),
            ("sources.wanted.base_url", self.sources.wanted.base_url.as_ref()),
            ("sources.jobkorea.base_url", self.sources.jobkorea.base_url.as_ref()),
            ("sources.jumpit.base_url", self.sources.jumpit.base_url.as_ref()),
            ("sources.linkedin.base_url", self.sources.linkedin.base_url.as_ref()),
            ("sources.wishket.base_url", self.sources.wishket.base_url.as_ref()),
        ]
    }
}

fn env_number(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| SearchError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> Result<()> {
        validate_range("cache_ttl_minutes", self.cache_ttl_minutes, 1, MAX_CACHE_TTL_MINUTES)?;
        validate_positive_number("cache_capacity", self.cache_capacity as u64, 1)?;
        validate_range("request_timeout_ms", self.request_timeout_ms, 100, 120_000)?;
        validate_range("filter_limit", self.filter_limit, 1, 100)?;
        validate_positive_number("top_matches_per_region", self.top_matches_per_region as u64, 1)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;

        for region in &self.default_regions {
            validate_non_empty_string("default_regions.name", &region.name)?;
        }

        for (field, base_url) in self.source_base_urls() {
            if let Some(url) = base_url {
                validate_url(field, url)?;
            }
        }

        tracing::debug!("Search configuration validation passed");
        Ok(())
    }
}
