// Adapters layer: one JobSource per external job board, plus the shared HTTP / HTML helpers.

pub mod html;
pub mod http;
pub mod jobkorea;
pub mod jumpit;
pub mod linkedin;
pub mod saramin;
pub mod wanted;
pub mod wishket;

use crate::config::SearchConfig;
use crate::domain::model::{Listing, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::{Result, SearchError};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

pub use http::HttpFetcher;
pub use jobkorea::JobKoreaSource;
pub use jumpit::JumpitSource;
pub use linkedin::LinkedInSource;
pub use saramin::SaraminSource;
pub use wanted::WantedSource;
pub use wishket::WishketSource;

/// 沒有任何技能時使用的搜尋關鍵字
pub const FALLBACK_KEYWORD: &str = "Java";

/// 依設定建立所有啟用中的來源，共用同一個 HTTP client
pub fn default_sources(config: &SearchConfig) -> Result<Vec<Arc<dyn JobSource>>> {
    let fetcher = HttpFetcher::new(config)?;
    let sources = &config.sources;
    let mut registry: Vec<Arc<dyn JobSource>> = Vec::new();

    if sources.saramin.enabled {
        registry.push(Arc::new(SaraminSource::new(
            fetcher.clone(),
            sources.saramin.base_url_or(saramin::SARAMIN_BASE_URL),
        )));
    }
    if sources.wanted.enabled {
        registry.push(Arc::new(WantedSource::new(
            fetcher.clone(),
            sources.wanted.base_url_or(wanted::WANTED_BASE_URL),
        )));
    }
    if sources.jobkorea.enabled {
        registry.push(Arc::new(JobKoreaSource::new(
            fetcher.clone(),
            sources.jobkorea.base_url_or(jobkorea::JOBKOREA_BASE_URL),
        )));
    }
    if sources.jumpit.enabled {
        registry.push(Arc::new(JumpitSource::new(
            fetcher.clone(),
            sources.jumpit.base_url_or(jumpit::JUMPIT_API_URL),
        )));
    }
    if sources.linkedin.enabled {
        registry.push(Arc::new(LinkedInSource::new(
            fetcher.clone(),
            sources
                .linkedin
                .as_source_settings()
                .base_url_or(linkedin::LINKEDIN_BASE_URL),
            sources.linkedin.mode,
        )));
    }
    if sources.wishket.enabled {
        registry.push(Arc::new(WishketSource::new(
            fetcher,
            sources.wishket.base_url_or(wishket::WISHKET_BASE_URL),
        )));
    }

    tracing::info!("🧩 {} job sources enabled", registry.len());
    Ok(registry)
}

pub fn primary_keyword(skills: &[String]) -> &str {
    skills
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_KEYWORD)
}

/// 組出帶查詢參數的網址；base 無法解析時退回未編碼的字串
pub fn build_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> String {
    let raw = format!("{}{}", base_url, path);
    match Url::parse_with_params(&raw, params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("Invalid base URL '{}': {}", raw, e);
            raw
        }
    }
}

/// 保留順序去除重複
pub(crate) fn distinct<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// 合併各地區查詢結果並以 URL 去重；失敗的查詢只記錄，不中斷其他地區
pub(crate) fn merge_region_results(
    source_id: &str,
    results: Vec<Result<Vec<Listing>>>,
) -> (Vec<Listing>, Vec<SearchError>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(batch) => {
                for listing in batch {
                    if seen.insert(listing.url.clone()) {
                        listings.push(listing);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(source = source_id, "⚠️ Region query failed: {}", e);
                errors.push(e);
            }
        }
    }

    (listings, errors)
}

/// 依收集結果產生 SourceResult：有職缺即為 ok，否則回報第一個錯誤或空結果訊息
pub(crate) fn finish(
    source_id: &str,
    display_name: &str,
    search_url: String,
    listings: Vec<Listing>,
    errors: Vec<SearchError>,
) -> SourceResult {
    if !listings.is_empty() {
        tracing::info!(
            source = source_id,
            failed_queries = errors.len(),
            "✅ Collected {} listings",
            listings.len()
        );
        return SourceResult::ok(source_id, display_name, search_url, listings);
    }

    let message = match errors.first() {
        Some(e) => e.user_friendly_message(),
        None => "검색 결과가 없습니다".to_string(),
    };
    tracing::warn!(source = source_id, "No listings collected: {}", message);
    SourceResult::error(source_id, display_name, search_url, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(url: &str) -> Listing {
        Listing::new("test", "title", "company", url)
    }

    #[test]
    fn test_primary_keyword() {
        assert_eq!(primary_keyword(&[]), "Java");
        assert_eq!(primary_keyword(&[" ".to_string(), "Rust".to_string()]), "Rust");
    }

    #[test]
    fn test_build_url_encodes_params() {
        let url = build_url("https://example.com", "/search", &[("q", "Java 대전"), ("page", "1")]);
        assert!(url.starts_with("https://example.com/search?q=Java+"));
        assert!(url.ends_with("&page=1"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(distinct(items), vec!["b", "a"]);
    }

    #[test]
    fn test_merge_region_results_dedups_and_collects_errors() {
        let results = vec![
            Ok(vec![listing("https://1"), listing("https://2")]),
            Err(SearchError::UpstreamStatus {
                source_id: "test".to_string(),
                status: 503,
            }),
            Ok(vec![listing("https://2"), listing("https://3")]),
        ];

        let (listings, errors) = merge_region_results("test", results);

        let urls: Vec<&str> = listings.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://1", "https://2", "https://3"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_finish_variants() {
        let ok = finish("test", "Test", "https://s".to_string(), vec![listing("https://1")], vec![]);
        assert_eq!(ok.status(), "ok");

        let failed = finish(
            "test",
            "Test",
            "https://s".to_string(),
            vec![],
            vec![SearchError::UpstreamStatus {
                source_id: "test".to_string(),
                status: 403,
            }],
        );
        assert_eq!(failed.status(), "error");
        assert_eq!(failed.search_url, "https://s");

        let empty = finish("test", "Test", "https://s".to_string(), vec![], vec![]);
        assert_eq!(
            empty.outcome,
            crate::domain::model::SourceOutcome::Error {
                message: "검색 결과가 없습니다".to_string()
            }
        );
    }
}
