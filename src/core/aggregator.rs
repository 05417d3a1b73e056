use crate::adapters::{default_sources, primary_keyword};
use crate::config::SearchConfig;
use crate::core::cache::{cache_key, SearchCache};
use crate::domain::model::{
    AggregateResult, CandidateProfile, Listing, Region, SearchRequest, SourceOutcome, SourceResult,
};
use crate::domain::ports::{JobSource, SystemTimeProvider};
use crate::domain::services::{
    default_region_buckets, filter_jobs_with, generate_search_keywords, select_top_matches,
    FilterPolicy, RegionBucket,
};
use crate::utils::error::{Result, SearchError};
use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// 聚合所有來源：並行查詢、依履歷過濾、挑出各地區的推薦職缺並快取結果
pub struct JobSearchService {
    sources: Vec<Arc<dyn JobSource>>,
    cache: SearchCache,
    config: SearchConfig,
    policy: FilterPolicy,
    buckets: Vec<RegionBucket>,
}

impl JobSearchService {
    pub fn new(sources: Vec<Arc<dyn JobSource>>, cache: SearchCache, config: SearchConfig) -> Self {
        Self {
            sources,
            cache,
            config,
            policy: FilterPolicy::default(),
            buckets: default_region_buckets(),
        }
    }

    /// 依設定建立正式環境使用的服務（真實來源 + 系統時鐘）
    pub fn from_config(config: SearchConfig) -> Result<Self> {
        let sources = default_sources(&config)?;
        if sources.is_empty() {
            return Err(SearchError::AggregationError {
                message: "no job sources enabled".to_string(),
            });
        }

        let cache = SearchCache::new(
            config.cache_ttl(),
            config.cache_capacity,
            Arc::new(SystemTimeProvider),
        );
        Ok(Self::new(sources, cache, config))
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_region_buckets(mut self, buckets: Vec<RegionBucket>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub async fn search(&self, request: SearchRequest) -> Result<AggregateResult> {
        let skills = self.effective_skills(&request);
        let regions = self.effective_regions(&request);
        let region_names: Vec<String> = regions.iter().map(|r| r.name.clone()).collect();

        let key = cache_key(&skills, &region_names);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::info!(skills = ?skills, "📦 Returning cached search result");
            return Ok(hit);
        }

        tracing::info!(
            sources = self.sources.len(),
            regions = regions.len(),
            "🔍 Searching with keyword '{}'",
            primary_keyword(&skills)
        );

        let outcomes = join_all(
            self.sources
                .iter()
                .map(|source| run_source(Arc::clone(source), &skills, &regions)),
        )
        .await;

        let sites: Vec<SourceResult> = outcomes
            .into_iter()
            .map(|site| self.apply_filter(site, request.profile.as_ref()))
            .collect();

        let pool: Vec<Listing> = sites
            .iter()
            .flat_map(|site| {
                site.jobs().iter().map(move |job| {
                    let mut job = job.clone();
                    job.source_name = Some(site.display_name.clone());
                    job
                })
            })
            .collect();
        let top_matches = select_top_matches(&pool, &self.buckets, self.config.top_matches_per_region);

        tracing::info!(
            pooled = pool.len(),
            top_matches = top_matches.len(),
            failed_sources = sites.iter().filter(|s| s.status() == "error").count(),
            "✅ Search completed"
        );

        let result = AggregateResult {
            sites,
            top_matches,
            searched_at: Utc::now(),
            skills_used: skills,
            locations_used: region_names,
            cached: false,
        };
        self.cache.insert(key, result.clone()).await;

        Ok(result)
    }

    /// 請求技能 → 履歷產生的關鍵字 → 設定的預設技能
    fn effective_skills(&self, request: &SearchRequest) -> Vec<String> {
        let requested: Vec<String> = request
            .skills
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !requested.is_empty() {
            return requested;
        }

        if let Some(profile) = &request.profile {
            let keywords = generate_search_keywords(profile);
            if !keywords.is_empty() {
                return keywords;
            }
        }

        self.config.default_skills.clone()
    }

    fn effective_regions(&self, request: &SearchRequest) -> Vec<Region> {
        if request.locations.is_empty() {
            self.config.default_regions.clone()
        } else {
            request.locations.clone()
        }
    }

    fn apply_filter(&self, site: SourceResult, profile: Option<&CandidateProfile>) -> SourceResult {
        let Some(profile) = profile else {
            return site;
        };

        let SourceResult {
            source,
            display_name,
            search_url,
            outcome,
        } = site;

        let outcome = match outcome {
            SourceOutcome::Ok { jobs, .. } if !jobs.is_empty() => {
                let filtered = filter_jobs_with(&jobs, profile, self.config.filter_limit, &self.policy);
                tracing::debug!(
                    source = %source,
                    scraped = jobs.len(),
                    kept = filtered.len(),
                    "Filtered listings"
                );
                SourceOutcome::Ok {
                    total_scraped: Some(jobs.len()),
                    filtered_count: Some(filtered.len()),
                    jobs: filtered,
                }
            }
            other => other,
        };

        SourceResult {
            source,
            display_name,
            search_url,
            outcome,
        }
    }
}

/// 單一來源 panic 時轉成該來源的 error 結果，不影響其他來源
async fn run_source(source: Arc<dyn JobSource>, skills: &[String], regions: &[Region]) -> SourceResult {
    match AssertUnwindSafe(source.search(skills, regions)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let cause = panic_message(panic.as_ref());
            tracing::error!(source = source.id(), "🚨 Source crashed: {}", cause);
            SourceResult::error(
                source.id(),
                source.display_name(),
                source.search_url(primary_keyword(skills)),
                format!("내부 오류: {}", cause),
            )
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CareerLevel, TechStack};
    use crate::domain::ports::TimeProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct StaticSource {
        id: &'static str,
        display_name: &'static str,
        listings: Vec<Listing>,
        calls: AtomicUsize,
        seen_skills: Mutex<Vec<String>>,
    }

    impl StaticSource {
        fn new(id: &'static str, display_name: &'static str, listings: Vec<Listing>) -> Self {
            Self {
                id,
                display_name,
                listings,
                calls: AtomicUsize::new(0),
                seen_skills: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl JobSource for StaticSource {
        fn id(&self) -> &str {
            self.id
        }

        fn display_name(&self) -> &str {
            self.display_name
        }

        fn search_url(&self, keyword: &str) -> String {
            format!("https://{}.test/search?q={}", self.id, keyword)
        }

        async fn search(&self, skills: &[String], _regions: &[Region]) -> SourceResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_skills.lock().unwrap() = skills.to_vec();
            SourceResult::ok(
                self.id,
                self.display_name,
                self.search_url(primary_keyword(skills)),
                self.listings.clone(),
            )
        }
    }

    struct PanickingSource;

    #[async_trait]
    impl JobSource for PanickingSource {
        fn id(&self) -> &str {
            "broken"
        }

        fn display_name(&self) -> &str {
            "Broken"
        }

        fn search_url(&self, keyword: &str) -> String {
            format!("https://broken.test/?q={}", keyword)
        }

        async fn search(&self, _skills: &[String], _regions: &[Region]) -> SourceResult {
            panic!("selector exploded")
        }
    }

    struct FixedClock(AtomicI64);

    impl TimeProvider for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn listing(source: &str, title: &str, location: &str, url: &str) -> Listing {
        let mut listing = Listing::new(source, title, "회사", url);
        listing.location = location.to_string();
        listing
    }

    fn profile(years: u32, primary: &[&str]) -> CandidateProfile {
        CandidateProfile {
            years_of_experience: years,
            career_level: CareerLevel::from_years(years),
            tech_stack: TechStack {
                primary: primary.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            preferred_roles: vec![],
            summary: String::new(),
        }
    }

    fn service(sources: Vec<Arc<dyn JobSource>>, clock: Arc<FixedClock>) -> JobSearchService {
        let config = SearchConfig::default();
        let cache = SearchCache::new(config.cache_ttl(), config.cache_capacity, clock);
        JobSearchService::new(sources, cache, config)
    }

    #[tokio::test]
    async fn test_second_search_is_served_from_cache() {
        let source = Arc::new(StaticSource::new(
            "saramin",
            "사람인",
            vec![listing("saramin", "Java 개발자", "대전 유성구", "https://s/1")],
        ));
        let clock = Arc::new(FixedClock(AtomicI64::new(0)));
        let service = service(vec![source.clone()], clock.clone());

        let request = SearchRequest {
            skills: vec!["Java".to_string()],
            ..Default::default()
        };
        let first = service.search(request.clone()).await.unwrap();
        let second = service.search(request.clone()).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.sites, second.sites);
        assert_eq!(first.top_matches, second.top_matches);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.0.store(Duration::from_secs(31 * 60).as_millis() as i64, Ordering::SeqCst);
        let third = service.search(request).await.unwrap();
        assert!(!third.cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_source_becomes_error() {
        let healthy = Arc::new(StaticSource::new(
            "wanted",
            "원티드",
            vec![listing("wanted", "Java 개발자", "세종", "https://w/1")],
        ));
        let clock = Arc::new(FixedClock(AtomicI64::new(0)));
        let service = service(vec![Arc::new(PanickingSource), healthy], clock);

        let result = service.search(SearchRequest::default()).await.unwrap();

        assert_eq!(result.sites.len(), 2);
        assert_eq!(result.sites[0].status(), "error");
        assert_eq!(result.sites[0].source, "broken");
        assert_eq!(result.sites[1].status(), "ok");
        assert_eq!(result.top_matches.len(), 1);
        assert_eq!(result.top_matches[0].source_name.as_deref(), Some("원티드"));
    }

    #[tokio::test]
    async fn test_profile_filters_and_annotates_counts() {
        let source = Arc::new(StaticSource::new(
            "jumpit",
            "점핏",
            vec![
                listing("jumpit", "Java 백엔드 개발자", "대전", "https://j/1"),
                listing("jumpit", "Python 데이터 엔지니어", "대전", "https://j/2"),
                listing("jumpit", "Java 개발자 (10년 이상)", "대전", "https://j/3"),
            ],
        ));
        let clock = Arc::new(FixedClock(AtomicI64::new(0)));
        let service = service(vec![source.clone()], clock);

        let request = SearchRequest {
            skills: vec![],
            locations: vec![],
            profile: Some(profile(2, &["Java"])),
        };
        let result = service.search(request).await.unwrap();

        match &result.sites[0].outcome {
            SourceOutcome::Ok {
                jobs,
                total_scraped,
                filtered_count,
            } => {
                assert_eq!(*total_scraped, Some(3));
                assert_eq!(*filtered_count, Some(1));
                assert_eq!(jobs[0].url, "https://j/1");
                assert_eq!(jobs[0].match_score, Some(100));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        // 沒有指定技能時使用履歷產生的關鍵字
        assert_eq!(result.skills_used, vec!["Java"]);
        assert_eq!(*source.seen_skills.lock().unwrap(), vec!["Java"]);
    }

    #[tokio::test]
    async fn test_defaults_are_used_without_request_values() {
        let source = Arc::new(StaticSource::new("saramin", "사람인", vec![]));
        let clock = Arc::new(FixedClock(AtomicI64::new(0)));
        let service = service(vec![source], clock);

        let result = service.search(SearchRequest::default()).await.unwrap();

        let config = SearchConfig::default();
        assert_eq!(result.skills_used, config.default_skills);
        assert_eq!(
            result.locations_used,
            vec!["경기도 성남시", "화성시", "기흥구", "세종시", "천안시", "대전"]
        );
        assert!(result.top_matches.is_empty());
    }

    #[tokio::test]
    async fn test_top_matches_have_unique_urls_across_sources() {
        let shared = "https://shared/1";
        let a = Arc::new(StaticSource::new(
            "a",
            "A",
            vec![listing("a", "판교 Java 개발", "경기 성남시 분당구", shared)],
        ));
        let b = Arc::new(StaticSource::new(
            "b",
            "B",
            vec![
                listing("b", "판교 Java 개발", "경기 성남시 분당구", shared),
                listing("b", "Java 개발", "천안시", "https://b/2"),
            ],
        ));
        let clock = Arc::new(FixedClock(AtomicI64::new(0)));
        let service = service(vec![a, b], clock);

        let result = service.search(SearchRequest::default()).await.unwrap();

        let urls: Vec<&str> = result.top_matches.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains(&shared));
        assert!(urls.contains(&"https://b/2"));
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(boxed.as_ref()), "static str");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
