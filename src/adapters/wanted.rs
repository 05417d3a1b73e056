use crate::adapters::{build_url, distinct, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

pub const WANTED_BASE_URL: &str = "https://www.wanted.co.kr";

const SOURCE_ID: &str = "wanted";
const DISPLAY_NAME: &str = "원티드";
const PAGE_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
struct JobsResponse {
    data: Option<Vec<WantedJob>>,
}

#[derive(Debug, Deserialize)]
struct WantedJob {
    id: Option<u64>,
    position: Option<String>,
    company: Option<WantedCompany>,
    address: Option<WantedAddress>,
    annual_from: Option<u32>,
    annual_to: Option<u32>,
    due_time: Option<String>,
    reward: Option<WantedReward>,
}

#[derive(Debug, Deserialize)]
struct WantedCompany {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WantedAddress {
    full_location: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WantedReward {
    formatted_total: Option<String>,
}

/// 원티드：呼叫 /api/v4/jobs JSON API，關鍵字本身加上每個地區各查一次
pub struct WantedSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl WantedSource {
    pub fn new(fetcher: HttpFetcher, base_url: String) -> Self {
        Self { fetcher, base_url }
    }

    fn api_url(&self, query: &str) -> String {
        build_url(
            &self.base_url,
            "/api/v4/jobs",
            &[
                ("country", "kr"),
                ("tag_type_ids", "518"),
                ("job_sort", "job.latest_order"),
                ("locations", "all"),
                ("years", "-1"),
                ("limit", PAGE_LIMIT),
                ("offset", "0"),
                ("query", query),
            ],
        )
    }

    async fn search_term(&self, query: &str) -> Result<Vec<Listing>> {
        let response: JobsResponse = self.fetcher.get_json(SOURCE_ID, &self.api_url(query)).await?;
        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|job| map_job(&self.base_url, job))
            .filter(|listing| !listing.title.is_empty())
            .collect())
    }
}

#[async_trait]
impl JobSource for WantedSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        build_url(&self.base_url, "/search", &[("query", keyword), ("tab", "position")])
    }

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);
        let terms = distinct(
            std::iter::once(keyword.to_string()).chain(
                regions
                    .iter()
                    .map(|region| format!("{} {}", keyword, region.search_keyword())),
            ),
        );

        let results = join_all(terms.iter().map(|term| self.search_term(term))).await;
        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

/// 年資範圍：起始為 0 時顯示 신입
pub(crate) fn experience_range(from: Option<u32>, to: Option<u32>) -> String {
    match (from, to) {
        (Some(0), Some(to)) => format!("신입~{}년", to),
        (Some(from), Some(to)) => format!("{}~{}년", from, to),
        _ => String::new(),
    }
}

fn date_part(timestamp: &str) -> String {
    timestamp.split('T').next().unwrap_or_default().to_string()
}

fn map_job(base_url: &str, job: WantedJob) -> Option<Listing> {
    let id = job.id?;
    let company = job.company.and_then(|c| c.name).unwrap_or_default();
    let mut listing = Listing::new(
        SOURCE_ID,
        job.position.as_deref().unwrap_or_default().trim(),
        company.trim(),
        &format!("{}/wd/{}", base_url, id),
    );

    listing.location = job
        .address
        .and_then(|a| a.full_location.or(a.location))
        .unwrap_or_default();
    listing.experience_text = experience_range(job.annual_from, job.annual_to);
    listing.deadline = match job.due_time.as_deref() {
        Some(due) if !due.trim().is_empty() => date_part(due),
        _ => "상시채용".to_string(),
    };
    if let Some(total) = job.reward.and_then(|r| r.formatted_total) {
        listing.insert_detail("reward", &total);
    }
    Some(listing)
}
