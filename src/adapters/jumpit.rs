use crate::adapters::wanted::experience_range;
use crate::adapters::{build_url, distinct, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const JUMPIT_API_URL: &str = "https://api.jumpit.co.kr";
pub const JUMPIT_WEB_URL: &str = "https://jumpit.saramin.co.kr";

const SOURCE_ID: &str = "jumpit";
const DISPLAY_NAME: &str = "점핏";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

#[derive(Debug, Deserialize)]
struct PositionsResponse {
    result: Option<PositionsResult>,
}

#[derive(Debug, Deserialize)]
struct PositionsResult {
    positions: Option<Vec<Position>>,
}

// API 會對任一欄位回傳 null，全部以 Option 接收
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Position {
    id: Option<u64>,
    title: Option<String>,
    company_name: Option<String>,
    locations: Option<Vec<String>>,
    tech_stacks: Option<Vec<String>>,
    min_career: Option<u32>,
    max_career: Option<u32>,
    always_open: Option<bool>,
    closed_at: Option<String>,
    job_category: Option<String>,
}

/// 점핏：API 與網頁網域不同，base_url 覆寫只作用於 API
pub struct JumpitSource {
    fetcher: HttpFetcher,
    api_url: String,
}

impl JumpitSource {
    pub fn new(fetcher: HttpFetcher, api_url: String) -> Self {
        Self { fetcher, api_url }
    }

    async fn search_term(&self, query: &str) -> Result<Vec<Listing>> {
        let url = build_url(
            &self.api_url,
            "/api/positions",
            &[("sort", "rsp_rate"), ("keyword", query), ("page", "1"), ("limit", "30")],
        );
        let response: PositionsResponse = self.fetcher.get_json(SOURCE_ID, &url).await?;

        Ok(response
            .result
            .and_then(|r| r.positions)
            .unwrap_or_default()
            .into_iter()
            .filter_map(map_position)
            .filter(|listing| !listing.title.is_empty())
            .collect())
    }
}

#[async_trait]
impl JobSource for JumpitSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        build_url(JUMPIT_WEB_URL, "/positions", &[("keyword", keyword)])
    }

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);
        let mut terms = distinct(
            regions
                .iter()
                .map(|region| format!("{} {}", keyword, region.search_keyword())),
        );
        if terms.is_empty() {
            terms.push(keyword.to_string());
        }

        let results = join_all(terms.iter().map(|term| self.search_term(term))).await;
        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

/// 沒有 id 就組不出公告網址，整筆略過
fn map_position(position: Position) -> Option<Listing> {
    let id = position.id?;
    let mut listing = Listing::new(
        SOURCE_ID,
        position.title.as_deref().unwrap_or_default().trim(),
        position.company_name.as_deref().unwrap_or_default().trim(),
        &format!("{}/position/{}", JUMPIT_WEB_URL, id),
    );

    listing.location = position.locations.unwrap_or_default().join(", ");
    listing.tech_stacks = position
        .tech_stacks
        .unwrap_or_default()
        .iter()
        .map(|t| strip_tags(t))
        .filter(|t| !t.is_empty())
        .collect();
    listing.experience_text = experience_range(position.min_career, position.max_career);
    listing.deadline = if position.always_open.unwrap_or_default() {
        "상시채용".to_string()
    } else {
        position
            .closed_at
            .as_deref()
            .and_then(|closed| closed.split('T').next())
            .unwrap_or_default()
            .to_string()
    };
    if let Some(category) = position.job_category.as_deref() {
        listing.insert_detail("jobCategory", category);
    }
    Some(listing)
}
