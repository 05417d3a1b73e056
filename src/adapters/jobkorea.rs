use crate::adapters::html::{clean_text, first_text_of, resolve_url, selector};
use crate::adapters::{build_url, distinct, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use scraper::Html;
use std::collections::HashSet;

pub const JOBKOREA_BASE_URL: &str = "https://www.jobkorea.co.kr";

const SOURCE_ID: &str = "jobkorea";
const DISPLAY_NAME: &str = "잡코리아";
const MAX_PER_PAGE: usize = 30;
const MIN_TITLE_CHARS: usize = 5;
const MAX_FALLBACK_CHARS: usize = 200;

/// 잡코리아：頁面結構常變動，只依賴 /Recruit/ 連結與寬鬆的 class 比對
pub struct JobKoreaSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl JobKoreaSource {
    pub fn new(fetcher: HttpFetcher, base_url: String) -> Self {
        Self { fetcher, base_url }
    }

    async fn search_region(&self, keyword: &str, region: &str) -> Result<Vec<Listing>> {
        let text = if region.is_empty() {
            keyword.to_string()
        } else {
            format!("{} {}", keyword, region)
        };
        let url = self.search_url(&text);
        let body = self.fetcher.get_html(SOURCE_ID, &url).await?;
        parse_listings(&self.base_url, &body, region)
    }
}

#[async_trait]
impl JobSource for JobKoreaSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        build_url(&self.base_url, "/Search/", &[("stext", keyword)])
    }

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);
        let region_keywords = distinct(regions.iter().map(|r| r.search_keyword().to_string()));

        let results = if region_keywords.is_empty() {
            vec![self.search_region(keyword, "").await]
        } else {
            join_all(
                region_keywords
                    .iter()
                    .map(|region| self.search_region(keyword, region)),
            )
            .await
        };

        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

/// 連結內沒有標題元素時，取連結文字的第一行
fn fallback_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length <= MIN_TITLE_CHARS || length >= MAX_FALLBACK_CHARS {
        return None;
    }
    trimmed.lines().map(clean_text).find(|line| !line.is_empty())
}

pub(crate) fn parse_listings(base_url: &str, body: &str, region: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(body);
    let link_selector = selector(SOURCE_ID, r#"a[href*="/Recruit/"]"#)?;
    let title_selectors = vec![
        selector(SOURCE_ID, r#"[class*="tit"]"#)?,
        selector(SOURCE_ID, r#"[class*="Title"]"#)?,
        selector(SOURCE_ID, "h2")?,
        selector(SOURCE_ID, "strong")?,
    ];
    let company_selectors = vec![
        selector(SOURCE_ID, r#"[class*="corp"]"#)?,
        selector(SOURCE_ID, r#"[class*="Company"]"#)?,
    ];

    let mut seen = HashSet::new();
    let mut listings = Vec::new();

    for link in document.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if href.contains("javascript:") {
            continue;
        }

        let title = first_text_of(&link, &title_selectors)
            .or_else(|| fallback_title(&link.text().collect::<String>()))
            .unwrap_or_default();
        if title.chars().count() <= MIN_TITLE_CHARS {
            continue;
        }

        let url = resolve_url(base_url, href);
        if !seen.insert(url.clone()) {
            continue;
        }

        let company = first_text_of(&link, &company_selectors).unwrap_or_default();
        let mut listing = Listing::new(SOURCE_ID, &title, &company, &url);
        listing.location = region.to_string();
        listings.push(listing);

        if listings.len() >= MAX_PER_PAGE {
            break;
        }
    }

    tracing::debug!(source = SOURCE_ID, region, "Parsed {} listings", listings.len());
    Ok(listings)
}
