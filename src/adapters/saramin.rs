use crate::adapters::html::{element_text, first_text, resolve_url, selector};
use crate::adapters::{build_url, distinct, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use scraper::Html;

pub const SARAMIN_BASE_URL: &str = "https://www.saramin.co.kr";

const SOURCE_ID: &str = "saramin";
const DISPLAY_NAME: &str = "사람인";
const SEARCH_PATH: &str = "/zf_user/search";

/// 사람인：依地區代碼 (loc_mcd) 分別查詢 HTML 搜尋頁
pub struct SaraminSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl SaraminSource {
    pub fn new(fetcher: HttpFetcher, base_url: String) -> Self {
        Self { fetcher, base_url }
    }

    fn region_url(&self, keyword: &str, region_code: Option<&str>) -> String {
        match region_code {
            Some(code) => build_url(
                &self.base_url,
                SEARCH_PATH,
                &[("searchword", keyword), ("loc_mcd", code)],
            ),
            None => build_url(&self.base_url, SEARCH_PATH, &[("searchword", keyword)]),
        }
    }

    async fn search_region(&self, keyword: &str, region_code: Option<&str>) -> Result<Vec<Listing>> {
        let url = self.region_url(keyword, region_code);
        let body = self.fetcher.get_html(SOURCE_ID, &url).await?;
        parse_listings(&self.base_url, &body)
    }
}

#[async_trait]
impl JobSource for SaraminSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        self.region_url(keyword, None)
    }

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);
        let codes = distinct(regions.iter().filter_map(|r| r.saramin_code.clone()));

        let results = if codes.is_empty() {
            vec![self.search_region(keyword, None).await]
        } else {
            join_all(codes.iter().map(|code| self.search_region(keyword, Some(code)))).await
        };

        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

pub(crate) fn parse_listings(base_url: &str, body: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(body);
    let item = selector(SOURCE_ID, ".item_recruit")?;
    let title = selector(SOURCE_ID, ".job_tit a")?;
    let company = selector(SOURCE_ID, ".corp_name a")?;
    let condition = selector(SOURCE_ID, ".job_condition span")?;
    let deadline = selector(SOURCE_ID, ".job_date .date")?;

    let mut listings = Vec::new();
    for element in document.select(&item) {
        let Some(link) = element.select(&title).next() else {
            continue;
        };
        let title_text = element_text(&link);
        let href = link.value().attr("href").unwrap_or_default();
        if title_text.is_empty() || href.trim().is_empty() {
            continue;
        }

        let conditions: Vec<String> = element.select(&condition).map(|c| element_text(&c)).collect();

        let mut listing = Listing::new(
            SOURCE_ID,
            &title_text,
            &first_text(&element, &company),
            &resolve_url(base_url, href),
        );
        listing.location = conditions.first().cloned().unwrap_or_default();
        listing.experience_text = conditions.get(1).cloned().unwrap_or_default();
        listing.deadline = first_text(&element, &deadline);
        listings.push(listing);
    }

    tracing::debug!(source = SOURCE_ID, "Parsed {} listings", listings.len());
    Ok(listings)
}
