use crate::adapters::html::{element_text, first_text, resolve_url, selector};
use crate::adapters::{build_url, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use scraper::Html;

pub const WISHKET_BASE_URL: &str = "https://www.wishket.com";

const SOURCE_ID: &str = "wishket";
const DISPLAY_NAME: &str = "위시캣";
const COMPANY_LABEL: &str = "위시캣 프로젝트";

/// 위시캣：全國性外包平台，不分地區只查一次
pub struct WishketSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl WishketSource {
    pub fn new(fetcher: HttpFetcher, base_url: String) -> Self {
        Self { fetcher, base_url }
    }

    async fn search_projects(&self, keyword: &str) -> Result<Vec<Listing>> {
        let body = self
            .fetcher
            .get_html(SOURCE_ID, &self.search_url(keyword))
            .await?;
        parse_projects(&self.base_url, &body)
    }
}

#[async_trait]
impl JobSource for WishketSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        build_url(&self.base_url, "/project/", &[("keyword", keyword)])
    }

    async fn search(&self, skills: &[String], _regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);
        let results = vec![self.search_projects(keyword).await];
        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

pub(crate) fn parse_projects(base_url: &str, body: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(body);
    let project = selector(SOURCE_ID, ".project-info-box")?;
    let link = selector(SOURCE_ID, ".project-link")?;
    let title = selector(SOURCE_ID, "p")?;
    let budget = selector(SOURCE_ID, ".budget")?;
    let term = selector(SOURCE_ID, ".term")?;
    let work_type = selector(SOURCE_ID, ".project-type-mark")?;
    let location = selector(SOURCE_ID, ".location-data")?;
    let skill = selector(SOURCE_ID, ".skill-chip")?;

    let mut listings = Vec::new();
    for element in document.select(&project) {
        let Some(anchor) = element.select(&link).next() else {
            continue;
        };
        let title_text = first_text(&anchor, &title);
        let href = anchor.value().attr("href").unwrap_or_default();
        if title_text.is_empty() || href.trim().is_empty() {
            continue;
        }

        let mut listing = Listing::new(
            SOURCE_ID,
            &title_text,
            COMPANY_LABEL,
            &resolve_url(base_url, href),
        );
        listing.location = first_text(&element, &location);
        listing.tech_stacks = element
            .select(&skill)
            .map(|chip| element_text(&chip))
            .filter(|chip| !chip.is_empty())
            .collect();
        listing.insert_detail("budget", &first_text(&element, &budget));
        listing.insert_detail("duration", &first_text(&element, &term));
        listing.insert_detail("workType", &first_text(&element, &work_type));
        listings.push(listing);
    }

    tracing::debug!(source = SOURCE_ID, "Parsed {} projects", listings.len());
    Ok(listings)
}
