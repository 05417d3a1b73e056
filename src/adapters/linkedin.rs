use crate::adapters::html::{first_text, selector};
use crate::adapters::{build_url, distinct, finish, merge_region_results, primary_keyword, HttpFetcher};
use crate::config::LinkedInMode;
use crate::domain::model::{Listing, Region, SourceResult};
use crate::domain::ports::JobSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use scraper::Html;

pub const LINKEDIN_BASE_URL: &str = "https://www.linkedin.com";

const SOURCE_ID: &str = "linkedin";
const DISPLAY_NAME: &str = "LinkedIn";
const NATIONWIDE: &str = "South Korea";
const GUEST_SEARCH_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";
const LINK_ONLY_MESSAGE: &str = "LinkedIn은 검색 링크만 제공합니다";

/// 英文地名 → 韓文；依序比對，先符合者優先
const LOCATION_MAP: [(&str, &str); 15] = [
    ("pangyo", "판교"),
    ("bundang", "분당"),
    ("seongnam", "성남"),
    ("gyeonggi", "경기"),
    ("suwon", "수원"),
    ("yongin", "용인"),
    ("hwaseong", "화성"),
    ("sejong", "세종"),
    ("cheonan", "천안"),
    ("daejeon", "대전"),
    ("cheongju", "청주"),
    ("seoul", "서울"),
    ("incheon", "인천"),
    ("busan", "부산"),
    ("daegu", "대구"),
];

pub struct LinkedInSource {
    fetcher: HttpFetcher,
    base_url: String,
    mode: LinkedInMode,
}

impl LinkedInSource {
    pub fn new(fetcher: HttpFetcher, base_url: String, mode: LinkedInMode) -> Self {
        Self {
            fetcher,
            base_url,
            mode,
        }
    }

    async fn search_location(&self, keyword: &str, location: &str) -> Result<Vec<Listing>> {
        let url = build_url(
            &self.base_url,
            GUEST_SEARCH_PATH,
            &[("keywords", keyword), ("location", location), ("start", "0")],
        );
        let body = self.fetcher.get_html(SOURCE_ID, &url).await?;
        parse_listings(&body, keyword)
    }
}

#[async_trait]
impl JobSource for LinkedInSource {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn search_url(&self, keyword: &str) -> String {
        build_url(
            &self.base_url,
            "/jobs/search/",
            &[("keywords", keyword), ("location", NATIONWIDE)],
        )
    }

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult {
        let keyword = primary_keyword(skills);

        if self.mode == LinkedInMode::LinkOnly {
            tracing::debug!(source = SOURCE_ID, "Link-only mode, skipping fetch");
            return SourceResult::link_only(
                SOURCE_ID,
                DISPLAY_NAME,
                self.search_url(keyword),
                Some(LINK_ONLY_MESSAGE.to_string()),
            );
        }

        let mut locations = distinct(regions.iter().filter_map(|r| r.linkedin_location.clone()));
        if locations.is_empty() {
            locations.push(NATIONWIDE.to_string());
        }

        let results = join_all(
            locations
                .iter()
                .map(|location| self.search_location(keyword, location)),
        )
        .await;
        let (listings, errors) = merge_region_results(SOURCE_ID, results);
        finish(SOURCE_ID, DISPLAY_NAME, self.search_url(keyword), listings, errors)
    }
}

pub fn translate_location(location: &str) -> String {
    let lower = location.to_lowercase();
    LOCATION_MAP
        .iter()
        .find(|(english, _)| lower.contains(english))
        .map(|(_, korean)| korean.to_string())
        .unwrap_or_else(|| location.to_string())
}

/// 去掉追蹤用查詢參數，作為去重鍵
fn canonical_url(href: &str) -> String {
    href.trim().split('?').next().unwrap_or_default().to_string()
}

pub(crate) fn parse_listings(body: &str, keyword: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(body);
    let card = selector(SOURCE_ID, ".base-search-card")?;
    let title = selector(SOURCE_ID, ".base-search-card__title")?;
    let company = selector(SOURCE_ID, ".base-search-card__subtitle a")?;
    let location = selector(SOURCE_ID, ".job-search-card__location")?;
    let posted = selector(SOURCE_ID, "time.job-search-card__listdate")?;
    let link = selector(SOURCE_ID, ".base-card__full-link")?;

    let mut listings = Vec::new();
    for element in document.select(&card) {
        let title_text = first_text(&element, &title);
        let href = element
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        if title_text.is_empty() || href.trim().is_empty() {
            continue;
        }

        let mut listing = Listing::new(
            SOURCE_ID,
            &title_text,
            &first_text(&element, &company),
            &canonical_url(href),
        );
        listing.location = translate_location(&first_text(&element, &location));
        // 搜尋關鍵字只作為附註，不當成公告的技術棧
        listing.insert_detail("searchKeyword", keyword);
        if let Some(date) = element
            .select(&posted)
            .next()
            .and_then(|t| t.value().attr("datetime"))
        {
            listing.insert_detail("postedDate", date);
        }
        listings.push(listing);
    }

    tracing::debug!(source = SOURCE_ID, "Parsed {} listings", listings.len());
    Ok(listings)
}
