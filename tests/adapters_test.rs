use httpmock::prelude::*;
use job_aggregator::adapters::{
    default_sources, HttpFetcher, JobKoreaSource, JumpitSource, LinkedInSource, SaraminSource,
    WantedSource, WishketSource,
};
use job_aggregator::config::{LinkedInMode, SearchConfig};
use job_aggregator::domain::ports::JobSource;
use job_aggregator::{Region, SourceOutcome};
use serde_json::json;

fn fetcher() -> HttpFetcher {
    let config = SearchConfig {
        request_timeout_ms: 2_000,
        ..Default::default()
    };
    HttpFetcher::new(&config).unwrap()
}

fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn daejeon_and_sejong() -> Vec<Region> {
    vec![
        Region::with_locators("대전", "대전", "105000", "Daejeon"),
        Region::with_locators("세종시", "세종", "118000", "Sejong"),
    ]
}

fn saramin_item(id: u32, title: &str, location: &str) -> String {
    format!(
        r#"<div class="item_recruit">
  <h2 class="job_tit"><a href="/zf_user/jobs/relay/view?rec_idx={id}">{title}</a></h2>
  <strong class="corp_name"><a>회사{id}</a></strong>
  <div class="job_condition"><span>{location}</span><span>경력 2년↑</span></div>
  <div class="job_date"><span class="date">~ 12/31(수)</span></div>
</div>"#
    )
}

#[tokio::test]
async fn test_saramin_queries_each_region_and_dedups() {
    let server = MockServer::start_async().await;

    let daejeon = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/zf_user/search")
                .query_param("searchword", "Java")
                .query_param("loc_mcd", "105000");
            then.status(200).header("content-type", "text/html").body(format!(
                "<html><body>{}{}</body></html>",
                saramin_item(1, "Java 개발자", "대전 유성구"),
                saramin_item(2, "Spring 개발자", "대전 서구")
            ));
        })
        .await;
    let sejong = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/zf_user/search")
                .query_param("loc_mcd", "118000");
            then.status(200).header("content-type", "text/html").body(format!(
                "<html><body>{}{}</body></html>",
                saramin_item(2, "Spring 개발자", "대전 서구"),
                saramin_item(3, "백엔드 개발자", "세종 나성동")
            ));
        })
        .await;

    let source = SaraminSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    daejeon.assert_hits_async(1).await;
    sejong.assert_hits_async(1).await;
    assert_eq!(result.status(), "ok");
    assert_eq!(result.display_name, "사람인");
    assert!(result.search_url.contains("searchword=Java"));

    let urls: Vec<&str> = result.jobs().iter().map(|j| j.url.as_str()).collect();
    assert_eq!(urls.len(), 3);
    assert!(urls[0].starts_with(&server.base_url()));
    assert!(urls[0].ends_with("rec_idx=1"));
}

#[tokio::test]
async fn test_saramin_partial_failure_keeps_other_regions() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.path("/zf_user/search").query_param("loc_mcd", "105000");
            then.status(200)
                .body(saramin_item(1, "Java 개발자", "대전 유성구"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.path("/zf_user/search").query_param("loc_mcd", "118000");
            then.status(503);
        })
        .await;

    let source = SaraminSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    assert_eq!(result.status(), "ok");
    assert_eq!(result.jobs().len(), 1);
}

#[tokio::test]
async fn test_saramin_total_failure_is_error_outcome() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/zf_user/search");
            then.status(403);
        })
        .await;

    let source = SaraminSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    match &result.outcome {
        SourceOutcome::Error { message } => assert!(message.contains("403")),
        other => panic!("expected error outcome, got {:?}", other),
    }
    assert!(result.jobs().is_empty());
    assert!(!result.search_url.is_empty());
}

#[tokio::test]
async fn test_saramin_without_region_codes_runs_single_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/zf_user/search").query_param("searchword", "Java");
            then.status(200)
                .body(saramin_item(7, "Java 개발자", "천안시 서북구"));
        })
        .await;

    let source = SaraminSource::new(fetcher(), server.base_url());
    let result = source.search(&[], &[Region::named("천안시")]).await;

    mock.assert_hits_async(1).await;
    assert_eq!(result.jobs().len(), 1);
}

#[tokio::test]
async fn test_wanted_merges_keyword_and_region_queries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v4/jobs")
                .query_param("country", "kr")
                .query_param("tag_type_ids", "518")
                .query_param("limit", "20");
            then.status(200).json_body(json!({
                "data": [
                    {
                        "id": 101,
                        "position": "Java 서버 개발자",
                        "company": {"name": "원티드랩"},
                        "address": {"full_location": "대전 유성구"},
                        "annual_from": 0,
                        "annual_to": 3,
                        "due_time": null
                    },
                    {
                        "id": 102,
                        "position": "Spring 백엔드",
                        "company": {"name": "세종테크"},
                        "address": {"location": "세종"},
                        "annual_from": 2,
                        "annual_to": 5,
                        "due_time": "2026-12-24T00:00:00",
                        "reward": {"formatted_total": "100만원"}
                    }
                ]
            }));
        })
        .await;

    let source = WantedSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    // "Java", "Java 대전", "Java 세종"
    mock.assert_hits_async(3).await;
    assert_eq!(result.status(), "ok");
    assert_eq!(result.jobs().len(), 2);
    assert_eq!(result.jobs()[0].url, format!("{}/wd/101", server.base_url()));
    assert_eq!(result.jobs()[0].deadline, "상시채용");
    assert_eq!(result.jobs()[1].experience_text, "2~5년");
    assert!(result.search_url.contains("tab=position"));
}

#[tokio::test]
async fn test_wanted_malformed_json_is_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/api/v4/jobs");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let source = WantedSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &[]).await;

    assert_eq!(result.status(), "error");
}

#[tokio::test]
async fn test_jumpit_uses_region_terms() {
    let server = MockServer::start_async().await;
    let daejeon = server
        .mock_async(|when, then| {
            when.path("/api/positions")
                .query_param("sort", "rsp_rate")
                .query_param("keyword", "Java 대전");
            then.status(200).json_body(json!({
                "result": {"positions": [
                    {"id": 1, "title": "Java 개발자", "companyName": "대전랩",
                     "locations": ["대전 유성구"], "techStacks": ["<b>Java</b>"],
                     "minCareer": 1, "maxCareer": 4, "alwaysOpen": true}
                ]}
            }));
        })
        .await;
    let sejong = server
        .mock_async(|when, then| {
            when.path("/api/positions").query_param("keyword", "Java 세종");
            then.status(200).json_body(json!({"result": {"positions": []}}));
        })
        .await;

    let source = JumpitSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    daejeon.assert_hits_async(1).await;
    sejong.assert_hits_async(1).await;
    let jobs = result.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].url, "https://jumpit.saramin.co.kr/position/1");
    assert_eq!(jobs[0].tech_stacks, vec!["Java"]);
    assert_eq!(jobs[0].experience_text, "1~4년");
    assert_eq!(
        result.search_url,
        "https://jumpit.saramin.co.kr/positions?keyword=Java"
    );
}

#[tokio::test]
async fn test_wanted_null_fields_keep_valid_entries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v4/jobs");
            then.status(200).json_body(json!({
                "data": [
                    {"id": 1, "position": "Java 서버 개발자", "company": {"name": "원티드랩"}},
                    {"id": 2, "position": null, "company": {"name": null}},
                    {"id": 3, "position": "Spring 개발자", "company": null, "address": null,
                     "annual_from": null, "reward": null},
                    {"position": "아이디 없는 공고", "company": {"name": "무명"}}
                ]
            }));
        })
        .await;

    let source = WantedSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &[]).await;

    mock.assert_hits_async(1).await;
    assert_eq!(result.status(), "ok");
    let jobs = result.jobs();
    // 標題為 null 的公告被略過，其餘照常保留
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Java 서버 개발자");
    assert_eq!(jobs[0].company, "원티드랩");
    assert_eq!(jobs[1].url, format!("{}/wd/3", server.base_url()));
    assert!(jobs[1].company.is_empty());
}

#[tokio::test]
async fn test_jumpit_null_fields_keep_valid_entries() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/api/positions").query_param("keyword", "Java 대전");
            then.status(200).json_body(json!({
                "result": {"positions": [
                    {"id": 1, "title": "Java 개발자", "companyName": "대전랩",
                     "locations": ["대전 유성구"], "techStacks": ["Java"], "alwaysOpen": true},
                    {"id": 2, "title": "Kotlin 백엔드", "companyName": null,
                     "locations": null, "techStacks": null, "alwaysOpen": null}
                ]}
            }));
        })
        .await;

    let source = JumpitSource::new(fetcher(), server.base_url());
    let regions = vec![Region::with_locators("대전", "대전", "105000", "Daejeon")];
    let result = source.search(&skills(&["Java"]), &regions).await;

    mock.assert_hits_async(1).await;
    assert_eq!(result.status(), "ok");
    let jobs = result.jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].location, "대전 유성구");
    assert_eq!(jobs[0].deadline, "상시채용");
    assert_eq!(jobs[1].url, "https://jumpit.saramin.co.kr/position/2");
    assert!(jobs[1].company.is_empty());
    assert!(jobs[1].location.is_empty());
    assert!(jobs[1].tech_stacks.is_empty());
}

#[tokio::test]
async fn test_jobkorea_sets_region_as_location() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/Search/").query_param("stext", "Java 대전");
            then.status(200).body(
                r#"<a href="/Recruit/GI_Read/9001"><span class="title">Java 웹 개발자 채용</span><span class="corp">대전정보</span></a>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.path("/Search/").query_param("stext", "Java 세종");
            then.status(200).body("<html></html>");
        })
        .await;

    let source = JobKoreaSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    let jobs = result.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].location, "대전");
    assert_eq!(jobs[0].company, "대전정보");
    assert_eq!(jobs[0].url, format!("{}/Recruit/GI_Read/9001", server.base_url()));
}

#[tokio::test]
async fn test_linkedin_link_only_makes_no_requests() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;

    let source = LinkedInSource::new(fetcher(), server.base_url(), LinkedInMode::LinkOnly);
    let result = source.search(&skills(&["Rust"]), &daejeon_and_sejong()).await;

    mock.assert_hits_async(0).await;
    assert_eq!(result.status(), "link_only");
    assert!(result.search_url.contains("keywords=Rust"));
    assert!(result.search_url.contains("location=South+Korea"));
}

#[tokio::test]
async fn test_linkedin_scrape_translates_locations() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/jobs-guest/jobs/api/seeMoreJobPostings/search")
                .query_param("keywords", "Java");
            then.status(200).body(
                r#"<li><div class="base-card base-search-card">
  <a class="base-card__full-link" href="https://kr.linkedin.com/jobs/view/1?trk=abc"></a>
  <h3 class="base-search-card__title">Java Engineer</h3>
  <h4 class="base-search-card__subtitle"><a>Acme</a></h4>
  <span class="job-search-card__location">Daejeon, South Korea</span>
</div></li>"#,
            );
        })
        .await;

    let source = LinkedInSource::new(fetcher(), server.base_url(), LinkedInMode::Scrape);
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    // Daejeon, Sejong 各一次，結果以 URL 去重
    mock.assert_hits_async(2).await;
    let jobs = result.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].url, "https://kr.linkedin.com/jobs/view/1");
    assert_eq!(jobs[0].location, "대전");
}

#[tokio::test]
async fn test_wishket_single_nationwide_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.path("/project/").query_param("keyword", "Java");
            then.status(200).body(
                r#"<div class="project-info-box">
  <a class="project-link" href="/project/1/"><p>Java 유지보수 프로젝트</p></a>
  <span class="budget">300만원</span>
  <span class="project-type-mark">외주</span>
  <span class="skill-chip">Java</span>
</div>"#,
            );
        })
        .await;

    let source = WishketSource::new(fetcher(), server.base_url());
    let result = source.search(&skills(&["Java"]), &daejeon_and_sejong()).await;

    mock.assert_hits_async(1).await;
    let jobs = result.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].company, "위시캣 프로젝트");
    assert_eq!(jobs[0].details.get("workType").map(String::as_str), Some("외주"));
}

#[test]
fn test_default_sources_respects_enabled_flags() {
    let mut config = SearchConfig::default();
    config.sources.jobkorea.enabled = false;
    config.sources.wishket.enabled = false;

    let sources = default_sources(&config).unwrap();
    let ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();

    assert_eq!(ids, vec!["saramin", "wanted", "jumpit", "linkedin"]);
}
