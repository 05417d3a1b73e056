use crate::domain::model::{Listing, Region};
use std::collections::HashSet;

/// topMatches 的地區分組。依定義順序分配，先分到的職缺不會重複出現在後面的組別。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBucket {
    pub key: String,
    pub patterns: Vec<String>,
}

impl RegionBucket {
    pub fn new(key: &str, patterns: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let text = format!("{} {}", listing.location, listing.title).to_lowercase();
        self.patterns.iter().any(|p| text.contains(p.as_str()))
    }
}

pub fn default_region_buckets() -> Vec<RegionBucket> {
    vec![
        RegionBucket::new("판교", &["판교", "분당"]),
        RegionBucket::new("세종", &["세종"]),
        RegionBucket::new("천안", &["천안"]),
        RegionBucket::new("대전청주", &["대전", "청주"]),
        RegionBucket::new("경기", &["경기", "화성", "기흥", "용인", "수원"]),
    ]
}

pub fn default_regions() -> Vec<Region> {
    vec![
        Region::with_locators("경기도 성남시", "판교", "102000", "Pangyo"),
        Region::with_locators("화성시", "화성", "102000", "Gyeonggi-do"),
        Region::with_locators("기흥구", "용인", "102000", "Gyeonggi-do"),
        Region::with_locators("세종시", "세종", "118000", "Sejong"),
        Region::with_locators("천안시", "천안", "115000", "Cheonan"),
        Region::with_locators("대전", "대전", "105000", "Daejeon"),
    ]
}

/// 每個地區取分數最高的 `per_bucket` 筆，合併後再依分數排序
pub fn select_top_matches(
    pool: &[Listing],
    buckets: &[RegionBucket],
    per_bucket: usize,
) -> Vec<Listing> {
    let mut used_urls: HashSet<&str> = HashSet::new();
    let mut top_matches: Vec<Listing> = Vec::new();

    for bucket in buckets {
        let mut candidates: Vec<&Listing> = pool
            .iter()
            .filter(|listing| bucket.matches(listing) && !used_urls.contains(listing.url.as_str()))
            .collect();
        candidates.sort_by(|a, b| b.score().cmp(&a.score()));

        let mut taken = 0;
        for listing in candidates {
            if taken == per_bucket {
                break;
            }
            // 同一來源池內可能有相同 URL，以先出現者為準
            if used_urls.insert(listing.url.as_str()) {
                top_matches.push(listing.clone());
                taken += 1;
            }
        }

        tracing::debug!(region = %bucket.key, taken, "Region bucket filled");
    }

    top_matches.sort_by(|a, b| b.score().cmp(&a.score()));
    top_matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(title: &str, location: &str, url: &str, score: u8) -> Listing {
        let mut l = Listing::new("saramin", title, "Acme", url);
        l.location = location.to_string();
        l.match_score = Some(score);
        l
    }

    #[test]
    fn test_every_region_is_represented() {
        let mut pool: Vec<Listing> = (0..30)
            .map(|i| scored("Java 개발자", "성남시 분당구", &format!("https://p/{}", i), 95))
            .collect();
        pool.push(scored("Java 개발자", "세종특별자치시", "https://s/1", 30));
        pool.push(scored("Java 개발자", "충남 천안시", "https://c/1", 25));
        pool.push(scored("Java 개발자", "충북 청주시", "https://d/1", 40));
        pool.push(scored("Java 개발자", "경기 화성시", "https://g/1", 20));

        let top = select_top_matches(&pool, &default_region_buckets(), 10);

        assert_eq!(top.len(), 14);
        for url in ["https://s/1", "https://c/1", "https://d/1", "https://g/1"] {
            assert!(top.iter().any(|l| l.url == url), "missing {}", url);
        }
        assert!(top.windows(2).all(|w| w[0].score() >= w[1].score()));
    }

    #[test]
    fn test_listing_claimed_once() {
        // 同時符合「판교」與「경기」
        let pool = vec![
            scored("판교 백엔드", "경기 성남시", "https://a", 80),
            scored("판교 백엔드", "경기 성남시", "https://a", 80),
            scored("수원 백엔드", "경기 수원시", "https://b", 60),
            scored("서울 백엔드", "서울 강남구", "https://c", 99),
        ];

        let top = select_top_matches(&pool, &default_region_buckets(), 10);

        let urls: Vec<&str> = top.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b"]);
    }

    #[test]
    fn test_bucket_limit_applies_per_region() {
        let pool: Vec<Listing> = (0..5)
            .map(|i| scored("개발자", "대전 유성구", &format!("https://d/{}", i), 50 + i as u8))
            .collect();

        let top = select_top_matches(&pool, &default_region_buckets(), 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].url, "https://d/4");
        assert_eq!(top[1].url, "https://d/3");
    }

    #[test]
    fn test_bucket_matching_is_case_insensitive() {
        let bucket = RegionBucket::new("remote", &["Remote"]);
        assert!(bucket.matches(&scored("REMOTE Java", "", "https://r", 1)));
    }
}
