use crate::domain::model::{CandidateProfile, Listing};
use crate::domain::services::analyzer::contains_any;
use regex::Regex;
use std::sync::LazyLock;

static EXPERIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)년\s*이상",
        r"(\d+)년\s*~\s*(\d+)년",
        r"(\d+)\s*~\s*(\d+)\s*년",
        r"(?i)(\d+)\+\s*years?",
        r"(?i)(\d+)\s*years?\s*\+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("experience pattern is valid"))
    .collect()
});

const ENTRY_KEYWORDS: [&str; 3] = ["신입", "junior", "entry"];
const SENIOR_KEYWORDS: [&str; 2] = ["시니어", "senior"];
const CONTRACT_KEYWORDS: [&str; 5] = ["계약직", "계약", "contract", "파견", "외주"];
const FREELANCE_KEYWORDS: [&str; 8] = [
    "프리랜서",
    "프리랜스",
    "freelance",
    "freelancer",
    "원격",
    "재택",
    "리모트",
    "remote",
];

/// 只有「시니어 / senior」字樣、沒有具體年數時視為 5 年
const SENIOR_DEFAULT_YEARS: u32 = 5;
const SENIOR_MATCH_BONUS: f64 = 20.0;
const EMPLOYMENT_BONUS: f64 = 30.0;
const SKILL_DENOMINATOR_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterPolicy {
    pub min_skill_score: f64,
    /// 求職者年資超過要求年資加上此值時排除（資深職缺除外）；`None` 停用
    pub overqualification_gap: Option<u32>,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            min_skill_score: 20.0,
            overqualification_gap: Some(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmploymentType {
    pub is_contract: bool,
    pub is_freelance: bool,
}

impl EmploymentType {
    pub fn bonus(&self) -> f64 {
        let mut bonus = 0.0;
        if self.is_contract {
            bonus += EMPLOYMENT_BONUS;
        }
        if self.is_freelance {
            bonus += EMPLOYMENT_BONUS;
        }
        bonus
    }
}

/// 從標題與經歷文字擷取最低要求年資，無法判斷時回傳 `None`
pub fn extract_required_experience(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }

    if contains_any(&lower, &ENTRY_KEYWORDS) {
        return Some(0);
    }

    for pattern in EXPERIENCE_PATTERNS.iter() {
        if let Some(years) = pattern
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return Some(years);
        }
    }

    if is_senior_posting(&lower) {
        return Some(SENIOR_DEFAULT_YEARS);
    }

    None
}

pub fn is_senior_posting(text: &str) -> bool {
    contains_any(&text.to_lowercase(), &SENIOR_KEYWORDS)
}

/// 技術比對分數 (0-100)：命中數 / min(技術數, 10)
pub fn calculate_skill_match_score<'a, I>(text: &str, skills: I) -> f64
where
    I: IntoIterator<Item = &'a String>,
{
    let lower = text.to_lowercase();
    let mut total = 0usize;
    let mut matched = 0usize;

    for skill in skills {
        total += 1;
        let skill = skill.trim().to_lowercase();
        if !skill.is_empty() && lower.contains(&skill) {
            matched += 1;
        }
    }

    if total == 0 || lower.is_empty() {
        return 0.0;
    }

    let denominator = total.min(SKILL_DENOMINATOR_CAP) as f64;
    (matched as f64 / denominator * 100.0).min(100.0)
}

pub fn detect_employment_type(text: &str) -> EmploymentType {
    let lower = text.to_lowercase();
    EmploymentType {
        is_contract: contains_any(&lower, &CONTRACT_KEYWORDS),
        is_freelance: contains_any(&lower, &FREELANCE_KEYWORDS),
    }
}

/// 評分單一職缺；不符合條件時回傳 `None`
pub fn score_listing(
    listing: &Listing,
    profile: &CandidateProfile,
    policy: &FilterPolicy,
) -> Option<Listing> {
    let requirement_text = format!("{} {}", listing.title, listing.experience_text).to_lowercase();
    let senior_posting = is_senior_posting(&requirement_text);
    let candidate_years = profile.years_of_experience;

    if let Some(required) = extract_required_experience(&requirement_text) {
        if candidate_years < required {
            return None;
        }
        if let Some(gap) = policy.overqualification_gap {
            if candidate_years > required.saturating_add(gap) && !senior_posting {
                return None;
            }
        }
    }

    // 只看標題、年資與技術棧，各來源的附加欄位不列入評分
    let mut match_text = requirement_text;
    for extra in &listing.tech_stacks {
        match_text.push(' ');
        match_text.push_str(&extra.to_lowercase());
    }

    let skill_score = calculate_skill_match_score(&match_text, profile.tech_stack.all());
    if skill_score < policy.min_skill_score {
        return None;
    }

    let employment = detect_employment_type(&match_text);

    let mut final_score = skill_score;
    if profile.is_senior() && senior_posting {
        final_score += SENIOR_MATCH_BONUS;
    }
    final_score += employment.bonus();

    let mut scored = listing.clone();
    scored.match_score = Some(final_score.min(100.0).round() as u8);
    scored.is_contract = employment.is_contract;
    scored.is_freelance = employment.is_freelance;
    Some(scored)
}

pub fn filter_jobs(listings: &[Listing], profile: &CandidateProfile, limit: usize) -> Vec<Listing> {
    filter_jobs_with(listings, profile, limit, &FilterPolicy::default())
}

pub fn filter_jobs_with(
    listings: &[Listing],
    profile: &CandidateProfile,
    limit: usize,
    policy: &FilterPolicy,
) -> Vec<Listing> {
    let mut filtered: Vec<Listing> = listings
        .iter()
        .filter_map(|listing| score_listing(listing, profile, policy))
        .collect();

    filtered.sort_by(|a, b| b.score().cmp(&a.score()));
    filtered.truncate(limit);
    filtered
}
