use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Resume document (supplied by the surrounding application)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    pub profile: Option<ResumeProfile>,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    /// `YYYY.MM ~ YYYY.MM` 或 `YYYY.MM ~ 현재`
    pub period: String,
    pub position: Option<String>,
    pub project: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub major: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Candidate profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CareerLevel {
    Junior,
    JuniorMid,
    Mid,
    Senior,
}

impl CareerLevel {
    pub fn from_years(years: u32) -> Self {
        match years {
            y if y >= 10 => CareerLevel::Senior,
            y if y >= 5 => CareerLevel::Mid,
            y if y >= 3 => CareerLevel::JuniorMid,
            _ => CareerLevel::Junior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CareerLevel::Junior => "junior",
            CareerLevel::JuniorMid => "junior-mid",
            CareerLevel::Mid => "mid",
            CareerLevel::Senior => "senior",
        }
    }

    /// 回應摘要中使用的韓文顯示名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            CareerLevel::Senior => "시니어/리드급",
            CareerLevel::Mid => "중급",
            CareerLevel::JuniorMid | CareerLevel::Junior => "주니어",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub interest: Vec<String>,
}

impl TechStack {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .chain(self.interest.iter())
    }

    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.interest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub years_of_experience: u32,
    pub career_level: CareerLevel,
    pub tech_stack: TechStack,
    pub preferred_roles: Vec<String>,
    pub summary: String,
}

impl CandidateProfile {
    pub fn empty() -> Self {
        Self {
            years_of_experience: 0,
            career_level: CareerLevel::Junior,
            tech_stack: TechStack::default(),
            preferred_roles: Vec::new(),
            summary: "이력서 데이터 없음".to_string(),
        }
    }

    pub fn is_senior(&self) -> bool {
        self.career_level == CareerLevel::Senior
    }
}

/// 呼叫端附加在搜尋結果後的履歷分析摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub years_of_experience: u32,
    pub career_level: String,
    pub primary_tech: Vec<String>,
    pub preferred_roles: Vec<String>,
    pub summary: String,
}

impl From<&CandidateProfile> for ResumeAnalysis {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            years_of_experience: profile.years_of_experience,
            career_level: profile.career_level.display_name().to_string(),
            primary_tech: profile.tech_stack.primary.clone(),
            preferred_roles: profile.preferred_roles.clone(),
            summary: profile.summary.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Search request / regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, alias = "saramin_code", skip_serializing_if = "Option::is_none")]
    pub saramin_code: Option<String>,
    #[serde(default, alias = "linkedin_location", skip_serializing_if = "Option::is_none")]
    pub linkedin_location: Option<String>,
}

impl Region {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keyword: None,
            saramin_code: None,
            linkedin_location: None,
        }
    }

    pub fn with_locators(name: &str, keyword: &str, saramin_code: &str, linkedin: &str) -> Self {
        Self {
            name: name.to_string(),
            keyword: Some(keyword.to_string()),
            saramin_code: Some(saramin_code.to_string()),
            linkedin_location: Some(linkedin.to_string()),
        }
    }

    /// 關鍵字型來源使用的地區字串；未指定時退回顯示名稱
    pub fn search_keyword(&self) -> &str {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| self.name.trim())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub skills: Vec<String>,
    pub locations: Vec<Region>,
    pub profile: Option<CandidateProfile>,
}

// ---------------------------------------------------------------------------
// Listings and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    #[serde(rename = "experience")]
    pub experience_text: String,
    pub deadline: String,
    pub tech_stacks: Vec<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    pub is_contract: bool,
    pub is_freelance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl Listing {
    pub fn new(source: &str, title: &str, company: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            ..Default::default()
        }
    }

    pub fn score(&self) -> u8 {
        self.match_score.unwrap_or(0)
    }

    /// 只記錄非空白的附加欄位
    pub fn insert_detail(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.details.insert(key.to_string(), value.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Ok {
        jobs: Vec<Listing>,
        #[serde(rename = "totalScraped", default, skip_serializing_if = "Option::is_none")]
        total_scraped: Option<usize>,
        #[serde(rename = "filteredCount", default, skip_serializing_if = "Option::is_none")]
        filtered_count: Option<usize>,
    },
    Error {
        message: String,
    },
    LinkOnly {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResult {
    pub source: String,
    pub display_name: String,
    pub search_url: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceResult {
    pub fn ok(source: &str, display_name: &str, search_url: String, jobs: Vec<Listing>) -> Self {
        Self {
            source: source.to_string(),
            display_name: display_name.to_string(),
            search_url,
            outcome: SourceOutcome::Ok {
                jobs,
                total_scraped: None,
                filtered_count: None,
            },
        }
    }

    pub fn error(source: &str, display_name: &str, search_url: String, message: String) -> Self {
        Self {
            source: source.to_string(),
            display_name: display_name.to_string(),
            search_url,
            outcome: SourceOutcome::Error { message },
        }
    }

    pub fn link_only(
        source: &str,
        display_name: &str,
        search_url: String,
        message: Option<String>,
    ) -> Self {
        Self {
            source: source.to_string(),
            display_name: display_name.to_string(),
            search_url,
            outcome: SourceOutcome::LinkOnly { message },
        }
    }

    pub fn jobs(&self) -> &[Listing] {
        match &self.outcome {
            SourceOutcome::Ok { jobs, .. } => jobs,
            SourceOutcome::Error { .. } | SourceOutcome::LinkOnly { .. } => &[],
        }
    }

    pub fn status(&self) -> &'static str {
        match self.outcome {
            SourceOutcome::Ok { .. } => "ok",
            SourceOutcome::Error { .. } => "error",
            SourceOutcome::LinkOnly { .. } => "link_only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub sites: Vec<SourceResult>,
    pub top_matches: Vec<Listing>,
    pub searched_at: DateTime<Utc>,
    pub skills_used: Vec<String>,
    pub locations_used: Vec<String>,
    pub cached: bool,
}
