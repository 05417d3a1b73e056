use crate::domain::model::{
    CandidateProfile, CareerLevel, ExperienceEntry, ResumeDocument, SkillCategory, TechStack,
};
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{4})\.(\d{1,2})\s*~\s*(?:(\d{4})\.(\d{1,2})|(현재|재직\s*중|present|now|current))",
    )
    .expect("period pattern is valid")
});

const TIER_SIZE: usize = 5;
const RECENT_ENTRIES: usize = 3;
/// 經歷中未出現、僅列於技能清單的項目權重
const SKILL_ONLY_WEIGHT: f64 = 0.5;

/// 從履歷推導求職者輪廓。`None` 時回傳零值輪廓。
pub fn analyze_resume(resume: Option<&ResumeDocument>) -> CandidateProfile {
    analyze_resume_at(resume, Utc::now().date_naive())
}

/// 與 `analyze_resume` 相同，但「現職」期間以 `today` 作為結束月份
pub fn analyze_resume_at(resume: Option<&ResumeDocument>, today: NaiveDate) -> CandidateProfile {
    let Some(resume) = resume else {
        return CandidateProfile::empty();
    };

    let years = calculate_years_of_experience(&resume.experience, today);
    let career_level = CareerLevel::from_years(years);
    let tech_stack = analyze_tech_stack(&resume.experience, &resume.skills);
    let preferred_roles = extract_preferred_roles(&resume.experience);

    let summary = format!(
        "{}년차 {} ({})",
        years,
        preferred_roles.first().map(String::as_str).unwrap_or("개발자"),
        tech_stack
            .primary
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );

    tracing::debug!(
        years,
        level = career_level.as_str(),
        primary = ?tech_stack.primary,
        "Resume analyzed"
    );

    CandidateProfile {
        years_of_experience: years,
        career_level,
        tech_stack,
        preferred_roles,
        summary,
    }
}

/// 計算單一期間的月數。無法解析時回傳 `None`，結束早於開始時為 0。
pub fn period_months(period: &str, today: NaiveDate) -> Option<i64> {
    let caps = PERIOD_RE.captures(period)?;

    let start_year: i64 = caps.get(1)?.as_str().parse().ok()?;
    let start_month: i64 = caps.get(2)?.as_str().parse().ok()?;
    if !(1..=12).contains(&start_month) {
        return None;
    }

    let (end_year, end_month) = match (caps.get(3), caps.get(4)) {
        (Some(y), Some(m)) => {
            let month: i64 = m.as_str().parse().ok()?;
            if !(1..=12).contains(&month) {
                return None;
            }
            (y.as_str().parse::<i64>().ok()?, month)
        }
        _ => (i64::from(today.year()), i64::from(today.month())),
    };

    let months = (end_year * 12 + end_month) - (start_year * 12 + start_month);
    Some(months.max(0))
}

pub fn calculate_years_of_experience(experience: &[ExperienceEntry], today: NaiveDate) -> u32 {
    let total_months: i64 = experience
        .iter()
        .map(|exp| period_months(&exp.period, today).unwrap_or(0))
        .sum();

    let years = (total_months as f64 / 12.0).round();
    if years <= 0.0 {
        0
    } else {
        years as u32
    }
}

/// 依出現頻率將技術分為主力 / 輔助 / 關注三層
pub fn analyze_tech_stack(experience: &[ExperienceEntry], skills: &[SkillCategory]) -> TechStack {
    // 保留首次出現順序，讓同權重的項目排序穩定
    let mut order: Vec<String> = Vec::new();
    let mut weights: HashMap<String, f64> = HashMap::new();

    for tech in experience.iter().flat_map(|exp| exp.tech_stack.iter()) {
        let tech = tech.trim();
        if tech.is_empty() {
            continue;
        }
        match weights.get_mut(tech) {
            Some(weight) => *weight += 1.0,
            None => {
                order.push(tech.to_string());
                weights.insert(tech.to_string(), 1.0);
            }
        }
    }

    for item in skills.iter().flat_map(|category| category.items.iter()) {
        let item = item.trim();
        if item.is_empty() || weights.contains_key(item) {
            continue;
        }
        order.push(item.to_string());
        weights.insert(item.to_string(), SKILL_ONLY_WEIGHT);
    }

    let mut ranked: Vec<(String, f64)> = order
        .into_iter()
        .map(|tech| {
            let weight = weights.get(&tech).copied().unwrap_or(0.0);
            (tech, weight)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let tier = |skip: usize| -> Vec<String> {
        ranked
            .iter()
            .skip(skip)
            .take(TIER_SIZE)
            .map(|(tech, _)| tech.clone())
            .collect()
    };

    TechStack {
        primary: tier(0),
        secondary: tier(TIER_SIZE),
        interest: tier(TIER_SIZE * 2),
    }
}

/// 由最近三筆經歷的職位 / 專案 / 描述推測偏好職務
pub fn extract_preferred_roles(experience: &[ExperienceEntry]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    let mut add = |role: &str| {
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
    };

    for exp in experience.iter().take(RECENT_ENTRIES) {
        let position = exp.position.as_deref().unwrap_or_default().to_lowercase();
        let project = exp.project.as_deref().unwrap_or_default().to_lowercase();
        let description = exp.description.as_deref().unwrap_or_default().to_lowercase();

        if contains_any(&position, &["프리랜서", "차장", "부장", "수석", "책임", "senior", "lead"]) {
            add("시니어 개발자");
        }
        if contains_any(&description, &["설계", "아키텍처", "구조", "architect"]) {
            add("아키텍트");
        }
        if contains_any(&description, &["백엔드", "api", "backend"]) {
            add("백엔드 개발자");
        }
        if contains_any(&description, &["풀스택", "full"]) {
            add("풀스택 개발자");
        }
        if project.contains("si") || contains_any(&description, &["프로젝트", "project"]) {
            add("프로젝트 개발자");
        }
    }

    roles
}

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
