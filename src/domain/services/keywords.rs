use crate::domain::model::CandidateProfile;

const SENIOR_KEYWORDS: [&str; 3] = ["시니어", "Senior", "Lead"];

/// 依求職者輪廓產生搜尋關鍵字（主力技術優先）
pub fn generate_search_keywords(profile: &CandidateProfile) -> Vec<String> {
    let mut keywords: Vec<String> = profile.tech_stack.primary.iter().take(3).cloned().collect();

    if profile.is_senior() {
        keywords.extend(SENIOR_KEYWORDS.iter().map(|k| k.to_string()));
    }

    if let Some(role) = profile.preferred_roles.first() {
        keywords.push(role.clone());
    }

    let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if !unique.contains(&keyword) {
            unique.push(keyword);
        }
    }
    unique
}
