use crate::domain::model::ResumeDocument;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug, Clone)]
#[command(name = "job-search")]
#[command(about = "Search Korean job boards and rank listings against a resume")]
pub struct CliConfig {
    #[arg(long, help = "Path to a resume JSON document")]
    pub resume: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Search skills (overrides resume keywords)")]
    pub skills: Vec<String>,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Pretty-print the JSON response")]
    pub pretty: bool,
}

impl CliConfig {
    /// 讀取履歷 JSON；未指定時回傳 `None`
    pub fn load_resume(&self) -> Result<Option<ResumeDocument>> {
        let Some(path) = &self.resume else {
            return Ok(None);
        };

        let content = std::fs::read_to_string(path)?;
        let resume = serde_json::from_str(&content)?;
        tracing::debug!(path = %path, "Resume loaded");
        Ok(Some(resume))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        for (field, path) in [("resume", &self.resume), ("config", &self.config)] {
            if let Some(path) = path {
                validate_non_empty_string(field, path)?;
                if !Path::new(path).is_file() {
                    return Err(SearchError::InvalidConfigValueError {
                        field: field.to_string(),
                        value: path.clone(),
                        reason: "File does not exist".to_string(),
                    });
                }
            }
        }

        for skill in &self.skills {
            validate_non_empty_string("skills", skill)?;
        }

        Ok(())
    }
}
