// src/types/vacancy.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ids::VacancyId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: VacancyId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated, as stored by the server
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub experience_required: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    /// Decimal amounts arrive as strings
    #[serde(default)]
    pub salary_min: Option<String>,
    #[serde(default)]
    pub salary_max: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recruiter: Option<u64>,
}

impl Vacancy {
    pub fn skills(&self) -> Vec<String> {
        self.required_skills
            .split(',')
            .map(|skill| skill.trim().to_lowercase())
            .filter(|skill| !skill.is_empty())
            .collect()
    }

    pub fn salary_range(&self) -> Option<String> {
        if self.salary_min.is_none() && self.salary_max.is_none() {
            return None;
        }
        let min = self.salary_min.as_deref().unwrap_or("Negotiable");
        let max = self.salary_max.as_deref().unwrap_or("Negotiable");
        Some(format!("{} - {}", min, max))
    }
}

/// Body of a create or update call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacancyDraft {
    pub title: String,
    pub description: String,
    pub required_skills: String,
    pub experience_required: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<String>,
}

fn default_job_type() -> String {
    "full_time".to_string()
}
