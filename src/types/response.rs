// src/types/response.rs
//! Payloads returned by the job-matching server

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::ids::ResumeId;

// ===== Auth =====

#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// ===== Resume upload =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub organizations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub resume_id: ResumeId,
    pub message: Option<String>,
    pub parsed: Option<ParsedResume>,
}

impl UploadReceipt {
    /// Read the upload response, `None` when it names no usable identifier
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let resume_id = ResumeId::from_json(payload.get("resume_id")?)?;
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let parsed = payload
            .get("parsed_data")
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        Some(Self {
            resume_id,
            message,
            parsed,
        })
    }
}

// ===== Matching =====

/// Structured feedback of the matching capability.
///
/// The server has produced two shapes for the same capability
/// (`match_score`/`suggested_keywords`/`formatting_issues` and
/// `rating`/`skill_gaps`/`formatting_suggestions`/`keyword_optimization`/
/// `recommendations`). Every field is optional here and every list decodes
/// to empty when missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFeedback {
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub match_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skill_gaps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub suggested_keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keyword_optimization: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub formatting_issues: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub formatting_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub resume_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub resume_excerpt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// `rating`, on a 0-10 scale
    Rating(f64),
    /// `match_score`, a similarity either in [0, 1] or already a percentage
    Similarity(f64),
}

impl Score {
    pub fn value(&self) -> f64 {
        match self {
            Score::Rating(v) | Score::Similarity(v) => *v,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Score::Rating(v) => format!("{}/10", format_number(*v)),
            Score::Similarity(v) => {
                let percent = if (0.0..=1.0).contains(v) { v * 100.0 } else { *v };
                format!("{}%", format_number(percent))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub score: Score,
    pub feedback: MatchFeedback,
}

impl MatchFeedback {
    /// `rating` wins when both scores are present
    pub fn score(&self) -> Option<Score> {
        self.rating
            .map(Score::Rating)
            .or_else(|| self.match_score.map(Score::Similarity))
    }

    pub fn into_result(self) -> Option<MatchResult> {
        let score = self.score()?;
        Some(MatchResult {
            score,
            feedback: self,
        })
    }
}

fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(other) => vec![other.to_string()],
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feedback_rating_shape() {
        let feedback: MatchFeedback = serde_json::from_value(json!({
            "rating": 8,
            "skill_gaps": ["Kubernetes"],
            "formatting_suggestions": null
        }))
        .unwrap();

        assert_eq!(feedback.score(), Some(Score::Rating(8.0)));
        assert_eq!(feedback.skill_gaps, vec!["Kubernetes"]);
        assert!(feedback.formatting_suggestions.is_empty());
        assert!(feedback.suggested_keywords.is_empty());
    }

    #[test]
    fn test_feedback_score_shape() {
        let feedback: MatchFeedback = serde_json::from_value(json!({
            "match_score": "0.42",
            "suggested_keywords": "docker",
            "formatting_issues": ["Missing 'Education' section.", null, 3]
        }))
        .unwrap();

        assert_eq!(feedback.score(), Some(Score::Similarity(0.42)));
        assert_eq!(feedback.suggested_keywords, vec!["docker"]);
        assert_eq!(
            feedback.formatting_issues,
            vec!["Missing 'Education' section.", "3"]
        );
    }

    #[test]
    fn test_rating_preferred_over_match_score() {
        let feedback: MatchFeedback =
            serde_json::from_value(json!({"match_score": 0.63, "rating": 6.3})).unwrap();
        assert_eq!(feedback.score(), Some(Score::Rating(6.3)));
    }

    #[test]
    fn test_feedback_without_score() {
        let feedback: MatchFeedback =
            serde_json::from_value(json!({"skill_gaps": ["go"]})).unwrap();
        assert!(feedback.into_result().is_none());
    }

    #[test]
    fn test_non_finite_scores_are_missing() {
        let feedback: MatchFeedback =
            serde_json::from_value(json!({"rating": "NaN", "match_score": "inf"})).unwrap();
        assert_eq!(feedback.score(), None);

        let feedback: MatchFeedback =
            serde_json::from_value(json!({"rating": "-Infinity", "match_score": 0.5})).unwrap();
        assert_eq!(feedback.score(), Some(Score::Similarity(0.5)));
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(Score::Rating(8.0).label(), "8/10");
        assert_eq!(Score::Rating(6.25).label(), "6.3/10");
        assert_eq!(Score::Similarity(0.534).label(), "53.4%");
        assert_eq!(Score::Similarity(72.0).label(), "72%");
    }

    #[test]
    fn test_upload_receipt() {
        let receipt = UploadReceipt::from_payload(&json!({
            "message": "Uploaded and parsed.",
            "resume_id": 42,
            "parsed_data": {"skills": ["python", "django", "git"], "organizations": [], "dates": ["2020"]}
        }))
        .unwrap();

        assert_eq!(receipt.resume_id.get(), 42);
        assert_eq!(receipt.message.as_deref(), Some("Uploaded and parsed."));
        assert_eq!(receipt.parsed.unwrap().skills.len(), 3);

        assert!(UploadReceipt::from_payload(&json!({"message": "ok"})).is_none());
        assert!(UploadReceipt::from_payload(&json!({"resume_id": 0})).is_none());
    }
}
