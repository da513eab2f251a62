// src/presenter.rs
//! Pure mapping from workflow lifecycles to renderable view state

use std::fmt;

use crate::error::FailureKind;
use crate::orchestrator::{MatchState, ResumeState};
use crate::types::{MatchFeedback, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    SkillGaps,
    SuggestedKeywords,
    KeywordOptimization,
    FormattingIssues,
    FormattingSuggestions,
    Recommendations,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 6] = [
        SectionKind::SkillGaps,
        SectionKind::SuggestedKeywords,
        SectionKind::KeywordOptimization,
        SectionKind::FormattingIssues,
        SectionKind::FormattingSuggestions,
        SectionKind::Recommendations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::SkillGaps => "Skill Gaps",
            Self::SuggestedKeywords => "Suggested Keywords",
            Self::KeywordOptimization => "Keyword Optimization",
            Self::FormattingIssues => "Formatting Issues",
            Self::FormattingSuggestions => "Formatting Suggestions",
            Self::Recommendations => "Recommendations",
        }
    }

    fn items<'a>(&self, feedback: &'a MatchFeedback) -> &'a [String] {
        match self {
            Self::SkillGaps => &feedback.skill_gaps,
            Self::SuggestedKeywords => &feedback.suggested_keywords,
            Self::KeywordOptimization => &feedback.keyword_optimization,
            Self::FormattingIssues => &feedback.formatting_issues,
            Self::FormattingSuggestions => &feedback.formatting_suggestions,
            Self::Recommendations => &feedback.recommendations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSection {
    pub kind: SectionKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreView {
    pub value: f64,
    pub label: String,
}

impl From<Score> for ScoreView {
    fn from(score: Score) -> Self {
        Self {
            value: score.value(),
            label: score.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchView {
    Idle,
    Loading,
    Error { kind: FailureKind, reason: String },
    Complete {
        score: ScoreView,
        sections: Vec<FeedbackSection>,
    },
}

/// Empty lists produce no section at all
pub fn present(state: &MatchState) -> MatchView {
    match state {
        MatchState::Idle => MatchView::Idle,
        MatchState::Pending => MatchView::Loading,
        MatchState::Failed(failure) => MatchView::Error {
            kind: failure.kind,
            reason: failure.reason.clone(),
        },
        MatchState::Resolved(result) => MatchView::Complete {
            score: result.score.into(),
            sections: SectionKind::ORDER
                .iter()
                .filter_map(|kind| {
                    let items = kind.items(&result.feedback);
                    if items.is_empty() {
                        None
                    } else {
                        Some(FeedbackSection {
                            kind: *kind,
                            items: items.to_vec(),
                        })
                    }
                })
                .collect(),
        },
    }
}

impl fmt::Display for MatchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchView::Idle => write!(f, "No match requested yet."),
            MatchView::Loading => write!(f, "Matching..."),
            MatchView::Error { reason, .. } => write!(f, "❌ {}", reason),
            MatchView::Complete { score, sections } => {
                write!(f, "✅ Match Score: {}", score.label)?;
                for section in sections {
                    write!(f, "\n\n{}:", section.kind.title())?;
                    for item in &section.items {
                        write!(f, "\n  - {}", item)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// One-line text for the upload lifecycle
pub fn present_upload(state: &ResumeState) -> String {
    match state {
        ResumeState::Undefined => "No resume uploaded yet.".to_string(),
        ResumeState::Pending => "Uploading...".to_string(),
        ResumeState::Resolved { id, parsed } => {
            let mut line = format!("✅ Resume {} uploaded.", id);
            if let Some(parsed) = parsed.as_ref().filter(|p| !p.skills.is_empty()) {
                line.push_str(&format!(" Skills found: {}", parsed.skills.join(", ")));
            }
            line
        }
        ResumeState::Failed { failure, previous } => match previous {
            Some(id) => format!("❌ {} (keeping resume {})", failure.reason, id),
            None => format!("❌ {}", failure.reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::types::{MatchResult, ParsedResume, ResumeId};
    use serde_json::json;

    fn resolved(payload: serde_json::Value) -> MatchState {
        let feedback: MatchFeedback = serde_json::from_value(payload).unwrap();
        MatchState::Resolved(feedback.into_result().unwrap())
    }

    #[test]
    fn test_idle_and_loading() {
        assert_eq!(present(&MatchState::Idle), MatchView::Idle);
        assert_eq!(present(&MatchState::Pending), MatchView::Loading);
    }

    #[test]
    fn test_single_section_from_keywords_only() {
        let view = present(&resolved(json!({
            "match_score": 0.4,
            "suggested_keywords": ["terraform", "aws"]
        })));

        match view {
            MatchView::Complete { sections, score } => {
                assert_eq!(score.label, "40%");
                assert_eq!(sections.len(), 1);
                assert_eq!(sections[0].kind, SectionKind::SuggestedKeywords);
                assert_eq!(sections[0].items, vec!["terraform", "aws"]);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_rating_with_skill_gaps() {
        let view = present(&resolved(json!({"rating": 8, "skill_gaps": ["Kubernetes"]})));

        match &view {
            MatchView::Complete { score, sections } => {
                assert_eq!(score.value, 8.0);
                assert_eq!(sections.len(), 1);
                assert_eq!(sections[0].kind, SectionKind::SkillGaps);
                assert_eq!(sections[0].items.len(), 1);
            }
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(
            view.to_string(),
            "✅ Match Score: 8/10\n\nSkill Gaps:\n  - Kubernetes"
        );
    }

    #[test]
    fn test_sections_keep_fixed_order() {
        let view = present(&resolved(json!({
            "rating": 5,
            "recommendations": ["Improve formatting."],
            "formatting_suggestions": ["Missing 'Skills' section."],
            "keyword_optimization": ["pipeline"],
            "skill_gaps": ["go"],
            "resume_skills": ["python"]
        })));

        let kinds: Vec<SectionKind> = match view {
            MatchView::Complete { sections, .. } => sections.iter().map(|s| s.kind).collect(),
            other => panic!("unexpected view: {:?}", other),
        };
        assert_eq!(
            kinds,
            vec![
                SectionKind::SkillGaps,
                SectionKind::KeywordOptimization,
                SectionKind::FormattingSuggestions,
                SectionKind::Recommendations,
            ]
        );
    }

    #[test]
    fn test_error_view_carries_reason() {
        let state = MatchState::Failed(Failure::new(
            FailureKind::ClientRejected,
            "resume not found",
        ));
        let view = present(&state);

        assert_eq!(
            view,
            MatchView::Error {
                kind: FailureKind::ClientRejected,
                reason: "resume not found".to_string()
            }
        );
        assert_eq!(view.to_string(), "❌ resume not found");
    }

    #[test]
    fn test_complete_without_lists() {
        let state = MatchState::Resolved(MatchResult {
            score: Score::Rating(10.0),
            feedback: MatchFeedback::default(),
        });
        assert_eq!(present(&state).to_string(), "✅ Match Score: 10/10");
    }

    #[test]
    fn test_present_upload() {
        let id = ResumeId::new(42).unwrap();
        let resolved = ResumeState::Resolved {
            id,
            parsed: Some(ParsedResume {
                skills: vec!["python".into(), "git".into()],
                ..Default::default()
            }),
        };
        assert_eq!(
            present_upload(&resolved),
            "✅ Resume 42 uploaded. Skills found: python, git"
        );

        let failed = ResumeState::Failed {
            failure: Failure::precondition("Please log in first."),
            previous: Some(id),
        };
        assert_eq!(
            present_upload(&failed),
            "❌ Please log in first. (keeping resume 42)"
        );
    }
}
