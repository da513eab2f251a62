// src/orchestrator/matching.rs
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::service_client::{ApiGateway, RequestBody, MATCH_RESUME_ENDPOINT};
use crate::error::{Failure, FailureKind};
use crate::orchestrator::SequencedState;
use crate::session::SessionStore;
use crate::types::{MatchFeedback, MatchResult, ResumeId, VacancyId};

pub const MATCH_FAILED: &str = "Failed to match resume. Please try again.";
pub const SELECTION_REQUIRED: &str = "Please select a vacancy and upload a resume first.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MatchState {
    #[default]
    Idle,
    Pending,
    Resolved(MatchResult),
    Failed(Failure),
}

pub struct MatchOrchestrator {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
    state: SequencedState<MatchState>,
}

impl MatchOrchestrator {
    pub fn new(gateway: Arc<ApiGateway>, session: Arc<SessionStore>) -> Self {
        Self {
            gateway,
            session,
            state: SequencedState::new(MatchState::Idle),
        }
    }

    pub fn state(&self) -> MatchState {
        self.state.current()
    }

    /// Match the résumé and vacancy currently selected in the session
    pub async fn request_match_for_session(&self) -> MatchState {
        let resume = self.session.resume_id();
        let vacancy = self.session.vacancy_id();
        self.request_match(resume, vacancy).await
    }

    /// Submit one correlated match request. Any request still in flight is
    /// superseded: its response, whenever it arrives, is discarded.
    pub async fn request_match(
        &self,
        resume: Option<ResumeId>,
        vacancy: Option<VacancyId>,
    ) -> MatchState {
        let (resume, vacancy) = match (resume, vacancy) {
            (Some(resume), Some(vacancy)) => (resume, vacancy),
            _ => {
                info!(
                    "Match refused: resume={:?}, vacancy={:?}",
                    resume.map(ResumeId::get),
                    vacancy.map(VacancyId::get)
                );
                let failure = Failure::precondition(SELECTION_REQUIRED);
                return self.state.replace(|_| MatchState::Failed(failure));
            }
        };

        let ticket = self.state.begin(|_| MatchState::Pending);
        info!("Requesting match of resume {} against vacancy {}", resume, vacancy);

        let body = RequestBody::Json(serde_json::json!({
            "resume_id": resume.get(),
            "vacancy_id": vacancy.get(),
        }));

        let outcome = self
            .gateway
            .request(Method::POST, MATCH_RESUME_ENDPOINT, body, true)
            .await;

        let next = match outcome {
            Ok(payload) => decode_feedback(payload),
            Err(e) => {
                warn!("Match request failed: {}", e);
                MatchState::Failed(Failure::from_api(&e, MATCH_FAILED))
            }
        };

        match self.state.settle(ticket, |_| next) {
            Some(applied) => {
                if let MatchState::Resolved(result) = &applied {
                    info!(
                        "Match of resume {} against vacancy {} scored {}",
                        resume,
                        vacancy,
                        result.score.label()
                    );
                }
                applied
            }
            None => {
                debug!(
                    "Discarding superseded match of resume {} against vacancy {}",
                    resume, vacancy
                );
                self.state.current()
            }
        }
    }
}

fn decode_feedback(payload: serde_json::Value) -> MatchState {
    let feedback: MatchFeedback = match serde_json::from_value(payload) {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!("Undecodable match feedback: {}", e);
            return MatchState::Failed(Failure::new(FailureKind::TransportFailure, MATCH_FAILED));
        }
    };

    match feedback.into_result() {
        Some(result) => MatchState::Resolved(result),
        None => {
            warn!("Match feedback carried no score");
            MatchState::Failed(Failure::new(FailureKind::TransportFailure, MATCH_FAILED))
        }
    }
}
