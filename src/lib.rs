// src/lib.rs
//! Client for the job-matching service: session, authenticated gateway,
//! résumé upload, vacancy matching and result presentation.

pub mod auth;
pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod orchestrator;
pub mod presenter;
pub mod session;
pub mod types;
pub mod utils;
pub mod vacancies;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthClient;
use crate::core::{ApiGateway, ConfigManager, HttpTransport, Transport};
use crate::orchestrator::{MatchOrchestrator, UploadOrchestrator};
use crate::session::{FileStorage, SessionStore};
use crate::vacancies::VacancyClient;

/// Every client wired over one session and one gateway
pub struct MatchClient {
    pub session: Arc<SessionStore>,
    pub gateway: Arc<ApiGateway>,
    pub auth: AuthClient,
    pub vacancies: VacancyClient,
    pub uploads: Arc<UploadOrchestrator>,
    pub matches: Arc<MatchOrchestrator>,
}

impl MatchClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        let gateway = Arc::new(ApiGateway::new(transport, session.clone()));

        Self {
            auth: AuthClient::new(gateway.clone(), session.clone()),
            vacancies: VacancyClient::new(gateway.clone(), session.clone()),
            uploads: Arc::new(UploadOrchestrator::new(gateway.clone(), session.clone())),
            matches: Arc::new(MatchOrchestrator::new(gateway.clone(), session.clone())),
            session,
            gateway,
        }
    }

    /// Session persisted at the configured path, HTTP against the configured
    /// server
    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        let storage = FileStorage::open(&config.session_path)?;
        let session = Arc::new(SessionStore::hydrate(storage));
        let transport = HttpTransport::new(&config.service.api_url, config.service.timeout_seconds)?;

        info!(
            "Client ready for {} (session at {})",
            config.service.api_url,
            config.session_path.display()
        );

        Ok(Self::new(Arc::new(transport), session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{MatchState, ResumeState};
    use crate::presenter::{present, present_upload, MatchView};
    use crate::testing::ScriptedTransport;
    use crate::types::{ResumeId, VacancyId};
    use serde_json::json;
    use std::path::Path;

    fn config_for(dir: &Path) -> ConfigManager {
        let session_path = dir.join("session.json").display().to_string();
        ConfigManager::load_from(
            move |key| match key {
                "JOBMATCH_SESSION_PATH" => Some(session_path.clone()),
                _ => None,
            },
            dir,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_select_upload_match() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = MatchClient::new(transport.clone(), Arc::new(SessionStore::in_memory()));

        transport.respond(200, json!({"access": "acc", "refresh": "ref"}));
        transport.respond(200, json!({"message": "Uploaded and parsed.", "resume_id": 42}));
        transport.respond(200, json!({"rating": 8, "skill_gaps": ["Kubernetes"]}));

        client.auth.login("alice", "secret").await.unwrap();
        client.vacancies.select(VacancyId::new(7).unwrap());

        let upload = client.uploads.upload_resume("cv.pdf", b"%PDF".to_vec()).await;
        assert_eq!(present_upload(&upload), "✅ Resume 42 uploaded.");

        let state = client.matches.request_match_for_session().await;
        assert!(matches!(state, MatchState::Resolved(_)));

        match present(&state) {
            MatchView::Complete { score, sections } => {
                assert_eq!(score.label, "8/10");
                assert_eq!(sections.len(), 1);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        match &calls[2].body {
            crate::core::service_client::RequestBody::Json(body) => {
                assert_eq!(body, &json!({"resume_id": 42, "vacancy_id": 7}));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_from_config_restores_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let first = MatchClient::from_config(&config).unwrap();
        first.vacancies.select(VacancyId::new(3).unwrap());
        first
            .session
            .set_selection(crate::session::SelectionKind::Resume, ResumeId::new(9).unwrap().into());
        drop(first);

        let second = MatchClient::from_config(&config).unwrap();
        assert_eq!(second.session.vacancy_id().map(VacancyId::get), Some(3));
        assert_eq!(
            second.uploads.state(),
            ResumeState::Resolved {
                id: ResumeId::new(9).unwrap(),
                parsed: None
            }
        );

        second.session.clear();
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_from_config_survives_unreadable_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        std::fs::write(&config.session_path, "{ truncated").unwrap();

        let client = MatchClient::from_config(&config).unwrap();
        assert!(client.session.credential().is_none());
        assert_eq!(client.session.vacancy_id(), None);

        std::fs::write(&config.session_path, r#"{"resume_id": 42, "access_token": "a"}"#).unwrap();
        let client = MatchClient::from_config(&config).unwrap();
        assert_eq!(client.session.resume_id().map(ResumeId::get), Some(42));
        assert!(client.session.credential().is_none());
    }
}
