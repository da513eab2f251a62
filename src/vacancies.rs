// src/vacancies.rs
use std::sync::Arc;
use tracing::info;

use crate::core::service_client::{ApiGateway, VACANCIES_ENDPOINT};
use crate::error::ApiError;
use crate::session::{SelectionKind, SessionStore};
use crate::types::{Vacancy, VacancyDraft, VacancyId};

pub struct VacancyClient {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
}

impl VacancyClient {
    pub fn new(gateway: Arc<ApiGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    pub async fn list(&self) -> Result<Vec<Vacancy>, ApiError> {
        self.gateway.get(VACANCIES_ENDPOINT, true).await
    }

    pub async fn get(&self, id: VacancyId) -> Result<Vacancy, ApiError> {
        self.gateway.get(&detail_path(id), true).await
    }

    /// Only recruiter and admin accounts may create; others get a rejection
    pub async fn create(&self, draft: &VacancyDraft) -> Result<Vacancy, ApiError> {
        let vacancy: Vacancy = self
            .gateway
            .post_json(VACANCIES_ENDPOINT, draft, true)
            .await?;
        info!("Created vacancy {}", vacancy.id);
        Ok(vacancy)
    }

    pub async fn update(&self, id: VacancyId, draft: &VacancyDraft) -> Result<Vacancy, ApiError> {
        let vacancy: Vacancy = self.gateway.put_json(&detail_path(id), draft, true).await?;
        info!("Updated vacancy {}", id);
        Ok(vacancy)
    }

    /// Deleting the selected vacancy also drops the selection
    pub async fn delete(&self, id: VacancyId) -> Result<(), ApiError> {
        self.gateway.delete(&detail_path(id), true).await?;
        if self.session.vacancy_id() == Some(id) {
            self.session.clear_selection(SelectionKind::Vacancy);
        }
        info!("Deleted vacancy {}", id);
        Ok(())
    }

    pub fn select(&self, id: VacancyId) {
        self.session.set_selection(SelectionKind::Vacancy, id.into());
        info!("Selected vacancy {}", id);
    }
}

fn detail_path(id: VacancyId) -> String {
    format!("{}{}/", VACANCIES_ENDPOINT, id)
}
