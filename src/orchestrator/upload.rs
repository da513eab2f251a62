// src/orchestrator/upload.rs
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::service_client::{ApiGateway, FilePart, RequestBody, UPLOAD_RESUME_ENDPOINT};
use crate::error::{Failure, FailureKind, LOGIN_REQUIRED};
use crate::orchestrator::SequencedState;
use crate::session::{SelectionKind, SessionStore};
use crate::types::{ParsedResume, ResumeId, UploadReceipt};
use crate::utils::resume_content_type;

const RESUME_FIELD: &str = "resume";
const DEFAULT_FILE_NAME: &str = "resume";

pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const NO_FILE_SELECTED: &str = "Please select a file to upload.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeState {
    Undefined,
    Pending,
    Resolved {
        id: ResumeId,
        parsed: Option<ParsedResume>,
    },
    /// `previous` is the last resolved handle, still valid and still persisted
    Failed {
        failure: Failure,
        previous: Option<ResumeId>,
    },
}

impl ResumeState {
    /// The handle a match request may use right now
    pub fn resolved_id(&self) -> Option<ResumeId> {
        match self {
            ResumeState::Resolved { id, .. } => Some(*id),
            ResumeState::Failed { previous, .. } => *previous,
            ResumeState::Undefined | ResumeState::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ResumeState::Pending)
    }
}

pub struct UploadOrchestrator {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
    state: SequencedState<ResumeState>,
}

impl UploadOrchestrator {
    /// Starts resolved when the session already remembers a résumé
    pub fn new(gateway: Arc<ApiGateway>, session: Arc<SessionStore>) -> Self {
        let initial = match session.resume_id() {
            Some(id) => ResumeState::Resolved { id, parsed: None },
            None => ResumeState::Undefined,
        };

        Self {
            gateway,
            session,
            state: SequencedState::new(initial),
        }
    }

    pub fn state(&self) -> ResumeState {
        self.state.current()
    }

    /// Upload one résumé file and resolve its server identifier. A newer
    /// upload supersedes this one if it starts before this one settles.
    pub async fn upload_resume(&self, file_name: &str, bytes: Vec<u8>) -> ResumeState {
        if bytes.is_empty() {
            return self.reject(Failure::precondition(NO_FILE_SELECTED));
        }
        if self.session.credential().is_none() {
            return self.reject(Failure::precondition(LOGIN_REQUIRED));
        }

        let file_name = if file_name.trim().is_empty() {
            DEFAULT_FILE_NAME
        } else {
            file_name.trim()
        };

        let ticket = self.state.begin(|_| ResumeState::Pending);
        info!("Uploading resume {} ({} bytes)", file_name, bytes.len());

        let part = FilePart {
            field: RESUME_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: resume_content_type(file_name).to_string(),
            bytes,
        };

        let outcome = self
            .gateway
            .request(
                Method::POST,
                UPLOAD_RESUME_ENDPOINT,
                RequestBody::Multipart(part),
                true,
            )
            .await;

        let next = match outcome {
            Ok(payload) => match UploadReceipt::from_payload(&payload) {
                Some(receipt) => ResumeState::Resolved {
                    id: receipt.resume_id,
                    parsed: receipt.parsed,
                },
                None => {
                    warn!("Upload response carried no resume identifier: {}", payload);
                    self.failed(Failure::new(
                        FailureKind::TransportFailure,
                        "Upload response did not include a resume identifier.",
                    ))
                }
            },
            Err(e) => {
                warn!("Resume upload failed: {}", e);
                self.failed(Failure::from_api(&e, UPLOAD_FAILED))
            }
        };

        let persist = |applied: &ResumeState| {
            if let ResumeState::Resolved { id, .. } = applied {
                self.session.set_selection(SelectionKind::Resume, (*id).into());
                info!("Resume {} resolved", id);
            }
        };

        match self.state.settle_with(ticket, |_| next, persist) {
            Some(applied) => applied,
            None => {
                debug!("Discarding superseded upload of {}", file_name);
                self.state.current()
            }
        }
    }

    fn reject(&self, failure: Failure) -> ResumeState {
        info!("Upload refused: {}", failure.reason);
        let next = self.failed(failure);
        self.state.replace(|_| next)
    }

    fn failed(&self, failure: Failure) -> ResumeState {
        ResumeState::Failed {
            failure,
            previous: self.session.resume_id(),
        }
    }
}
