// src/types/mod.rs
pub mod ids;
pub mod response;
pub mod vacancy;

pub use ids::{ResumeId, VacancyId};
pub use response::{MatchFeedback, MatchResult, ParsedResume, Score, UploadReceipt, UserProfile};
pub use vacancy::{Vacancy, VacancyDraft};
