// src/session/mod.rs
//! Session store: the credential and the current vacancy/résumé selections.
//!
//! The store is an explicit value handed to whoever needs it. It is built by
//! [`SessionStore::hydrate`] from a [`KeyValueStore`] and every mutation is
//! written through immediately, so hydrating again from the same storage
//! yields the same session. [`SessionStore::clear`] is the teardown.
//!
//! Persisted layout, one key per concept:
//!
//! | key | value |
//! |-----|-------|
//! | `access_token` | bearer access token |
//! | `refresh_token` | refresh token |
//! | `vacancy_id` | last selected vacancy |
//! | `resume_id` | last resolved résumé |
//!
//! Older clients wrote `vacancyId` and `resumeId`. Those are adopted on
//! hydrate when the canonical key is missing and deleted either way.

pub mod credential;
pub mod storage;

use anyhow::Result;
use std::num::NonZeroU64;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub use credential::Credential;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};

use crate::types::{ResumeId, VacancyId};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const VACANCY_KEY: &str = "vacancy_id";
pub const RESUME_KEY: &str = "resume_id";

const LEGACY_VACANCY_KEY: &str = "vacancyId";
const LEGACY_RESUME_KEY: &str = "resumeId";

const ALL_KEYS: [&str; 6] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    VACANCY_KEY,
    RESUME_KEY,
    LEGACY_VACANCY_KEY,
    LEGACY_RESUME_KEY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Vacancy,
    Resume,
}

impl SelectionKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Vacancy => VACANCY_KEY,
            Self::Resume => RESUME_KEY,
        }
    }

    fn legacy_key(&self) -> &'static str {
        match self {
            Self::Vacancy => LEGACY_VACANCY_KEY,
            Self::Resume => LEGACY_RESUME_KEY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub credential: Option<Credential>,
    pub vacancy: Option<VacancyId>,
    pub resume: Option<ResumeId>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Rebuild the session from storage, migrating legacy keys and dropping
    /// values that no longer parse
    pub fn hydrate(storage: impl KeyValueStore + 'static) -> Self {
        let store = Self {
            storage: Box::new(storage),
            state: Mutex::new(SessionState::default()),
        };

        {
            let mut state = store.lock();
            store.migrate_legacy_keys();
            *state = store.read_state();
            info!(
                "Session hydrated: authenticated={}, vacancy={:?}, resume={:?}",
                state.credential.is_some(),
                state.vacancy.map(VacancyId::get),
                state.resume.map(ResumeId::get)
            );
        }

        store
    }

    pub fn in_memory() -> Self {
        Self::hydrate(MemoryStorage::new())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.lock().credential.clone()
    }

    pub fn set_credential(&self, credential: Credential) {
        let mut state = self.lock();
        self.persist(
            self.storage.set(ACCESS_TOKEN_KEY, credential.access()),
            ACCESS_TOKEN_KEY,
        );
        self.persist(
            self.storage.set(REFRESH_TOKEN_KEY, credential.refresh()),
            REFRESH_TOKEN_KEY,
        );
        state.credential = Some(credential);
    }

    /// Logout or detected expiry. Selections survive.
    pub fn clear_credential(&self) {
        let mut state = self.lock();
        self.persist(self.storage.remove(ACCESS_TOKEN_KEY), ACCESS_TOKEN_KEY);
        self.persist(self.storage.remove(REFRESH_TOKEN_KEY), REFRESH_TOKEN_KEY);
        if state.credential.take().is_some() {
            info!("Credential cleared");
        }
    }

    pub fn selection(&self, kind: SelectionKind) -> Option<NonZeroU64> {
        let state = self.lock();
        match kind {
            SelectionKind::Vacancy => state.vacancy.map(Into::into),
            SelectionKind::Resume => state.resume.map(Into::into),
        }
    }

    /// Store a selection under its canonical key and drop the legacy one
    pub fn set_selection(&self, kind: SelectionKind, id: NonZeroU64) {
        let mut state = self.lock();
        self.persist(self.storage.set(kind.key(), &id.to_string()), kind.key());
        self.persist(self.storage.remove(kind.legacy_key()), kind.legacy_key());
        match kind {
            SelectionKind::Vacancy => state.vacancy = Some(id.into()),
            SelectionKind::Resume => state.resume = Some(id.into()),
        }
    }

    pub fn clear_selection(&self, kind: SelectionKind) {
        let mut state = self.lock();
        self.persist(self.storage.remove(kind.key()), kind.key());
        self.persist(self.storage.remove(kind.legacy_key()), kind.legacy_key());
        match kind {
            SelectionKind::Vacancy => state.vacancy = None,
            SelectionKind::Resume => state.resume = None,
        }
    }

    pub fn vacancy_id(&self) -> Option<VacancyId> {
        self.lock().vacancy
    }

    pub fn resume_id(&self) -> Option<ResumeId> {
        self.lock().resume
    }

    /// Teardown: forget everything this store ever persisted
    pub fn clear(&self) {
        let mut state = self.lock();
        for key in ALL_KEYS {
            self.persist(self.storage.remove(key), key);
        }
        *state = SessionState::default();
        info!("Session cleared");
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// In-memory state stays authoritative when the backend cannot be written
    fn persist(&self, result: Result<()>, key: &str) {
        if let Err(e) = result {
            warn!("Failed to persist session key {}: {:#}", key, e);
        }
    }

    fn migrate_legacy_keys(&self) {
        for kind in [SelectionKind::Vacancy, SelectionKind::Resume] {
            let Some(legacy) = self.storage.get(kind.legacy_key()) else {
                continue;
            };

            if self.storage.get(kind.key()).is_none() {
                info!(
                    "Migrating session key {} to {}",
                    kind.legacy_key(),
                    kind.key()
                );
                self.persist(self.storage.set(kind.key(), &legacy), kind.key());
            }
            self.persist(self.storage.remove(kind.legacy_key()), kind.legacy_key());
        }
    }

    fn read_state(&self) -> SessionState {
        SessionState {
            credential: self.read_credential(),
            vacancy: self.read_id(SelectionKind::Vacancy).map(VacancyId::from),
            resume: self.read_id(SelectionKind::Resume).map(ResumeId::from),
        }
    }

    fn read_credential(&self) -> Option<Credential> {
        let access = self
            .storage
            .get(ACCESS_TOKEN_KEY)
            .filter(|t| !t.trim().is_empty());
        let refresh = self
            .storage
            .get(REFRESH_TOKEN_KEY)
            .filter(|t| !t.trim().is_empty());

        match (access, refresh) {
            (Some(access), Some(refresh)) => Some(Credential::new(access, refresh)),
            (None, None) => None,
            _ => {
                warn!("Discarding incomplete stored credential");
                self.persist(self.storage.remove(ACCESS_TOKEN_KEY), ACCESS_TOKEN_KEY);
                self.persist(self.storage.remove(REFRESH_TOKEN_KEY), REFRESH_TOKEN_KEY);
                None
            }
        }
    }

    fn read_id(&self, kind: SelectionKind) -> Option<NonZeroU64> {
        let raw = self.storage.get(kind.key())?;
        match raw.trim().parse::<NonZeroU64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Discarding malformed {} value {:?}", kind.key(), raw);
                self.persist(self.storage.remove(kind.key()), kind.key());
                None
            }
        }
    }
}
