// src/types/ids.rs
//! Server-assigned identifiers. Zero, negative and non-numeric values are
//! not representable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(NonZeroU64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VacancyId(NonZeroU64);

impl ResumeId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        id_from_json(value).map(Self)
    }
}

impl VacancyId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        id_from_json(value).map(Self)
    }
}

impl From<NonZeroU64> for ResumeId {
    fn from(raw: NonZeroU64) -> Self {
        Self(raw)
    }
}

impl From<ResumeId> for NonZeroU64 {
    fn from(id: ResumeId) -> Self {
        id.0
    }
}

impl From<NonZeroU64> for VacancyId {
    fn from(raw: NonZeroU64) -> Self {
        Self(raw)
    }
}

impl From<VacancyId> for NonZeroU64 {
    fn from(id: VacancyId) -> Self {
        id.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VacancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResumeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<NonZeroU64>().map(Self)
    }
}

impl FromStr for VacancyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<NonZeroU64>().map(Self)
    }
}

/// Accept integers and numeric strings, servers are not consistent about it
pub(crate) fn id_from_json(value: &Value) -> Option<NonZeroU64> {
    match value {
        Value::Number(n) => n.as_u64().and_then(NonZeroU64::new),
        Value::String(s) => s.trim().parse::<NonZeroU64>().ok(),
        _ => None,
    }
}
