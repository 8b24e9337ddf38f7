use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use uuid::Uuid;

use super::repository::PersonRepositoryError;

/// Identifier allocated by a person store.
///
/// The in-memory store hands out small integers, the postgres store
/// hands out UUIDs. Both travel through the same routes, so the raw path
/// segment is parsed into whichever shape it matches and each store
/// decides what to do with the other one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PersonId {
    Numeric(u32),
    Uuid(Uuid),
}

impl FromStr for PersonId {
    type Err = PersonRepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u32::from_str` would also take a leading `+`.
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse::<u32>()
                .map(Self::Numeric)
                .map_err(|_| PersonRepositoryError::InvalidId);
        }
        Uuid::from_str(s)
            .map(Self::Uuid)
            .map_err(|_| PersonRepositoryError::InvalidId)
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonId::Numeric(id) => write!(f, "{}", id),
            PersonId::Uuid(uid) => write!(f, "{}", uid),
        }
    }
}
