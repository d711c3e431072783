use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Unix timestamp in seconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, sqlx::Type)]
#[sqlx(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }
}
impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match DateTime::<Utc>::from_timestamp(self.0, 0) {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => Err(serde::ser::Error::custom(format!(
                "Timestamp out of range: {}",
                self.0
            ))),
        }
    }
}

/// Creation and modification time carried by every stored row.
///
/// Set by the storage layer, never by callers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, sqlx::FromRow)]
pub struct Timestamps {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Timestamp::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
