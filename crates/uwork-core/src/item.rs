use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of an item. Only two values exist; the store enforces
/// this with a CHECK constraint as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Planned,
    Completed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Planned => "planned",
            Status::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Status::Planned),
            "completed" => Ok(Status::Completed),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// One of the four fixed dimensions of useful work an item moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Existence,
    Recipient,
    Purpose,
    Elegance,
}

impl Axis {
    pub fn all() -> &'static [Axis] {
        &[Axis::Existence, Axis::Recipient, Axis::Purpose, Axis::Elegance]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Existence => "existence",
            Axis::Recipient => "recipient",
            Axis::Purpose => "purpose",
            Axis::Elegance => "elegance",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Axis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "existence" => Ok(Axis::Existence),
            "recipient" => Ok(Axis::Recipient),
            "purpose" => Ok(Axis::Purpose),
            "elegance" => Ok(Axis::Elegance),
            other => Err(CoreError::InvalidAxis(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A unit of planned or completed work — the sole persisted entity.
///
/// `axes` is stored as a JSON-encoded array in the database but always
/// decoded before leaving the store. Order is preserved as submitted.
/// `completed_at` is present iff `status == Completed`; the service layer
/// maintains that invariant on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub text: String,
    pub axes: Vec<Axis>,
    pub status: Status,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub updated_at: String,
}

/// Fields accepted by a partial update. Absent fields retain their prior
/// value (COALESCE semantics in the store).
#[derive(Debug, Clone, Default)]
pub struct UpdateFields {
    pub text: Option<String>,
    pub axes: Option<Vec<Axis>>,
    pub status: Option<Status>,
}
