/// Project type definitions
///
/// A project owns an ordered collection of tasks and tracks when it was last
/// looked at, so the project list can surface recently used work first.

use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted project with its tasks embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned identifier
    pub id: Uuid,
    /// Human-readable name (required)
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Refreshed in the background whenever the project is read
    pub last_accessed: DateTime<Utc>,
    /// Owned tasks, most recently updated first
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Request body for project creation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for partial project updates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}
