/// Text search across projects and tasks
///
/// Case-insensitive substring matching on titles/names and descriptions.
/// Title hits rank above description hits, projects above tasks, and newer
/// records above older ones.

use crate::store::{decode_timestamp, decode_uuid};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use std::cmp::Reverse;
use uuid::Uuid;

/// Queries shorter than this return nothing
pub const MIN_QUERY_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Project,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Title,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: HitKind,
    /// Project name or task title
    pub title: String,
    pub description: Option<String>,
    /// Owning project, tasks only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    pub match_type: MatchType,
    pub updated_at: DateTime<Utc>,
}

pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<SearchHit>> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_LENGTH {
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();

    // SQLite's LIKE only folds ASCII case, so rows are filtered here
    let projects = sqlx::query("SELECT id, name, description, updated_at FROM projects")
        .fetch_all(pool)
        .await?;
    for row in &projects {
        let name: String = row.try_get("name")?;
        let description: Option<String> = row.try_get("description")?;
        let Some(match_type) = match_type(&name, description.as_deref(), &needle) else {
            continue;
        };
        let id: String = row.try_get("id")?;
        let updated_at: String = row.try_get("updated_at")?;
        hits.push(SearchHit {
            id: decode_uuid(&id)?,
            kind: HitKind::Project,
            title: name,
            description,
            project_id: None,
            match_type,
            updated_at: decode_timestamp(&updated_at)?,
        });
    }

    let tasks = sqlx::query("SELECT id, title, description, project_id, updated_at FROM tasks")
        .fetch_all(pool)
        .await?;
    for row in &tasks {
        let title: String = row.try_get("title")?;
        let description: Option<String> = row.try_get("description")?;
        let Some(match_type) = match_type(&title, description.as_deref(), &needle) else {
            continue;
        };
        let id: String = row.try_get("id")?;
        let updated_at: String = row.try_get("updated_at")?;
        let project_id: Option<String> = row.try_get("project_id")?;
        hits.push(SearchHit {
            id: decode_uuid(&id)?,
            kind: HitKind::Task,
            title,
            description,
            project_id: project_id.as_deref().map(decode_uuid).transpose()?,
            match_type,
            updated_at: decode_timestamp(&updated_at)?,
        });
    }

    hits.sort_by_key(|hit| (hit.match_type, hit.kind, Reverse(hit.updated_at)));
    tracing::debug!("🔎 Search '{}' matched {} records", needle, hits.len());
    Ok(hits)
}

/// Where `needle` (already lowercased) occurs, preferring the title
fn match_type(title: &str, description: Option<&str>, needle: &str) -> Option<MatchType> {
    if title.to_lowercase().contains(needle) {
        Some(MatchType::Title)
    } else if description.is_some_and(|d| d.to_lowercase().contains(needle)) {
        Some(MatchType::Description)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        project::{ProjectCreate, ProjectRepository},
        store::Database,
        task::{TaskCreate, TaskRepository},
    };

    #[tokio::test]
    async fn title_matches_rank_before_description_matches() {
        let db = Database::open_in_memory().await.unwrap();
        let projects = ProjectRepository::new(db.pool().clone());
        let tasks = TaskRepository::new(db.pool().clone());

        tasks
            .create(TaskCreate {
                title: "Book venue".into(),
                description: Some("for the launch party".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let task_hit = tasks
            .create(TaskCreate { title: "Launch checklist".into(), ..Default::default() })
            .await
            .unwrap();
        let project_hit = projects
            .create(ProjectCreate { name: "Product LAUNCH".into(), description: None })
            .await
            .unwrap();
        projects
            .create(ProjectCreate { name: "Unrelated".into(), description: None })
            .await
            .unwrap();

        let hits = search(db.pool(), "launch").await.unwrap();
        let order: Vec<_> = hits.iter().map(|h| (h.kind, h.match_type, h.title.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (HitKind::Project, MatchType::Title, "Product LAUNCH"),
                (HitKind::Task, MatchType::Title, "Launch checklist"),
                (HitKind::Task, MatchType::Description, "Book venue"),
            ]
        );
        assert_eq!(hits[0].id, project_hit.id);
        assert_eq!(hits[1].id, task_hit.id);
    }

    #[tokio::test]
    async fn short_queries_and_wildcards_match_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        ProjectRepository::new(db.pool().clone())
            .create(ProjectCreate { name: "Alpha".into(), description: None })
            .await
            .unwrap();

        assert!(search(db.pool(), " a ").await.unwrap().is_empty());
        assert!(search(db.pool(), "%%").await.unwrap().is_empty());
        assert_eq!(search(db.pool(), "alp").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn matching_folds_non_ascii_case() {
        let db = Database::open_in_memory().await.unwrap();
        let projects = ProjectRepository::new(db.pool().clone());
        let project = projects
            .create(ProjectCreate { name: "Über Launch".into(), description: None })
            .await
            .unwrap();
        TaskRepository::new(db.pool().clone())
            .create(TaskCreate {
                title: "Visa".into(),
                description: Some("ÉTÉ trip".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        for query in ["über", "Über", "ÜBER"] {
            let hits = search(db.pool(), query).await.unwrap();
            assert_eq!(hits.len(), 1, "query {query:?}");
            assert_eq!(hits[0].id, project.id);
        }

        let hits = search(db.pool(), "été").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].match_type, MatchType::Description);
    }
}
