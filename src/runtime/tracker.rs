/// Deferred project access tracking
///
/// Reading a project should refresh its `last_accessed` time without making
/// the reader wait for the write. Handlers submit project ids to a channel;
/// a background worker drains it and applies the touches one by one.

use crate::project::ProjectRepository;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Handle for submitting project accesses to the background worker
#[derive(Debug, Clone)]
pub struct AccessTracker {
    sender: mpsc::UnboundedSender<Uuid>,
}

impl AccessTracker {
    /// Start the worker on the current tokio runtime.
    ///
    /// The worker runs until every `AccessTracker` clone has been dropped.
    pub fn spawn(projects: ProjectRepository) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Uuid>();

        tokio::spawn(async move {
            tracing::debug!("👣 Access tracker started");
            while let Some(project_id) = receiver.recv().await {
                if let Err(e) = projects.touch(project_id).await {
                    tracing::warn!("⚠️ Failed to record access for project {}: {}", project_id, e);
                }
            }
            tracing::debug!("👣 Access tracker stopped");
        });

        Self { sender }
    }

    /// Queue a touch for `project_id`. Never blocks and never fails the caller.
    pub fn record(&self, project_id: Uuid) {
        if self.sender.send(project_id).is_err() {
            tracing::warn!("⚠️ Access tracker is not running; dropping access for project {}", project_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{project::ProjectCreate, store::Database};
    use std::time::Duration;

    #[tokio::test]
    async fn recorded_access_is_applied_in_the_background() {
        let db = Database::open_in_memory().await.unwrap();
        let projects = ProjectRepository::new(db.pool().clone());
        let project = projects
            .create(ProjectCreate { name: "Garden".into(), description: None })
            .await
            .unwrap();

        let tracker = AccessTracker::spawn(projects.clone());
        tokio::time::sleep(Duration::from_millis(2)).await;
        tracker.record(project.id);

        let mut touched = false;
        for _ in 0..100 {
            let current = projects.get(project.id).await.unwrap().unwrap();
            if current.last_accessed > project.last_accessed {
                touched = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(touched, "last_accessed was never refreshed");
    }

    #[tokio::test]
    async fn unknown_projects_are_ignored() {
        let db = Database::open_in_memory().await.unwrap();
        let tracker = AccessTracker::spawn(ProjectRepository::new(db.pool().clone()));
        tracker.record(Uuid::new_v4());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(db.row_counts().await.unwrap(), (0, 0));
    }
}
