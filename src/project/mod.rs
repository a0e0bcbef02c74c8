/// Project management module
///
/// Projects group tasks. Deleting a project deletes its tasks, and reading a
/// project bumps its last-accessed time through the access tracker.

pub mod repository;
pub mod types;

pub use repository::ProjectRepository;
pub use types::{Project, ProjectCreate, ProjectUpdate};
