/// Taskboard: project and task tracking backend
///
/// Projects own tasks; both are stored in SQLite and served over a JSON
/// REST API. The admin surface exports and imports whole tables as CSV.

// Core configuration and setup
pub mod config;

// SQLite pool, migrations and typed table descriptors
pub mod store;

// Partial-update payload helpers
pub mod patch;

// Projects and their repository
pub mod project;

// Tasks and their repository
pub mod task;

// Background access tracking (deferred "touch project")
pub mod runtime;

// CSV export/import and bulk delete
pub mod admin;

// Text search across projects and tasks
pub mod search;

// HTTP API layer - REST endpoints
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use api::AppState;
pub use project::{Project, ProjectRepository};
pub use server::{build_router, create_app, start_server};
pub use store::Database;
pub use task::{Task, TaskRepository};
