/// Task management module
///
/// Task records, their request payloads, and the SQLite repository.

pub mod repository;
pub mod types;

pub use repository::TaskRepository;
pub use types::{Task, TaskCreate, TaskUpdate};
