/// Background work
///
/// Work that runs beside request handling rather than inside it. Currently
/// the deferred "touch project" worker that refreshes `last_accessed`.

// Channel-fed worker applying project access touches
pub mod tracker;

pub use tracker::AccessTracker;
