/// Admin bulk transfer
///
/// Whole-database operations driven by the static table descriptors in
/// [`crate::store::schema`]:
/// - CSV export of every table to the export directory
/// - Atomic CSV import of uploaded files
/// - Irreversible bulk delete

pub mod error;
pub mod export;
pub mod import;
pub mod purge;

pub use error::{FieldError, TransferError};
pub use export::export_tables;
pub use import::{import_files, UploadedFile};
pub use purge::delete_all;
