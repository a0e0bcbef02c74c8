/// Admin endpoints
///
/// GET  /admin/export/      → { "exported": [file names] }
/// POST /admin/import/      multipart `files` → { "imported": [file names] }
/// POST /admin/delete_all/  → { "message": "All data deleted" }

use crate::{
    admin::{self, TransferError, UploadedFile},
    api::{ApiError, AppState},
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

/// Uploaded CSV bundles can be much larger than the default 2 MiB body limit
const MAX_IMPORT_BYTES: usize = 64 * 1024 * 1024;

/// Multipart field that carries the CSV files
const UPLOAD_FIELD: &str = "files";

pub fn create_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/export", get(export_tables))
        .route("/admin/export/", get(export_tables))
        .route("/admin/import", post(import_tables))
        .route("/admin/import/", post(import_tables))
        .route("/admin/delete_all", post(delete_all_data))
        .route("/admin/delete_all/", post(delete_all_data))
        .layer(DefaultBodyLimit::max(MAX_IMPORT_BYTES))
}

async fn export_tables(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match admin::export_tables(&state.pool, &state.export_dir).await {
        Ok(exported) => Ok(Json(json!({ "exported": exported }))),
        Err(e) => {
            tracing::error!("❌ Export failed: {}", e);
            Err(ApiError::internal(format!("Export failed: {}", e)))
        }
    }
}

async fn import_tables(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Import failed: {}", e)))?
    {
        // Other plain form fields are not uploads; a nameless `files` part is
        let Some(file_name) = field.file_name().map(str::to_string) else {
            if field.name() == Some(UPLOAD_FIELD) {
                return Err(ApiError::bad_request(format!(
                    "Import failed: {}",
                    TransferError::MissingFileName
                )));
            }
            continue;
        };
        let contents = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Import failed: {}", e)))?;
        files.push(UploadedFile { file_name, contents: contents.to_vec() });
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("Import failed: no files uploaded"));
    }

    tracing::info!("📥 Importing {} files", files.len());
    match admin::import_files(&state.pool, &files).await {
        Ok(imported) => Ok(Json(json!({ "imported": imported }))),
        Err(e) => {
            tracing::warn!("❌ Import rolled back: {}", e);
            Err(ApiError::bad_request(format!("Import failed: {}", e)))
        }
    }
}

async fn delete_all_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    match admin::delete_all(&state.pool).await {
        Ok(()) => {
            tracing::warn!("🧹 All projects and tasks deleted");
            Ok(Json(json!({ "message": "All data deleted" })))
        }
        Err(e) => {
            tracing::error!("❌ Delete failed: {:#}", e);
            Err(ApiError::internal(format!("Delete failed: {}", e)))
        }
    }
}
