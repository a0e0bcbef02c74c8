/// CSV export
///
/// Dumps every table in [`TABLES`] to `<table>_<YYYYMMDD_HHMMSS>.csv` inside
/// the export directory. One timestamp is shared by all files of a run.

use crate::{
    admin::error::TransferError,
    store::schema::{ColumnKind, TableSchema, TABLES},
};
use chrono::Utc;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use std::path::Path;

/// Export all tables and return the generated file names (not paths)
///
/// Every table is read inside one transaction, so the files form a single
/// consistent snapshot that can be imported back as a set.
pub async fn export_tables(pool: &SqlitePool, export_dir: &Path) -> Result<Vec<String>, TransferError> {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();

    let mut rendered = Vec::with_capacity(TABLES.len());
    let mut tx = pool.begin().await?;
    for table in TABLES {
        let file_name = format!("{}_{}.csv", table.name, timestamp);
        let rows = sqlx::query(&format!("SELECT {} FROM {}", table.column_list(), table.name))
            .fetch_all(&mut *tx)
            .await?;
        let contents = render_table(table, &rows, &file_name)?;
        tracing::debug!("📄 Rendered {} rows for {}", rows.len(), file_name);
        rendered.push((file_name, contents));
    }
    tx.commit().await?;

    tokio::fs::create_dir_all(export_dir).await?;
    let mut exported = Vec::with_capacity(rendered.len());
    for (file_name, contents) in rendered {
        tokio::fs::write(export_dir.join(&file_name), contents).await?;
        exported.push(file_name);
    }

    tracing::info!("📤 Exported {} tables to {}", exported.len(), export_dir.display());
    Ok(exported)
}

/// CSV bytes for one table: header row, then one record per row
fn render_table(table: &TableSchema, rows: &[SqliteRow], file_name: &str) -> Result<Vec<u8>, TransferError> {
    let write_error = |source| TransferError::Write { file: file_name.to_string(), source };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns.iter().map(|c| c.name))
        .map_err(write_error)?;

    for row in rows {
        let mut record = Vec::with_capacity(table.columns.len());
        for (index, column) in table.columns.iter().enumerate() {
            record.push(render_field(row, index, column.kind)?);
        }
        writer.write_record(&record).map_err(write_error)?;
    }

    writer.into_inner().map_err(|e| TransferError::Io(e.into_error()))
}

/// Natural text form of one column; NULL becomes the empty string.
///
/// Identifiers and timestamps are already stored in their text form.
fn render_field(row: &SqliteRow, index: usize, kind: ColumnKind) -> Result<String, TransferError> {
    let text = match kind {
        ColumnKind::Boolean => row
            .try_get::<Option<bool>, _>(index)?
            .map(|flag| flag.to_string()),
        ColumnKind::Identifier | ColumnKind::Timestamp | ColumnKind::Text => {
            row.try_get::<Option<String>, _>(index)?
        }
    };
    Ok(text.unwrap_or_default())
}
