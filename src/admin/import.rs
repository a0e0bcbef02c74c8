/// CSV import
///
/// Each uploaded file is matched to a table by its name prefix, parsed with
/// the header row as column names, and every field is re-typed through the
/// column's [`ColumnKind`]. All files of one call share a single transaction.

use crate::{
    admin::error::{FieldError, TransferError},
    store::{
        self, encode_timestamp,
        schema::{Column, ColumnDefault, ColumnKind, TableSchema},
    },
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{sqlite::SqlitePool, Sqlite, Transaction};
use uuid::Uuid;

/// A file received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// One typed column value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Identifier(Uuid),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// A row ready for insertion: one slot per schema column, `None` is NULL
pub type StagedRow = Vec<Option<FieldValue>>;

/// Import every file atomically and return their names.
///
/// Nothing is committed unless every file resolves to a table and every
/// row parses and inserts cleanly.
pub async fn import_files(pool: &SqlitePool, files: &[UploadedFile]) -> Result<Vec<String>, TransferError> {
    let mut tx = pool.begin().await?;
    let mut imported = Vec::with_capacity(files.len());

    for file in files {
        let table = TableSchema::for_file_name(&file.file_name)
            .ok_or_else(|| TransferError::UnknownTable(file.file_name.clone()))?;

        let rows = parse_file(table, file)?;
        for row in &rows {
            insert_row(&mut tx, table, row).await?;
        }

        tracing::info!("📥 Staged {} rows from {} into {}", rows.len(), file.file_name, table.name);
        imported.push(file.file_name.clone());
    }

    tx.commit().await?;
    tracing::info!("✅ Imported {} files", imported.len());
    Ok(imported)
}

/// Parse one uploaded file into staged rows for `table`
pub fn parse_file(table: &TableSchema, file: &UploadedFile) -> Result<Vec<StagedRow>, TransferError> {
    let text = std::str::from_utf8(&file.contents)
        .map_err(|_| TransferError::Encoding { file: file.file_name.clone() })?;
    let text = text.trim_start_matches('\u{feff}');

    let csv_error = |source| TransferError::Csv { file: file.file_name.clone(), source };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    // Position of each schema column in the file, if the header names it
    let headers = reader.headers().map_err(csv_error)?.clone();
    let positions: Vec<Option<usize>> = table
        .columns
        .iter()
        .map(|column| headers.iter().position(|h| h.trim() == column.name))
        .collect();

    let now = store::now();
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = table
            .columns
            .iter()
            .zip(&positions)
            .map(|(column, position)| {
                let raw = position.and_then(|p| record.get(p));
                stage_field(column, raw, now)
            })
            .collect::<Result<StagedRow, FieldError>>()
            .map_err(|source| TransferError::InvalidRow {
                file: file.file_name.clone(),
                row: index + 1,
                source,
            })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Type a raw field, falling back to the column default when it is absent or empty
fn stage_field(column: &Column, raw: Option<&str>, now: DateTime<Utc>) -> Result<Option<FieldValue>, FieldError> {
    match raw.filter(|value| !value.is_empty()) {
        Some(value) => parse_field(column, value).map(Some),
        None => default_value(column, now),
    }
}

/// Re-type one non-empty field by its column kind
pub fn parse_field(column: &Column, raw: &str) -> Result<FieldValue, FieldError> {
    match column.kind {
        ColumnKind::Identifier => Uuid::parse_str(raw.trim())
            .map(FieldValue::Identifier)
            .map_err(|_| FieldError::InvalidIdentifier { column: column.name, value: raw.to_string() }),
        ColumnKind::Boolean => Ok(FieldValue::Boolean(matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "1" | "yes"
        ))),
        ColumnKind::Timestamp => parse_timestamp(raw)
            .map(FieldValue::Timestamp)
            .ok_or_else(|| FieldError::InvalidTimestamp { column: column.name, value: raw.to_string() }),
        ColumnKind::Text => Ok(FieldValue::Text(raw.to_string())),
    }
}

fn default_value(column: &Column, now: DateTime<Utc>) -> Result<Option<FieldValue>, FieldError> {
    match column.default {
        ColumnDefault::Required => Err(FieldError::MissingColumn { column: column.name }),
        ColumnDefault::Null => Ok(None),
        ColumnDefault::NewIdentifier => Ok(Some(FieldValue::Identifier(Uuid::new_v4()))),
        ColumnDefault::Now => Ok(Some(FieldValue::Timestamp(now))),
        ColumnDefault::False => Ok(Some(FieldValue::Boolean(false))),
    }
}

/// ISO-8601 timestamps: with an offset, naive (taken as UTC), or a bare date
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

async fn insert_row(
    tx: &mut Transaction<'static, Sqlite>,
    table: &TableSchema,
    row: &StagedRow,
) -> Result<(), TransferError> {
    let placeholders = vec!["?"; table.columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        table.column_list(),
        placeholders
    );

    let mut query = sqlx::query(&sql);
    for value in row {
        query = match value {
            None => query.bind(None::<String>),
            Some(FieldValue::Identifier(id)) => query.bind(id.to_string()),
            Some(FieldValue::Boolean(flag)) => query.bind(*flag),
            Some(FieldValue::Timestamp(ts)) => query.bind(encode_timestamp(ts)),
            Some(FieldValue::Text(text)) => query.bind(text.clone()),
        };
    }
    query.execute(&mut **tx).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{PROJECTS, TASKS};
    use chrono::TimeZone;

    fn upload(name: &str, body: &str) -> UploadedFile {
        UploadedFile { file_name: name.to_string(), contents: body.as_bytes().to_vec() }
    }

    #[test]
    fn booleans_accept_only_the_truthy_spellings() {
        let completed = &TASKS.columns[3];
        for (raw, expected) in [("true", true), ("TRUE", true), ("1", true), ("Yes", true), ("false", false), ("no", false), ("2", false)] {
            assert_eq!(parse_field(completed, raw).unwrap(), FieldValue::Boolean(expected), "{raw}");
        }
    }

    #[test]
    fn timestamps_accept_common_iso_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 19, 10, 0, 0).unwrap();
        for raw in [
            "2024-03-19T10:00:00Z",
            "2024-03-19T10:00:00.000000Z",
            "2024-03-19T12:00:00+02:00",
            "2024-03-19 10:00:00+00:00",
            "2024-03-19T10:00:00",
            "2024-03-19 10:00:00",
        ] {
            assert_eq!(parse_timestamp(raw), Some(expected), "{raw}");
        }
        assert!(parse_timestamp("19/03/2024").is_none());
    }

    #[test]
    fn empty_fields_take_column_defaults() {
        let file = upload("tasks_x.csv", "id,title,description,completed,project_id\n,Sweep,,,\n");
        let rows = parse_file(&TASKS, &file).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert!(matches!(row[0], Some(FieldValue::Identifier(_))));
        assert_eq!(row[1], Some(FieldValue::Text("Sweep".into())));
        assert_eq!(row[2], None);
        assert_eq!(row[3], Some(FieldValue::Boolean(false)));
        assert!(matches!(row[4], Some(FieldValue::Timestamp(_))));
        assert_eq!(row[6], None);
    }

    #[test]
    fn malformed_identifier_names_file_and_row() {
        let file = upload("projects_1.csv", "id,name\nnot-a-uuid,Launch\n");
        let err = parse_file(&PROJECTS, &file).unwrap_err();
        assert!(matches!(
            err,
            TransferError::InvalidRow { row: 1, source: FieldError::InvalidIdentifier { column: "id", .. }, .. }
        ));
        assert!(err.to_string().contains("projects_1.csv"));
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let file = upload("projects_1.csv", "description\njust words\n");
        let err = parse_file(&PROJECTS, &file).unwrap_err();
        assert!(matches!(
            err,
            TransferError::InvalidRow { source: FieldError::MissingColumn { column: "name" }, .. }
        ));
    }

    #[test]
    fn unknown_headers_are_ignored_and_bom_is_stripped() {
        let file = upload("projects_1.csv", "\u{feff}name,colour\nLaunch,blue\n");
        let rows = parse_file(&PROJECTS, &file).unwrap();
        assert_eq!(rows[0][1], Some(FieldValue::Text("Launch".into())));
    }
}
