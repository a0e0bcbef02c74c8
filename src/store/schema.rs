/// Typed table descriptors
///
/// Every column the bulk transfer reads or writes is declared here once,
/// with an explicit kind and the default an import applies when the CSV
/// leaves the field empty. Column order is the CSV header order.

/// How a column's text form is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Hyphenated UUID
    Identifier,
    /// Stored as INTEGER 0/1, rendered as `true`/`false`
    Boolean,
    /// RFC 3339 UTC
    Timestamp,
    /// Free text
    Text,
}

/// Value used when an imported row omits the column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// The row is rejected
    Required,
    /// NULL
    Null,
    /// Freshly generated identifier
    NewIdentifier,
    /// Time of the import
    Now,
    /// `false`
    False,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub default: ColumnDefault,
}

const fn column(name: &'static str, kind: ColumnKind, default: ColumnDefault) -> Column {
    Column { name, kind, default }
}

#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    /// SQL table name, also the export file prefix
    pub name: &'static str,
    pub columns: &'static [Column],
}

pub static PROJECTS: TableSchema = TableSchema {
    name: "projects",
    columns: &[
        column("id", ColumnKind::Identifier, ColumnDefault::NewIdentifier),
        column("name", ColumnKind::Text, ColumnDefault::Required),
        column("description", ColumnKind::Text, ColumnDefault::Null),
        column("created_at", ColumnKind::Timestamp, ColumnDefault::Now),
        column("updated_at", ColumnKind::Timestamp, ColumnDefault::Now),
        column("last_accessed", ColumnKind::Timestamp, ColumnDefault::Now),
    ],
};

pub static TASKS: TableSchema = TableSchema {
    name: "tasks",
    columns: &[
        column("id", ColumnKind::Identifier, ColumnDefault::NewIdentifier),
        column("title", ColumnKind::Text, ColumnDefault::Required),
        column("description", ColumnKind::Text, ColumnDefault::Null),
        column("completed", ColumnKind::Boolean, ColumnDefault::False),
        column("created_at", ColumnKind::Timestamp, ColumnDefault::Now),
        column("updated_at", ColumnKind::Timestamp, ColumnDefault::Now),
        column("project_id", ColumnKind::Identifier, ColumnDefault::Null),
    ],
};

/// All tables in dependency order: parents before children.
pub static TABLES: [&TableSchema; 2] = [&PROJECTS, &TASKS];

impl TableSchema {
    /// Comma separated column names in declaration order
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve a table from an uploaded file name.
    ///
    /// The prefix is the text before the first underscore, compared
    /// case-insensitively: `Projects_20240101_120000.csv` → `projects`.
    pub fn for_file_name(file_name: &str) -> Option<&'static TableSchema> {
        let prefix = file_name.split('_').next().unwrap_or_default().to_lowercase();
        TABLES.iter().copied().find(|table| table.name == prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tables_by_file_prefix() {
        assert_eq!(TableSchema::for_file_name("projects_20240101_000000.csv"), Some(&PROJECTS));
        assert_eq!(TableSchema::for_file_name("TASKS_backup.csv"), Some(&TASKS));
        assert_eq!(TableSchema::for_file_name("widgets_20240101.csv"), None);
        // no underscore: the whole name is the prefix
        assert_eq!(TableSchema::for_file_name("tasks.csv"), None);
    }

    #[test]
    fn column_list_follows_declaration_order() {
        assert_eq!(
            TASKS.column_list(),
            "id, title, description, completed, created_at, updated_at, project_id"
        );
    }
}
