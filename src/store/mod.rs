/// Entity store
///
/// Owns the SQLite connection pool, the versioned migrations, and the typed
/// table descriptors that drive the CSV bulk transfer.

// Connection pool creation and migrations
pub mod database;

// Static column descriptors for the projects and tasks tables
pub mod schema;

pub use database::Database;
pub use schema::{Column, ColumnDefault, ColumnKind, TableSchema};

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use uuid::Uuid;

/// Current time at the precision the store keeps (microseconds).
///
/// Entities built in memory compare equal to the same entities read back.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp in the fixed-width form stored in TEXT columns.
///
/// Fixed precision keeps lexical order equal to chronological order, which
/// the `ORDER BY` clauses rely on.
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp column.
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| anyhow::anyhow!("Invalid stored timestamp '{}': {}", raw, e))
}

/// Parse a stored identifier column.
pub fn decode_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| anyhow::anyhow!("Invalid stored identifier '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_timestamps_sort_chronologically() {
        let whole = Utc.with_ymd_and_hms(2024, 3, 19, 10, 0, 5).unwrap();
        let later = whole + chrono::Duration::milliseconds(123);

        let a = encode_timestamp(&whole);
        let b = encode_timestamp(&later);

        assert_eq!(a, "2024-03-19T10:00:05.000000Z");
        assert!(a < b);
        assert_eq!(decode_timestamp(&b).unwrap(), later);
    }

    #[test]
    fn now_survives_a_store_round_trip() {
        let ts = now();
        assert_eq!(decode_timestamp(&encode_timestamp(&ts)).unwrap(), ts);
    }
}
