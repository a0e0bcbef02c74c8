/// Bulk delete
///
/// Empties every table in one transaction, children first, so the foreign
/// key from tasks to projects is never violated mid-way.

use crate::store::schema::TABLES;
use anyhow::Result;
use sqlx::sqlite::SqlitePool;

pub async fn delete_all(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for table in TABLES.iter().rev() {
        let result = sqlx::query(&format!("DELETE FROM {}", table.name))
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to clear table '{}': {}", table.name, e))?;
        tracing::info!("🗑️ Deleted {} rows from {}", result.rows_affected(), table.name);
    }

    tx.commit().await?;
    Ok(())
}
