//! Record access used by the update reconciler.
use sqlx::SqliteConnection;
use tracing::debug;

use crate::dyndns::reconcile::plan_sync;
use crate::validation::RecordType;

/// Existing record row of one `(zone, name, type)` set.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RecordRow {
    pub id: i64,
    pub content: String,
}

pub async fn records_of_type(
    conn: &mut SqliteConnection,
    zone_id: i64,
    hostname: &str,
    record_type: RecordType,
) -> sqlx::Result<Vec<RecordRow>> {
    sqlx::query_as(
        r#"
        SELECT id, COALESCE(content, '') AS content
        FROM records
        WHERE domain_id = ? AND name = ? AND type = ?
        ORDER BY id
        "#,
    )
    .bind(zone_id)
    .bind(hostname)
    .bind(record_type.as_str())
    .fetch_all(&mut *conn)
    .await
}

pub async fn insert_record(
    conn: &mut SqliteConnection,
    zone_id: i64,
    hostname: &str,
    record_type: RecordType,
    content: &str,
    ttl: u32,
) -> sqlx::Result<i64> {
    let res = sqlx::query(
        r#"
        INSERT INTO records (domain_id, name, type, content, ttl, prio, disabled, auth)
        VALUES (?, ?, ?, ?, ?, NULL, 0, 1)
        "#,
    )
    .bind(zone_id)
    .bind(hostname)
    .bind(record_type.as_str())
    .bind(content)
    .bind(ttl)
    .execute(&mut *conn)
    .await?;

    Ok(res.last_insert_rowid())
}

pub async fn delete_record(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM records WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Make the `record_type` records of `hostname` in `zone_id` hold exactly
/// `desired`. Rows whose address stays are not touched. Returns whether
/// anything was inserted or deleted.
pub async fn sync_dns_records(
    conn: &mut SqliteConnection,
    zone_id: i64,
    hostname: &str,
    record_type: RecordType,
    desired: &[String],
    ttl: u32,
) -> sqlx::Result<bool> {
    let current = records_of_type(conn, zone_id, hostname, record_type).await?;
    let plan = plan_sync(record_type, &current, desired);
    if plan.is_noop() {
        return Ok(false);
    }

    for id in &plan.delete {
        delete_record(conn, *id).await?;
        debug!(zone_id, hostname, %record_type, record_id = id, "deleted record");
    }
    for content in &plan.insert {
        let id = insert_record(conn, zone_id, hostname, record_type, content, ttl).await?;
        debug!(zone_id, hostname, %record_type, record_id = id, content = content.as_str(), "inserted record");
    }

    Ok(true)
}
