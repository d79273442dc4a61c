//! Zone ownership lookups against the admin `zones` table.
use sqlx::SqlitePool;

/// Domain ids of every zone owned by `user_id`.
pub async fn zones_owned_by(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar("SELECT domain_id FROM zones WHERE owner = ? ORDER BY domain_id")
        .bind(user_id)
        .fetch_all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;

    #[tokio::test]
    async fn lists_only_owned_zones() {
        let db = fixtures::memory_db().await;
        let alice = fixtures::insert_user(&db, "alice", "pw", true, &["zone_content_edit_own"]).await;
        let bob = fixtures::insert_user(&db, "bob", "pw", true, &["zone_content_edit_own"]).await;
        let a1 = fixtures::insert_zone(&db, "alice.example", alice, 1).await;
        let a2 = fixtures::insert_zone(&db, "alice.example.net", alice, 1).await;
        fixtures::insert_zone(&db, "bob.example", bob, 1).await;

        assert_eq!(zones_owned_by(&db, alice).await.unwrap(), vec![a1, a2]);
        assert!(zones_owned_by(&db, 9999).await.unwrap().is_empty());
    }
}
