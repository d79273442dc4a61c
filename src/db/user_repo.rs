//! Read-only lookups in the admin `users` table.
use sqlx::{Row, SqlitePool};

/// Permission names that allow a user to push dynamic updates.
pub const EDIT_PERMISSIONS: [&str; 3] = [
    "zone_content_edit_own",
    "zone_content_edit_own_as_client",
    "zone_content_edit_others",
];

/// Application-level representation of a user allowed to update zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Fetch an active user whose permission template grants one of
/// [`EDIT_PERMISSIONS`]. Inactive or unprivileged users yield `None`.
pub async fn find_active_edit_user(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    let row = sqlx::query(
        r#"
        SELECT
            users.id,
            users.username,
            users.password
        FROM users
        JOIN perm_templ_items ON perm_templ_items.templ_id = users.perm_templ
        JOIN perm_items ON perm_items.id = perm_templ_items.perm_id
        WHERE users.username = ?
          AND users.active = 1
          AND perm_items.name IN (?, ?, ?)
        LIMIT 1
        "#,
    )
    .bind(username)
    .bind(EDIT_PERMISSIONS[0])
    .bind(EDIT_PERMISSIONS[1])
    .bind(EDIT_PERMISSIONS[2])
    .fetch_optional(db)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password"),
    }))
}
