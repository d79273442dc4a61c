//! Test helpers seeding an in-memory PowerDNS database.
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::auth::hash_password;
use crate::config::PasswordScheme;

pub const SOA_PREFIX: &str = "ns1.example.net. hostmaster.example.net.";

/// Fresh migrated database living in a single never-recycled connection.
pub async fn memory_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

async fn permission_id(db: &SqlitePool, name: &str) -> i64 {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM perm_items WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await
        .unwrap();
    if let Some(id) = existing {
        return id;
    }
    sqlx::query("INSERT INTO perm_items (name, descr) VALUES (?, '')")
        .bind(name)
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Insert a user with its own permission template holding `perms`.
pub async fn insert_user(
    db: &SqlitePool,
    username: &str,
    password: &str,
    active: bool,
    perms: &[&str],
) -> i64 {
    let templ_id = sqlx::query("INSERT INTO perm_templ (name, descr) VALUES (?, '')")
        .bind(format!("{username}-template"))
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid();
    for perm in perms {
        let perm_id = permission_id(db, perm).await;
        sqlx::query("INSERT INTO perm_templ_items (templ_id, perm_id) VALUES (?, ?)")
            .bind(templ_id)
            .bind(perm_id)
            .execute(db)
            .await
            .unwrap();
    }

    let hash = hash_password(password, PasswordScheme::Bcrypt, 4).unwrap();
    sqlx::query("INSERT INTO users (username, password, perm_templ, active) VALUES (?, ?, ?, ?)")
        .bind(username)
        .bind(hash)
        .bind(templ_id)
        .bind(if active { 1 } else { 0 })
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Insert a domain with an SOA record and assign it to `owner`.
pub async fn insert_zone(db: &SqlitePool, name: &str, owner: i64, serial: u64) -> i64 {
    let domain_id = sqlx::query("INSERT INTO domains (name, type) VALUES (?, 'MASTER')")
        .bind(name)
        .execute(db)
        .await
        .unwrap()
        .last_insert_rowid();
    insert_record(
        db,
        domain_id,
        name,
        "SOA",
        &format!("{SOA_PREFIX} {serial} 28800 7200 604800 86400"),
    )
    .await;
    sqlx::query("INSERT INTO zones (domain_id, owner) VALUES (?, ?)")
        .bind(domain_id)
        .bind(owner)
        .execute(db)
        .await
        .unwrap();
    domain_id
}

pub async fn insert_record(db: &SqlitePool, domain_id: i64, name: &str, rtype: &str, content: &str) -> i64 {
    sqlx::query(
        "INSERT INTO records (domain_id, name, type, content, ttl) VALUES (?, ?, ?, ?, 3600)",
    )
    .bind(domain_id)
    .bind(name)
    .bind(rtype)
    .bind(content)
    .execute(db)
    .await
    .unwrap()
    .last_insert_rowid()
}

/// Sorted `(id, content)` pairs of the matching records.
pub async fn records(db: &SqlitePool, domain_id: i64, name: &str, rtype: &str) -> Vec<(i64, String)> {
    sqlx::query_as("SELECT id, content FROM records WHERE domain_id = ? AND name = ? AND type = ? ORDER BY content")
        .bind(domain_id)
        .bind(name)
        .bind(rtype)
        .fetch_all(db)
        .await
        .unwrap()
}

pub async fn contents(db: &SqlitePool, domain_id: i64, name: &str, rtype: &str) -> Vec<String> {
    records(db, domain_id, name, rtype)
        .await
        .into_iter()
        .map(|(_, content)| content)
        .collect()
}

pub async fn soa_serial(db: &SqlitePool, domain_id: i64) -> u64 {
    let content: String =
        sqlx::query_scalar("SELECT content FROM records WHERE domain_id = ? AND type = 'SOA'")
            .bind(domain_id)
            .fetch_one(db)
            .await
            .unwrap();
    content.split_whitespace().nth(2).unwrap().parse().unwrap()
}

pub async fn record_count(db: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM records")
        .fetch_one(db)
        .await
        .unwrap()
}
