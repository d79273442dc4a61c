pub mod record_repo;
pub mod soa;
pub mod store;
pub mod user_repo;
pub mod zone_repo;

#[cfg(test)]
pub(crate) mod fixtures;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

pub type Db = SqlitePool;

/// Open the PowerDNS SQLite database, optionally applying the bundled
/// migrations (all `IF NOT EXISTS`, safe on an existing PowerDNS schema).
pub async fn init_db(path: &std::path::Path, migrate: bool) -> anyhow::Result<Db> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;
    if migrate {
        sqlx::migrate!().run(&pool).await?;
    }
    Ok(pool)
}
