//! SQLite-backed [`DnsStore`].
use async_trait::async_trait;

use crate::config::SerialTimezone;
use crate::db::user_repo::{self, User};
use crate::db::{Db, record_repo, soa, zone_repo};
use crate::dyndns::store::{DnsStore, FamilyTarget};
use crate::error::AppError;

#[derive(Clone)]
pub struct SqlStore {
    db: Db,
    default_ttl: u32,
    timezone: SerialTimezone,
}

impl SqlStore {
    pub fn new(db: Db, default_ttl: u32) -> Self {
        Self {
            db,
            default_ttl,
            timezone: SerialTimezone::Utc,
        }
    }

    pub fn with_timezone(mut self, timezone: SerialTimezone) -> Self {
        self.timezone = timezone;
        self
    }
}

#[async_trait]
impl DnsStore for SqlStore {
    async fn find_active_edit_user(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(user_repo::find_active_edit_user(&self.db, username).await?)
    }

    async fn zones_owned_by(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        Ok(zone_repo::zones_owned_by(&self.db, user_id).await?)
    }

    async fn sync_zone(
        &self,
        zone_id: i64,
        hostname: &str,
        targets: &[FamilyTarget],
    ) -> Result<bool, AppError> {
        // dropped without commit on any error, which rolls the zone back
        let mut tx = self.db.begin().await?;

        let mut changed = false;
        for target in targets {
            changed |= record_repo::sync_dns_records(
                &mut tx,
                zone_id,
                hostname,
                target.record_type,
                &target.addresses,
                self.default_ttl,
            )
            .await?;
        }
        if changed {
            soa::bump_soa_serial(&mut tx, zone_id, self.timezone.today()).await?;
        }

        tx.commit().await?;
        Ok(changed)
    }
}
