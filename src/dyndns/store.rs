use async_trait::async_trait;

use crate::db::user_repo::User;
use crate::error::AppError;
use crate::validation::RecordType;

/// Desired address set of one record type within a zone sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyTarget {
    pub record_type: RecordType,
    pub addresses: Vec<String>,
}

/// Zone and credential storage the update service runs against.
#[async_trait]
pub trait DnsStore: Send + Sync {
    /// Active user holding one of the zone content edit permissions.
    async fn find_active_edit_user(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn zones_owned_by(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Reconcile every target of `hostname` in `zone_id`, then bump the zone
    /// serial if any target changed. All of it commits or none of it does.
    async fn sync_zone(
        &self,
        zone_id: i64,
        hostname: &str,
        targets: &[FamilyTarget],
    ) -> Result<bool, AppError>;
}
