//! The update state machine: validation, authentication, per-zone sync.
use tracing::{error, info, warn};

use crate::auth::{Credentials, verify_password};
use crate::config::AppConfig;
use crate::db::user_repo::User;
use crate::dyndns::request::{UpdateRequest, normalize};
use crate::dyndns::status::UpdateStatus;
use crate::dyndns::store::{DnsStore, FamilyTarget};
use crate::error::AppError;
use crate::validation::{RecordType, extract_valid_ips, normalize_hostname};

/// Check credentials against the store. A stored hash that cannot be
/// verified counts as a failed login, not as a server error.
pub async fn authenticate<S>(store: &S, creds: &Credentials) -> Result<Option<User>, AppError>
where
    S: DnsStore + ?Sized,
{
    let Some(user) = store.find_active_edit_user(&creds.username).await? else {
        return Ok(None);
    };

    match verify_password(&user.password_hash, &creds.password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(err) => {
            warn!(username = %creds.username, error = %err, "stored password hash unusable");
            Ok(None)
        }
    }
}

/// Run one update request to completion and pick the reply status.
pub async fn process_update<S>(store: &S, config: &AppConfig, req: &UpdateRequest) -> UpdateStatus
where
    S: DnsStore + ?Sized,
{
    let input = normalize(req);

    let hostname = match normalize_hostname(&input.hostname) {
        Ok(hostname) => hostname,
        Err(err) => {
            info!(hostname = %input.hostname, error = %err, "rejected hostname");
            return UpdateStatus::NotFqdn;
        }
    };

    let ipv4 = extract_valid_ips(&input.ipv4_raw, RecordType::A);
    let ipv6 = extract_valid_ips(&input.ipv6_raw, RecordType::Aaaa);
    if ipv4.is_empty() && ipv6.is_empty() {
        info!(%hostname, "no usable address in request");
        return UpdateStatus::DnsErr;
    }

    if config.require_user_agent && req.user_agent.as_deref().is_none_or(|ua| ua.trim().is_empty()) {
        return UpdateStatus::BadAgent;
    }

    let Some(creds) = req.credentials.as_ref().filter(|c| !c.username.is_empty()) else {
        return UpdateStatus::BadAuth;
    };

    let user = match authenticate(store, creds).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(username = %creds.username, %hostname, "authentication failed");
            return UpdateStatus::BadAuth2;
        }
        Err(err) => {
            error!(username = %creds.username, error = %err, "user lookup failed");
            return UpdateStatus::CriticalError;
        }
    };

    let mut targets = Vec::with_capacity(2);
    if input.dualstack || !ipv4.is_empty() {
        targets.push(FamilyTarget {
            record_type: RecordType::A,
            addresses: ipv4,
        });
    }
    if input.dualstack || !ipv6.is_empty() {
        targets.push(FamilyTarget {
            record_type: RecordType::Aaaa,
            addresses: ipv6,
        });
    }

    let zones = match store.zones_owned_by(user.id).await {
        Ok(zones) => zones,
        Err(err) => {
            error!(username = %user.username, error = %err, "zone lookup failed");
            return UpdateStatus::CriticalError;
        }
    };

    let mut attempted = false;
    let mut was_updated = false;
    for zone_id in zones {
        match store.sync_zone(zone_id, &hostname, &targets).await {
            Ok(changed) => {
                attempted = true;
                if changed {
                    info!(username = %user.username, %hostname, zone_id, "zone updated");
                }
                was_updated |= changed;
            }
            Err(err) => {
                error!(username = %user.username, %hostname, zone_id, error = %err, "zone sync failed");
                return UpdateStatus::CriticalError;
            }
        }
    }

    if !attempted {
        UpdateStatus::NotYours
    } else if !was_updated && config.report_nochg {
        UpdateStatus::NoChange
    } else {
        UpdateStatus::Good
    }
}
