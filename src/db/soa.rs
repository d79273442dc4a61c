//! SOA serial arithmetic and the zone serial bump.
//!
//! Serials follow the usual `YYYYMMDDnn` convention. Serials below
//! `1979999999` are treated as plain counters, `0` is left alone so
//! PowerDNS keeps computing the serial itself.
use chrono::{Datelike, NaiveDate};
use sqlx::{Row, SqliteConnection};
use tracing::{debug, warn};

const COUNTER_LIMIT: u64 = 1_979_999_999;

fn date_number(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64
}

fn parse_date_number(value: u64) -> Option<NaiveDate> {
    let year = i32::try_from(value / 10_000).ok()?;
    NaiveDate::from_ymd_opt(year, (value / 100 % 100) as u32, (value % 100) as u32)
}

fn next_day(date: NaiveDate) -> u64 {
    date_number(date.succ_opt().unwrap_or(date))
}

/// Serial that should follow `current` when the zone changes on `today`.
pub fn next_serial(current: u64, today: NaiveDate) -> u64 {
    if current == 0 {
        return 0;
    }
    if current < COUNTER_LIMIT {
        return current + 1;
    }
    if current == COUNTER_LIMIT {
        return 1;
    }

    let today_num = date_number(today);
    let serial_date = current / 100;
    let revision = current % 100;

    if current == today_num * 100 + 99 {
        return next_day(today) * 100;
    }
    if serial_date == today_num {
        return current.saturating_add(1);
    }
    if serial_date > today_num {
        // serial already dated in the future, keep counting from there
        return match (revision, parse_date_number(serial_date)) {
            (99, Some(date)) => next_day(date) * 100,
            _ => current.saturating_add(1),
        };
    }
    today_num * 100
}

/// Serial field (third word) of SOA record content.
pub fn soa_serial(content: &str) -> Option<&str> {
    content.split_whitespace().nth(2)
}

/// SOA content with its serial field replaced.
pub fn with_serial(content: &str, serial: u64) -> Option<String> {
    let mut fields: Vec<String> = content.split_whitespace().map(str::to_string).collect();
    let slot = fields.get_mut(2)?;
    *slot = serial.to_string();
    Some(fields.join(" "))
}

/// Advance the SOA serial of `zone_id`. Returns the new serial, or `None`
/// when the zone has no usable SOA record. Serials are 32-bit on the wire,
/// larger stored values count as unusable.
pub async fn bump_soa_serial(
    conn: &mut SqliteConnection,
    zone_id: i64,
    today: NaiveDate,
) -> sqlx::Result<Option<u64>> {
    let row = sqlx::query("SELECT id, content FROM records WHERE domain_id = ? AND type = 'SOA' LIMIT 1")
        .bind(zone_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        warn!(zone_id, "zone has no SOA record, serial not bumped");
        return Ok(None);
    };
    let record_id: i64 = row.try_get("id")?;
    let Some(content) = row.try_get::<Option<String>, _>("content")? else {
        warn!(zone_id, "SOA record has no content, serial not bumped");
        return Ok(None);
    };

    let Some(current) = soa_serial(&content)
        .and_then(|s| s.parse::<u32>().ok())
        .map(u64::from)
    else {
        warn!(zone_id, content = %content, "unparsable SOA serial, serial not bumped");
        return Ok(None);
    };

    let next = next_serial(current, today);
    if next != current {
        let Some(updated) = with_serial(&content, next) else {
            return Ok(None);
        };
        sqlx::query("UPDATE records SET content = ? WHERE id = ?")
            .bind(updated)
            .bind(record_id)
            .execute(&mut *conn)
            .await?;
    }
    debug!(zone_id, from = current, to = next, "bumped SOA serial");

    Ok(Some(next))
}
