//! Runtime settings shared by the update handler.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

/// Hashing algorithm used when creating new password hashes. Verification
/// always follows the format of the stored hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PasswordScheme {
    Bcrypt,
    Argon2i,
    Argon2id,
}

/// Zone whose calendar date goes into `YYYYMMDDnn` serials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SerialTimezone {
    #[default]
    Utc,
    /// Timezone of the server process.
    Local,
    Fixed(FixedOffset),
}

impl SerialTimezone {
    pub fn date_at(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            SerialTimezone::Utc => now.date_naive(),
            SerialTimezone::Local => now.with_timezone(&Local).date_naive(),
            SerialTimezone::Fixed(offset) => now.with_timezone(offset).date_naive(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl FromStr for SerialTimezone {
    type Err = String;

    /// `utc`, `local` or a fixed offset such as `+09:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" | "z" => Ok(SerialTimezone::Utc),
            "local" => Ok(SerialTimezone::Local),
            other => other
                .parse::<FixedOffset>()
                .map(SerialTimezone::Fixed)
                .map_err(|_| format!("invalid timezone `{s}`, expected utc, local or an offset like +09:00")),
        }
    }
}

impl fmt::Display for SerialTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialTimezone::Utc => f.write_str("utc"),
            SerialTimezone::Local => f.write_str("local"),
            SerialTimezone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// TTL given to records inserted by an update.
    pub default_ttl: u32,
    /// Take the caller address from `X-Forwarded-For` / `X-Real-IP`.
    pub trust_forwarded_for: bool,
    /// Answer `badagent` to requests without a User-Agent.
    pub require_user_agent: bool,
    /// Answer `nochg` instead of `good` when nothing had to change.
    pub report_nochg: bool,
    /// Calendar used for date-based SOA serials.
    pub serial_timezone: SerialTimezone,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_ttl: 86400,
            trust_forwarded_for: false,
            require_user_agent: false,
            report_nochg: false,
            serial_timezone: SerialTimezone::Utc,
        }
    }
}
