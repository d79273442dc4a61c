//! Request parameters and the input normalizer.
use std::net::IpAddr;

use serde::Deserialize;

use crate::auth::Credentials;
use crate::validation::{RecordType, classify_ip};

/// Placeholder clients send to mean "the address you see me coming from".
pub const WHATISMYIP: &str = "whatismyip";

/// Raw dyndns2 parameters, as found in the query string or a form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParams {
    pub hostname: Option<String>,
    pub myip: Option<String>,
    pub ip: Option<String>,
    pub myip6: Option<String>,
    pub ip6: Option<String>,
    pub dualstack_update: Option<String>,
    pub verbose: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateParams {
    /// Fill every field missing in `self` from `fallback`.
    pub fn or(self, fallback: UpdateParams) -> UpdateParams {
        UpdateParams {
            hostname: self.hostname.or(fallback.hostname),
            myip: self.myip.or(fallback.myip),
            ip: self.ip.or(fallback.ip),
            myip6: self.myip6.or(fallback.myip6),
            ip6: self.ip6.or(fallback.ip6),
            dualstack_update: self.dualstack_update.or(fallback.dualstack_update),
            verbose: self.verbose.or(fallback.verbose),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
        }
    }

    /// Build the request, preferring Basic credentials over parameters.
    pub fn into_request(
        self,
        basic: Option<Credentials>,
        user_agent: Option<String>,
        client_addr: Option<IpAddr>,
    ) -> UpdateRequest {
        let credentials = basic.or_else(|| {
            self.username.map(|username| Credentials {
                username,
                password: self.password.unwrap_or_default(),
            })
        });

        UpdateRequest {
            hostname: self.hostname.unwrap_or_default(),
            ipv4: self.myip.or(self.ip),
            ipv6: self.myip6.or(self.ip6),
            dualstack: flag_enabled(self.dualstack_update.as_deref()),
            verbose: flag_enabled(self.verbose.as_deref()),
            credentials,
            user_agent,
            client_addr,
        }
    }
}

/// A boolean request flag: `1`, `true`, `yes` or `on`.
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v == "1" || ["true", "yes", "on"].iter().any(|t| v.eq_ignore_ascii_case(t))
    })
}

/// One update request with all transport details resolved.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub hostname: String,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub dualstack: bool,
    pub verbose: bool,
    pub credentials: Option<Credentials>,
    pub user_agent: Option<String>,
    /// Address the request came from, used for `whatismyip`.
    pub client_addr: Option<IpAddr>,
}

/// Address fields after `whatismyip` resolution, still unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub hostname: String,
    pub ipv4_raw: String,
    pub ipv6_raw: String,
    pub dualstack: bool,
}

/// Resolve `whatismyip` placeholders against the caller address.
///
/// An IPv6 caller asking for `myip=whatismyip` without any IPv6 field gets
/// its address moved to the IPv6 slot and the IPv4 slot cleared.
pub fn normalize(req: &UpdateRequest) -> NormalizedInput {
    let mut ipv4_raw = req.ipv4.clone().unwrap_or_default();
    let mut ipv6_raw = req.ipv6.clone().unwrap_or_default();
    let ipv6_supplied = !ipv6_raw.is_empty();
    let client = req.client_addr.map(classify_ip);

    if ipv4_raw == WHATISMYIP {
        match client {
            Some((RecordType::A, addr)) => ipv4_raw = addr.to_string(),
            Some((RecordType::Aaaa, addr)) if !ipv6_supplied => {
                ipv6_raw = addr.to_string();
                ipv4_raw.clear();
            }
            _ => {}
        }
    }
    if ipv6_raw == WHATISMYIP {
        if let Some((RecordType::Aaaa, addr)) = client {
            ipv6_raw = addr.to_string();
        }
    }

    NormalizedInput {
        hostname: req.hostname.clone(),
        ipv4_raw,
        ipv6_raw,
        dualstack: req.dualstack,
    }
}
