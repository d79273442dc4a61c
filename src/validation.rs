use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use regex::Regex;

/// Address record types an update may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    /// Value stored in the `records.type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    fn parse(self, token: &str) -> Option<IpAddr> {
        match self {
            RecordType::A => token.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
            RecordType::Aaaa => token.parse::<Ipv6Addr>().ok().map(IpAddr::V6),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("hostname is empty")]
    Empty,
    #[error("hostname too long (max 253 characters)")]
    TooLong,
    #[error("hostname must contain at least two labels")]
    NotQualified,
    #[error("label '{0}' is empty or longer than 63 characters")]
    BadLabelLength(String),
    #[error("label '{0}' contains invalid characters (only a-z, 0-9, '-' and '_' allowed)")]
    InvalidCharacters(String),
    #[error("label '{0}' must not start or end with '-'")]
    LeadingOrTrailingHyphen(String),
}

lazy_static::lazy_static! {
    /// Lowercase letters, digits, '-' and '_' (service labels)
    static ref LABEL_RE: Regex = Regex::new(r"^[a-z0-9_-]+$").unwrap();
}

/// Canonical record name for `raw`: trimmed, lower-cased, without the
/// trailing root dot, as PowerDNS stores it.
pub fn normalize_hostname(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let name = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if name.len() > 253 {
        return Err(ValidationError::TooLong);
    }
    if !name.contains('.') {
        return Err(ValidationError::NotQualified);
    }
    for label in name.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(ValidationError::BadLabelLength(label.to_string()));
        }
        if !LABEL_RE.is_match(label) {
            return Err(ValidationError::InvalidCharacters(label.to_string()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ValidationError::LeadingOrTrailingHyphen(label.to_string()));
        }
    }

    Ok(name)
}

/// Record family an address belongs in. IPv4-mapped IPv6 addresses
/// (`::ffff:a.b.c.d`) count as IPv4.
pub fn classify_ip(addr: IpAddr) -> (RecordType, IpAddr) {
    match addr {
        IpAddr::V4(_) => (RecordType::A, addr),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => (RecordType::A, IpAddr::V4(v4)),
            None => (RecordType::Aaaa, addr),
        },
    }
}

/// Parse a comma-separated address list, keeping only addresses of `family`.
///
/// The result is canonical text, sorted numerically and free of duplicates,
/// so two requests naming the same set always yield the same list. Invalid
/// tokens are dropped silently; an empty result is not an error.
pub fn extract_valid_ips(raw: &str, family: RecordType) -> Vec<String> {
    let mut addrs: Vec<IpAddr> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| family.parse(token))
        .collect();

    addrs.sort();
    addrs.dedup();
    addrs.iter().map(ToString::to_string).collect()
}

/// Stored record content in the same canonical form `extract_valid_ips`
/// produces. Content that is not an address of `family` is kept verbatim.
pub fn canonical_content(content: &str, family: RecordType) -> String {
    let trimmed = content.trim();
    match family.parse(trimmed) {
        Some(addr) => addr.to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_valid_ipv4_sorted() {
        assert_eq!(
            extract_valid_ips("1.2.3.4, not-an-ip, 5.6.7.8", RecordType::A),
            vec!["1.2.3.4", "5.6.7.8"]
        );
        assert_eq!(
            extract_valid_ips("192.168.1.1,10.0.0.1,172.16.0.1", RecordType::A),
            vec!["10.0.0.1", "172.16.0.1", "192.168.1.1"]
        );
    }

    #[test]
    fn sorting_is_numeric_not_lexical() {
        assert_eq!(
            extract_valid_ips("10.0.0.10,10.0.0.9", RecordType::A),
            vec!["10.0.0.9", "10.0.0.10"]
        );
    }

    #[test]
    fn filters_by_family() {
        let raw = "192.168.1.1,2001:db8::1,::1,10.0.0.1";
        assert_eq!(
            extract_valid_ips(raw, RecordType::A),
            vec!["10.0.0.1", "192.168.1.1"]
        );
        assert_eq!(
            extract_valid_ips(raw, RecordType::Aaaa),
            vec!["::1", "2001:db8::1"]
        );
    }

    #[test]
    fn canonicalizes_and_dedups_ipv6() {
        assert_eq!(
            extract_valid_ips(
                "2001:0db8:85a3:0000:0000:8a2e:0370:7334, 2001:db8:85a3::8a2e:370:7334",
                RecordType::Aaaa
            ),
            vec!["2001:db8:85a3::8a2e:370:7334"]
        );
    }

    #[test]
    fn empty_and_garbage_yield_empty_list() {
        assert!(extract_valid_ips("", RecordType::A).is_empty());
        assert!(extract_valid_ips(",,,", RecordType::A).is_empty());
        assert!(extract_valid_ips(" , ", RecordType::Aaaa).is_empty());
        assert!(extract_valid_ips("whatismyip", RecordType::A).is_empty());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "192.168.1.256",
            "192.168.1",
            "192.168.1.1.1",
            "not.an.ip",
            "192.168.1.-1",
            "999.999.999.999",
        ] {
            assert!(extract_valid_ips(bad, RecordType::A).is_empty(), "{bad}");
        }
        for bad in ["2001:db8::1::2", "gggg::1", "2001:db8:::1"] {
            assert!(extract_valid_ips(bad, RecordType::Aaaa).is_empty(), "{bad}");
        }
    }

    #[test]
    fn classifies_addresses() {
        let v4: IpAddr = "192.168.1.1".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(classify_ip(v4), (RecordType::A, v4));
        assert_eq!(classify_ip(v6), (RecordType::Aaaa, v6));
        assert_eq!(classify_ip("::1".parse().unwrap()).0, RecordType::Aaaa);
        assert_eq!(classify_ip("::ffff:203.0.113.9".parse().unwrap()), (RecordType::A, "203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn normalizes_hostnames() {
        assert_eq!(
            normalize_hostname(" Home.Example.COM. ").as_deref(),
            Ok("home.example.com")
        );
        assert_eq!(
            normalize_hostname("_acme.host-1.example.org").as_deref(),
            Ok("_acme.host-1.example.org")
        );
    }

    #[test]
    fn rejects_bad_hostnames() {
        assert_eq!(normalize_hostname(""), Err(ValidationError::Empty));
        assert_eq!(normalize_hostname("  . "), Err(ValidationError::Empty));
        assert_eq!(normalize_hostname("localhost"), Err(ValidationError::NotQualified));
        assert!(matches!(
            normalize_hostname("a..example.com"),
            Err(ValidationError::BadLabelLength(_))
        ));
        assert!(matches!(
            normalize_hostname("bad host.example.com"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(matches!(
            normalize_hostname("-host.example.com"),
            Err(ValidationError::LeadingOrTrailingHyphen(_))
        ));
        let long = format!("{}.example.com", "a".repeat(64));
        assert!(matches!(
            normalize_hostname(&long),
            Err(ValidationError::BadLabelLength(_))
        ));
    }

    #[test]
    fn canonical_content_only_touches_addresses() {
        assert_eq!(canonical_content("2001:0db8::0001", RecordType::Aaaa), "2001:db8::1");
        assert_eq!(canonical_content(" 10.0.0.1 ", RecordType::A), "10.0.0.1");
        assert_eq!(canonical_content("garbage", RecordType::A), "garbage");
    }
}
