//! Basic-auth credential extraction plus password helpers.
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;
use std::future::Future;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lazy_static::lazy_static;
use md5::{Digest, Md5};
use rand_core::OsRng;
use regex::Regex;
use subtle::ConstantTimeEq;

use crate::config::PasswordScheme;
use crate::error::AppError;

/// Username and password presented by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Axum extractor yielding the Basic credentials of a request, if any.
///
/// Missing or malformed headers are not a rejection: dyndns clients that
/// carry credentials in the query string still reach the handler.
pub struct BasicAuth(pub Option<Credentials>);

impl<S> FromRequestParts<S> for BasicAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> {
        let creds = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic);
        std::future::ready(Ok(BasicAuth(creds)))
    }
}

/// Decode an `Authorization: Basic ...` header value. The scheme name is
/// matched case-insensitively.
pub fn parse_basic(header_value: &str) -> Option<Credentials> {
    let (scheme, b64) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let b64 = b64.trim();
    let decoded = BASE64.decode(b64).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Hash a plaintext password with the configured scheme and a random salt.
pub fn hash_password(plain: &str, scheme: PasswordScheme, cost: u32) -> Result<String, AppError> {
    match scheme {
        PasswordScheme::Bcrypt => bcrypt::hash_with_result(plain, cost)
            .map(|parts| parts.format_for_version(bcrypt::Version::TwoY))
            .map_err(|e| AppError::password_hash(e.to_string())),
        PasswordScheme::Argon2i => argon2_hash(plain, Algorithm::Argon2i),
        PasswordScheme::Argon2id => argon2_hash(plain, Algorithm::Argon2id),
    }
}

fn argon2_hash(plain: &str, algorithm: Algorithm) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(algorithm, Version::V0x13, Params::default());
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::password_hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

lazy_static! {
    static ref MD5_RE: Regex = Regex::new(r"^[a-f0-9]{32}$").unwrap();
    static ref MD5_SALT_RE: Regex =
        Regex::new(r"^[a-f0-9]{32}:[a-zA-Z0-9@#$%^*()_\-!]{5}$").unwrap();
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

fn digest_matches(computed: &str, stored: &str) -> bool {
    computed.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Verify a plaintext password against a stored hash.
///
/// The algorithm is taken from the stored hash, so accounts hashed under a
/// previous scheme keep working after the configured scheme changes. Besides
/// bcrypt and argon2 this accepts the legacy `md5` (bare hex digest) and
/// `md5salt` (`md5(salt + password):salt`) formats.
pub fn verify_password(hash: &str, plain: &str) -> Result<bool, AppError> {
    if hash.starts_with("$2") {
        return bcrypt::verify(plain, hash).map_err(|e| AppError::password_hash(e.to_string()));
    }
    if hash.starts_with("$argon2") {
        let parsed = PasswordHash::new(hash).map_err(|e| AppError::password_hash(e.to_string()))?;
        return Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok());
    }
    if MD5_RE.is_match(hash) {
        return Ok(digest_matches(&md5_hex(plain), hash));
    }
    if MD5_SALT_RE.is_match(hash) {
        let (digest, salt) = hash.split_at(32);
        let salt = &salt[1..];
        return Ok(digest_matches(&md5_hex(&format!("{salt}{plain}")), digest));
    }
    Err(AppError::password_hash("unsupported password hash format"))
}
