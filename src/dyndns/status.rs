use std::fmt;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Terminal outcome of an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Good,
    NoChange,
    BadAgent,
    BadAuth,
    BadAuth2,
    NotFqdn,
    DnsErr,
    NotYours,
    CriticalError,
}

impl UpdateStatus {
    /// Token written on the wire.
    pub fn token(self) -> &'static str {
        match self {
            UpdateStatus::Good => "good",
            UpdateStatus::NoChange => "nochg",
            UpdateStatus::BadAgent => "badagent",
            UpdateStatus::BadAuth => "badauth",
            UpdateStatus::BadAuth2 => "badauth2",
            UpdateStatus::NotFqdn => "notfqdn",
            UpdateStatus::DnsErr => "dnserr",
            UpdateStatus::NotYours => "!yours",
            UpdateStatus::CriticalError => "911",
        }
    }

    /// Human readable form sent when the client asked for `verbose`.
    pub fn message(self) -> &'static str {
        match self {
            UpdateStatus::Good => "Your hostname has been updated.",
            UpdateStatus::NoChange => {
                "This update was identical to your last update, so no changes were made to your hostname configuration."
            }
            UpdateStatus::BadAgent => "Your user agent is not valid.",
            UpdateStatus::BadAuth => "No username available.",
            UpdateStatus::BadAuth2 => "Invalid username or password.  Authentication failed.",
            UpdateStatus::NotFqdn => "The hostname you specified was not valid.",
            UpdateStatus::DnsErr => {
                "A DNS error has occurred on our end.  We apologize for any inconvenience."
            }
            UpdateStatus::NotYours => "The specified hostname does not belong to you.",
            UpdateStatus::CriticalError => {
                "A critical error has occurred on our end.  We apologize for any inconvenience."
            }
        }
    }

    /// Response body line, newline terminated.
    pub fn render(self, verbose: bool) -> String {
        let text = if verbose { self.message() } else { self.token() };
        format!("{text}\n")
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            UpdateStatus::BadAuth => StatusCode::UNAUTHORIZED,
            _ => StatusCode::OK,
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Plain-text reply carrying an [`UpdateStatus`].
#[derive(Debug, Clone, Copy)]
pub struct StatusResponse {
    pub status: UpdateStatus,
    pub verbose: bool,
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        let mut response = (
            self.status.http_status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.status.render(self.verbose),
        )
            .into_response();

        if self.status == UpdateStatus::BadAuth {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"DNS Update\""),
            );
        }
        response
    }
}
