// src/api/update.rs
use axum::{
    Extension, Form,
    extract::{
        Query,
        rejection::{FormRejection, QueryRejection},
    },
    http::{HeaderMap, header},
};
use tracing::debug;

use super::client_addr::{PeerAddr, resolve_client_ip};
use crate::SharedState;
use crate::auth::BasicAuth;
use crate::dyndns::{StatusResponse, UpdateParams, process_update};

// GET /nic/update
pub async fn update_get(
    Extension(state): Extension<SharedState>,
    PeerAddr(peer): PeerAddr,
    BasicAuth(basic): BasicAuth,
    headers: HeaderMap,
    query: Result<Query<UpdateParams>, QueryRejection>,
) -> StatusResponse {
    handle(state, peer, basic, &headers, query_params(query)).await
}

// POST /nic/update, form fields override the query string
pub async fn update_post(
    Extension(state): Extension<SharedState>,
    PeerAddr(peer): PeerAddr,
    BasicAuth(basic): BasicAuth,
    headers: HeaderMap,
    query: Result<Query<UpdateParams>, QueryRejection>,
    form: Result<Form<UpdateParams>, FormRejection>,
) -> StatusResponse {
    let query = query_params(query);
    let params = match form {
        Ok(Form(body)) => body.or(query),
        Err(rejection) => {
            debug!(%rejection, "ignoring unusable form body");
            query
        }
    };
    handle(state, peer, basic, &headers, params).await
}

// An unparsable query string (duplicate keys, bad escapes) is treated as
// empty so the client still gets a protocol token back.
fn query_params(query: Result<Query<UpdateParams>, QueryRejection>) -> UpdateParams {
    match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(%rejection, "ignoring unusable query string");
            UpdateParams::default()
        }
    }
}

async fn handle(
    state: SharedState,
    peer: Option<std::net::SocketAddr>,
    basic: Option<crate::auth::Credentials>,
    headers: &HeaderMap,
    params: UpdateParams,
) -> StatusResponse {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let client_addr = resolve_client_ip(peer, headers, state.config.trust_forwarded_for);

    let request = params.into_request(basic, user_agent, client_addr);
    let status = process_update(&state.store, &state.config, &request).await;

    StatusResponse {
        status,
        verbose: request.verbose,
    }
}
