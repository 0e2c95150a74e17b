use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use ipacl_rs::{AclDecision, AclError, Headers, Rejection, RequestContext};

use super::{AppState, Visitor};

pub async fn ip_acl_middleware(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let ip = remote.ip().to_string();
    let decision = state.acl.check(&RequestContext {
        ip: &ip,
        path: request.uri().path(),
    });

    match decision {
        Ok(AclDecision::Bypassed) => next.run(request).await,
        Ok(AclDecision::Allowed { country }) => {
            request.extensions_mut().insert(Visitor { country });
            next.run(request).await
        }
        Ok(AclDecision::Rejected { response, .. }) => rejection_response(response),
        Err(err) => error_response(err),
    }
}

fn rejection_response(rejection: Rejection) -> Response {
    let status =
        StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Response::builder()
        .status(status)
        .body(Body::from(rejection.body.unwrap_or_default()))
        .unwrap();

    apply_headers(response.headers_mut(), &rejection.headers);
    response
}

fn error_response(err: AclError) -> Response {
    let status = match err {
        AclError::InvalidAddress { .. } => StatusCode::BAD_REQUEST,
        AclError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Response::builder()
        .status(status)
        .body(Body::from(format!("IP ACL error: {err}")))
        .unwrap()
}

fn apply_headers(map: &mut HeaderMap, headers: &Headers) {
    for (name, value) in headers.iter() {
        if let (Ok(header_name), Ok(header_value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            map.insert(header_name, header_value);
        }
    }
}
