use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::http::StatusCode;
use hyper::http::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::service::Service;
use hyper::{Request, Response};
use ipacl_rs::{AclDecision, AclError, Headers, Rejection, RequestContext};

use super::{SharedAcl, Visitor};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub type AclBody = Full<Bytes>;

/// Hyper middleware that mirrors the pattern described in the
/// official "Getting Started with a Server Middleware" guide:
/// https://hyper.rs/guides/1/server/middleware/
///
/// One instance is built per connection so the peer address is known.
#[derive(Clone)]
pub struct IpAclService<S> {
    inner: S,
    acl: SharedAcl,
    remote: SocketAddr,
}

impl<S> IpAclService<S> {
    pub fn new(acl: SharedAcl, remote: SocketAddr, inner: S) -> Self {
        Self { inner, acl, remote }
    }
}

impl<S> Service<Request<Incoming>> for IpAclService<S>
where
    S: Service<Request<Incoming>, Response = Response<AclBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response<AclBody>;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn call(&self, mut req: Request<Incoming>) -> Self::Future {
        let ip = self.remote.ip().to_string();
        let decision = self.acl.check(&RequestContext {
            ip: &ip,
            path: req.uri().path(),
        });

        match decision {
            Ok(decision @ (AclDecision::Bypassed | AclDecision::Allowed { .. })) => {
                if let AclDecision::Allowed { country } = decision {
                    req.extensions_mut().insert(Visitor { country });
                }
                let inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Ok(AclDecision::Rejected { response, .. }) => {
                Box::pin(async move { Ok(rejection_response(response)) })
            }
            Err(err) => Box::pin(async move { Ok(error_response(err)) }),
        }
    }
}

fn rejection_response(rejection: Rejection) -> Response<AclBody> {
    let status =
        StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        insert_headers(map, &rejection.headers);
    }
    builder
        .body(Full::new(Bytes::from(rejection.body.unwrap_or_default())))
        .expect("failed to build rejection response")
}

fn error_response(err: AclError) -> Response<AclBody> {
    let status = match err {
        AclError::InvalidAddress { .. } => StatusCode::BAD_REQUEST,
        AclError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(format!("IP ACL error: {err}"))))
        .expect("failed to build error response")
}

fn insert_headers(map: &mut HeaderMap, headers: &Headers) {
    for (name, value) in headers.iter() {
        if let (Ok(header_name), Ok(header_value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            map.insert(header_name, header_value);
        }
    }
}
