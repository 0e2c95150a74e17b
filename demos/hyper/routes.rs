use std::convert::Infallible;
use std::future::{Ready, ready};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::http::header::{CONTENT_TYPE, HeaderValue};
use hyper::http::{Method, StatusCode};
use hyper::service::Service;
use hyper::{Request, Response};

use crate::acl::middleware::AclBody;
use crate::acl::{HEALTH_PATH, SharedAppState, Visitor};

#[derive(Clone)]
pub struct Router {
    state: SharedAppState,
}

pub fn router(state: SharedAppState) -> Router {
    Router { state }
}

impl Service<Request<Incoming>> for Router {
    type Response = Response<AclBody>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let visitor = req.extensions().get::<Visitor>().copied();
        let (status, body) = match (req.method(), req.uri().path()) {
            (&Method::GET, "/whoami") => (StatusCode::OK, whoami(&self.state, visitor)),
            (&Method::GET, HEALTH_PATH) => (StatusCode::OK, "ok\n".to_string()),
            _ => (StatusCode::NOT_FOUND, "not found\n".to_string()),
        };

        ready(Ok(plain(status, body)))
    }
}

fn whoami(state: &SharedAppState, visitor: Option<Visitor>) -> String {
    let allowed = state.acl.config().country;
    match visitor.and_then(|visitor| visitor.country) {
        Some(country) => format!("admitted from {country}; this server allows {allowed}\n"),
        None => format!("admitted without a country check; this server allows {allowed}\n"),
    }
}

fn plain(status: StatusCode, body: String) -> Response<AclBody> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
