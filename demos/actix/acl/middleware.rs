use std::future::{Ready, ready};
use std::pin::Pin;
use std::task::{Context, Poll};

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, HttpResponse, HttpResponseBuilder};
use ipacl_rs::{AclDecision, AclError, Headers, Rejection, RequestContext};

use super::{SharedAcl, Visitor};

type LocalBoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + 'a>>;

pub struct IpAclGuard {
    acl: SharedAcl,
}

impl IpAclGuard {
    pub fn new(acl: SharedAcl) -> Self {
        Self { acl }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IpAclGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = IpAclMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IpAclMiddleware {
            service,
            acl: self.acl.clone(),
        }))
    }
}

pub struct IpAclMiddleware<S> {
    service: S,
    acl: SharedAcl,
}

impl<S, B> Service<ServiceRequest> for IpAclMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let ip = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_default();
        let decision = self.acl.check(&RequestContext {
            ip: &ip,
            path: req.path(),
        });

        match decision {
            Ok(decision @ (AclDecision::Bypassed | AclDecision::Allowed { .. })) => {
                if let AclDecision::Allowed { country } = decision {
                    req.extensions_mut().insert(Visitor { country });
                }
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Ok(AclDecision::Rejected { response, .. }) => {
                Box::pin(async move { Ok(rejection_response(req, response)) })
            }
            Err(err) => Box::pin(async move { Ok(error_response(req, err)) }),
        }
    }
}

fn rejection_response<B>(
    req: ServiceRequest,
    rejection: Rejection,
) -> ServiceResponse<EitherBody<B>> {
    let status =
        StatusCode::from_u16(rejection.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    insert_headers(&mut builder, &rejection.headers);
    let response = match rejection.body {
        Some(body) => builder.body(body),
        None => builder.finish(),
    };
    req.into_response(response.map_into_right_body())
}

fn error_response<B>(req: ServiceRequest, err: AclError) -> ServiceResponse<EitherBody<B>> {
    let mut builder = match err {
        AclError::InvalidAddress { .. } => HttpResponse::BadRequest(),
        AclError::Lookup(_) => HttpResponse::InternalServerError(),
    };
    let response = builder
        .body(format!("IP ACL error: {err}"))
        .map_into_right_body();
    req.into_response(response)
}

fn insert_headers(builder: &mut HttpResponseBuilder, headers: &Headers) {
    for (name, value) in headers.iter() {
        if let (Ok(header_name), Ok(header_value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            builder.insert_header((header_name, header_value));
        }
    }
}
