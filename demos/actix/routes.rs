use actix_web::{HttpResponse, Responder, web};

use crate::acl::{AppState, Visitor};

pub async fn whoami(
    state: web::Data<AppState>,
    visitor: Option<web::ReqData<Visitor>>,
) -> impl Responder {
    let allowed = state.acl.config().country;
    let body = match visitor.and_then(|visitor| visitor.country) {
        Some(country) => format!("admitted from {country}; this server allows {allowed}\n"),
        None => format!("admitted without a country check; this server allows {allowed}\n"),
    };
    HttpResponse::Ok().body(body)
}

pub async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok\n")
}
