mod acl;
mod routes;

use acl::middleware::IpAclGuard;
use actix_web::{App, HttpServer, web};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = acl::build_state().expect("valid IP ACL configuration");

    HttpServer::new(move || {
        let state = app_state.clone();
        App::new()
            .app_data(web::Data::from(state.clone()))
            .wrap(IpAclGuard::new(state.acl.clone()))
            .route("/whoami", web::get().to(routes::whoami))
            .route(acl::HEALTH_PATH, web::get().to(routes::healthz))
    })
    .bind(("127.0.0.1", 5002))?
    .run()
    .await
}
