mod acl;
mod routes;

use std::net::SocketAddr;

use acl::middleware::ip_acl_middleware;
use axum::{Router, routing::get};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = acl::build_state().expect("valid IP ACL configuration");

    let app = Router::new()
        .route("/whoami", get(routes::whoami))
        .route(acl::HEALTH_PATH, get(routes::healthz))
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            ip_acl_middleware,
        ))
        .with_state(app_state);

    let addr: SocketAddr = "127.0.0.1:5001".parse().unwrap();
    tracing::info!("Axum example running on http://{addr}");

    axum::serve(
        tokio::net::TcpListener::bind(addr).await.unwrap(),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
