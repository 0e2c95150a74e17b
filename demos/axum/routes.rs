use axum::{Extension, extract::State};

use crate::acl::{AppState, Visitor};

pub async fn whoami(State(state): State<AppState>, visitor: Option<Extension<Visitor>>) -> String {
    let allowed = state.acl.config().country;
    match visitor.and_then(|Extension(visitor)| visitor.country) {
        Some(country) => format!("admitted from {country}; this server allows {allowed}\n"),
        None => format!("admitted without a country check; this server allows {allowed}\n"),
    }
}

pub async fn healthz() -> &'static str {
    "ok\n"
}
