use std::net::SocketAddr;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{me, profiles, system};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(profiles::router())
                .merge(me::router())
                .merge(system::router()),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let auth = req
                        .headers()
                        .get(AUTHORIZATION)
                        .map(redact_authorization)
                        .unwrap_or_else(|| "none".to_string());
                    tracing::info_span!("http_request", %method, uri = %uri, auth = %auth)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Keep the scheme for the request span, never the credential.
fn redact_authorization(value: &HeaderValue) -> String {
    match value.to_str() {
        Ok(v) => match v.split_once(' ') {
            Some((scheme, _)) => format!("{scheme} [redacted]"),
            None => "[redacted]".to_string(),
        },
        Err(_) => "[redacted]".to_string(),
    }
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_credentials_are_redacted() {
        let header = HeaderValue::from_static("Bearer eyJhbGciOi.secret.payload");
        let redacted = redact_authorization(&header);
        assert_eq!(redacted, "Bearer [redacted]");
        assert!(!redacted.contains("secret"));
    }

    #[test]
    fn schemeless_values_are_fully_redacted() {
        let header = HeaderValue::from_static("rawtokenvalue");
        assert_eq!(redact_authorization(&header), "[redacted]");
    }
}
