use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

static RATE_LIMITER: Lazy<DashMap<String, (u64, Instant)>> = Lazy::new(DashMap::new);

/// Fixed-window per-IP rate limiter. The limit comes from configuration and
/// is applied per second; requests without a resolvable peer address share
/// one window.
pub async fn rate_limit_middleware(
    State(limit): State<u64>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let now = Instant::now();
    // The map guard must not be held across the downstream await.
    let exceeded = {
        let mut entry = RATE_LIMITER.entry(ip).or_insert((0, now));

        // Reset window if expired
        if now.duration_since(entry.1) > Duration::from_secs(1) {
            *entry = (1, now);
        } else {
            entry.0 += 1;
        }
        entry.0 > limit
    };

    if exceeded {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}
