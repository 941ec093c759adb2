//! Client address resolution for per-client quotas.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the IP address used as a client's quota key.
///
/// The port is always dropped, so several connections from one host share a
/// quota.
///
/// When `behind_proxy` is set, the left-most `X-Forwarded-For` entry is used,
/// then `X-Real-IP`, then the socket peer. Otherwise headers are ignored and
/// only the socket peer counts, since clients could spoof them.
///
/// Returns `None` when no parseable address is available.
///
/// # Examples
///
/// ```ignore
/// let peer: SocketAddr = "10.0.0.7:51234".parse().unwrap();
/// let ip = resolve_client_ip(&HeaderMap::new(), Some(peer), false);
/// assert_eq!(ip, Some("10.0.0.7".parse().unwrap()));
/// ```
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<IpAddr> {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip);
    }

    peer.map(|addr| addr.ip())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
