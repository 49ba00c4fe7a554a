//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the contact endpoint is limited: every accepted post costs a
//! Formspree submission.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Seconds to replenish one contact token.
const CONTACT_REPLENISH_SECS: u64 = 12;

/// Contact posts allowed in a burst.
const CONTACT_BURST: u32 = 5;

/// Key extractor for the visitor's address.
///
/// Keys on the peer address. `X-Forwarded-For` and `X-Real-IP` are only
/// read when `trust_proxy` is set, since any client can send them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }

    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();

        // First hop of X-Forwarded-For is the visitor
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Some(ip);
        }

        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = self.trust_proxy.then(|| Self::forwarded_ip(req)).flatten() {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create the rate limiter for contact posts: about 5 per minute per IP.
///
/// Proxy headers are honoured only with `trust_proxy`. Returns `None` if the
/// limiter configuration is rejected, in which case the route is served
/// unlimited.
#[must_use]
pub fn contact_rate_limiter(trust_proxy: bool) -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy))
        .per_second(CONTACT_REPLENISH_SECS)
        .burst_size(CONTACT_BURST)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tower_governor::key_extractor::KeyExtractor;

    fn peer(addr: &str) -> ConnectInfo<SocketAddr> {
        ConnectInfo(addr.parse::<SocketAddr>().unwrap())
    }

    #[test]
    fn test_forwarded_for_first_hop_behind_proxy() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        req.extensions_mut().insert(peer("10.0.0.1:4000"));
        let ip = ClientIpKeyExtractor::new(true).extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_real_ip_behind_proxy() {
        let req = Request::builder()
            .header("x-real-ip", "203.0.113.8")
            .body(())
            .unwrap();
        let ip = ClientIpKeyExtractor::new(true).extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.8".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_proxy_headers_ignored_by_default() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "203.0.113.8")
            .body(())
            .unwrap();
        req.extensions_mut().insert(peer("198.51.100.2:4000"));
        let ip = ClientIpKeyExtractor::default().extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "not-an-ip")
            .body(())
            .unwrap();
        req.extensions_mut().insert(peer("198.51.100.2:4000"));
        let ip = ClientIpKeyExtractor::new(true).extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_no_source_is_an_error() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();
        assert!(ClientIpKeyExtractor::default().extract(&req).is_err());
        assert!(ClientIpKeyExtractor::new(true)
            .extract(&Request::builder().body(()).unwrap())
            .is_err());
    }

    #[test]
    fn test_contact_rate_limiter_builds() {
        assert!(contact_rate_limiter(false).is_some());
        assert!(contact_rate_limiter(true).is_some());
    }
}
