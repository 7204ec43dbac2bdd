use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

/// Supervisor ingress proxy.
pub const INGRESS_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(172, 30, 32, 2));

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    allow_all: bool,
    allowed: Vec<IpAddr>,
}

impl AccessPolicy {
    pub fn new(allow_all: bool) -> Self {
        Self {
            allow_all,
            allowed: vec![INGRESS_IP],
        }
    }

    pub fn allow_all(&self) -> bool {
        self.allow_all
    }

    /// Requests without a known peer address are refused unless everything is allowed.
    pub fn allows(&self, peer: Option<IpAddr>) -> bool {
        if self.allow_all {
            return true;
        }
        match peer {
            Some(ip) => self.allowed.contains(&ip.to_canonical()),
            None => false,
        }
    }
}

pub async fn require_allowed(
    State(policy): State<Arc<AccessPolicy>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    if policy.allows(peer) {
        return next.run(req).await;
    }

    warn!(peer = ?peer, path = %req.uri().path(), "blocked request");
    (StatusCode::FORBIDDEN, "not allowed").into_response()
}

#[cfg(test)]
mod tests {
    use super::{AccessPolicy, INGRESS_IP};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn only_ingress_by_default() {
        let policy = AccessPolicy::new(false);
        assert!(policy.allows(Some(INGRESS_IP)));
        assert!(!policy.allows(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)))));
        assert!(!policy.allows(None));
    }

    #[test]
    fn mapped_ipv6_ingress_is_allowed() {
        let policy = AccessPolicy::new(false);
        let mapped = IpAddr::V6(Ipv4Addr::new(172, 30, 32, 2).to_ipv6_mapped());
        assert!(policy.allows(Some(mapped)));
    }

    #[test]
    fn allow_all_accepts_everyone() {
        let policy = AccessPolicy::new(true);
        assert!(policy.allows(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))));
        assert!(policy.allows(None));
    }
}
