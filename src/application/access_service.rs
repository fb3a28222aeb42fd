//! Access Service - the public allow/deny predicate
//!
//! Orchestrates record resolution and policy evaluation, converting every
//! resolution failure into a deny verdict plus a log line. Callers only
//! ever see a plain bool; no error crosses this boundary.

use crate::domain::ports::{RecordResolver, ResolveError};
use crate::domain::services::AccessPolicy;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Per-request access-control decision service.
///
/// Built once at startup from the process-lifetime policy; each call
/// performs a fresh resolution (no caching) and a stateless evaluation.
pub struct AccessService {
    resolver: Arc<dyn RecordResolver>,
    policy: AccessPolicy,
}

impl AccessService {
    pub fn new(resolver: Arc<dyn RecordResolver>, policy: AccessPolicy) -> Self {
        Self { resolver, policy }
    }

    /// Decide whether a request from `ip` may proceed.
    ///
    /// Resolution failures deny: a warning for bad input, an error log
    /// when the database cannot be opened.
    pub fn should_allow(&self, ip: IpAddr) -> bool {
        let record = match self.resolver.resolve(ip) {
            Ok(record) => record,
            Err(ResolveError::InvalidAddress(addr)) => {
                tracing::warn!("cannot parse source address {}", addr);
                return false;
            }
            Err(ResolveError::DatabaseUnavailable(reason)) => {
                tracing::error!("geolocation lookup failed for {}: {}", ip, reason);
                return false;
            }
        };

        tracing::debug!(
            ip = %ip,
            country = record.country.as_deref().unwrap_or(""),
            subdivisions = %record.subdivisions.join(","),
            metro_code = record.metro_code,
            asn = record.asn,
            "resolved geolocation record"
        );

        self.policy.evaluate(&record)
    }

    /// Like [`should_allow`](Self::should_allow), for callers holding the
    /// peer address as text. Accepts a bare IP or an `ip:port` form.
    /// Unparsable input is denied without touching the database.
    pub fn should_allow_addr(&self, addr: &str) -> bool {
        match parse_source_ip(addr) {
            Ok(ip) => self.should_allow(ip),
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}

/// Parse a textual peer address: a bare IPv4/IPv6 address, or the
/// `ip:port` / `[ip]:port` form a connection's remote address usually
/// carries.
pub fn parse_source_ip(addr: &str) -> Result<IpAddr, ResolveError> {
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Ok(ip);
    }
    addr.parse::<SocketAddr>()
        .map(|sa| sa.ip())
        .map_err(|_| ResolveError::InvalidAddress(addr.to_string()))
}
