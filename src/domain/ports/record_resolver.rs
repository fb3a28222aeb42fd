//! Record Resolver Port
//!
//! Defines the interface for resolving IP addresses to geolocation records.

use crate::domain::entities::GeoRecord;
use std::net::IpAddr;

/// Failure modes for record resolution.
///
/// A miss is deliberately not represented here: addresses absent from
/// the database resolve to [`GeoRecord::unknown`] so the policy's `UNK`
/// token can still govern them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// The source address was missing or not a syntactically valid
    /// IPv4/IPv6 address. Raised before any database access.
    #[error("invalid source address: {0}")]
    InvalidAddress(String),
    /// The database handle is not open and could not be opened.
    #[error("geolocation database unavailable: {0}")]
    DatabaseUnavailable(String),
}

/// Resolver for IP address to geolocation record.
///
/// This is an outbound port that abstracts the geolocation database.
/// Implementations may use MaxMind GeoLite2/GeoIP2 or other databases.
///
/// Implementations hold a single read-only handle for the process
/// lifetime; once opened, `resolve` is safe to call concurrently from
/// many request-handling tasks with no additional locking.
pub trait RecordResolver: Send + Sync {
    /// Resolve an IP address to a geolocation record.
    ///
    /// Returns a fresh record per call. Addresses not present in the
    /// database yield [`GeoRecord::unknown`], not an error.
    fn resolve(&self, ip: IpAddr) -> Result<GeoRecord, ResolveError>;
}
