//! MaxMind Record Resolver
//!
//! Implements RecordResolver over a MaxMind GeoLite2/GeoIP2 database file.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::{RecordResolver, ResolveError};
use maxminddb::{MaxMindDBError, Reader};
use parking_lot::RwLock;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Wire shape of the database sections this resolver reads. Field names
/// follow the MaxMind schema; sections absent from a given database
/// edition (Country databases have no `location`, City databases no ASN)
/// deserialize to their defaults.
#[derive(Debug, Deserialize)]
struct DbRecord {
    country: Option<DbCountry>,
    #[serde(default)]
    subdivisions: Vec<DbSubdivision>,
    location: Option<DbLocation>,
    autonomous_system_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DbCountry {
    iso_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DbSubdivision {
    iso_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DbLocation {
    metro_code: Option<u16>,
}

/// MaxMind-backed record resolver.
///
/// Holds the single read-only database handle for the process lifetime.
/// The handle is normally opened during startup via [`open`](Self::open),
/// but resolution tolerates being called first: the open happens lazily
/// behind a lock, and concurrent first users observe exactly one opened
/// handle or a terminal `DatabaseUnavailable` error.
pub struct MaxMindResolver {
    path: PathBuf,
    reader: RwLock<Option<Arc<Reader<Vec<u8>>>>>,
}

impl MaxMindResolver {
    /// Create a resolver for the database at `path` without opening it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: RwLock::new(None),
        }
    }

    /// Open the database eagerly. Idempotent; meant for the startup phase
    /// so the first request does not pay the open cost.
    pub fn open(&self) -> Result<(), ResolveError> {
        self.handle().map(|_| ())
    }

    fn handle(&self) -> Result<Arc<Reader<Vec<u8>>>, ResolveError> {
        if let Some(reader) = self.reader.read().as_ref() {
            return Ok(Arc::clone(reader));
        }

        let mut slot = self.reader.write();
        // Another task may have opened it while we waited for the lock.
        if let Some(reader) = slot.as_ref() {
            return Ok(Arc::clone(reader));
        }

        let reader = Reader::open_readfile(&self.path).map_err(|e| {
            ResolveError::DatabaseUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let reader = Arc::new(reader);
        *slot = Some(Arc::clone(&reader));
        tracing::info!("geolocation database loaded from {}", self.path.display());
        Ok(reader)
    }
}

impl RecordResolver for MaxMindResolver {
    fn resolve(&self, ip: IpAddr) -> Result<GeoRecord, ResolveError> {
        let reader = self.handle()?;

        let raw: DbRecord = match reader.lookup(ip) {
            Ok(raw) => raw,
            Err(MaxMindDBError::AddressNotFoundError(_)) => return Ok(GeoRecord::unknown()),
            Err(e) => return Err(ResolveError::DatabaseUnavailable(e.to_string())),
        };

        Ok(GeoRecord {
            country: raw.country.and_then(|c| c.iso_code),
            subdivisions: raw
                .subdivisions
                .into_iter()
                .filter_map(|s| s.iso_code)
                .collect(),
            metro_code: raw.location.and_then(|l| l.metro_code).unwrap_or(0),
            asn: raw.autonomous_system_number.unwrap_or(0),
        })
    }
}
