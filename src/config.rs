use crate::domain::services::{AccessPolicy, DimensionRule};
use anyhow::Context;
use serde::Deserialize;
use std::fs::File;

/// Process configuration. Built once at startup and read-only afterwards.
///
/// Each `allow_*`/`deny_*` entry is an opaque token compared by exact
/// string equality against the normalized attribute value; the token
/// `UNK` matches requests whose attribute is missing or zero.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Path to the MaxMind database file. Required; must open for
    /// reading at startup.
    pub db_path: String,

    pub allow_countries: Vec<String>,
    pub deny_countries: Vec<String>,
    pub allow_subdivisions: Vec<String>,
    pub deny_subdivisions: Vec<String>,
    pub allow_metro_codes: Vec<String>,
    pub deny_metro_codes: Vec<String>,
    pub allow_asn: Vec<String>,
    pub deny_asn: Vec<String>,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            db_path: "GeoLite2-City.mmdb".to_string(),
            allow_countries: Vec::new(),
            deny_countries: Vec::new(),
            allow_subdivisions: Vec::new(),
            deny_subdivisions: Vec::new(),
            allow_metro_codes: Vec::new(),
            deny_metro_codes: Vec::new(),
            allow_asn: Vec::new(),
            deny_asn: Vec::new(),
            debug: false,
        }
    }
}

impl Config {
    /// Probe the database path: the file is opened (and closed) once for
    /// reading. A failure here aborts startup with a descriptive error.
    pub fn validate(&self) -> anyhow::Result<()> {
        File::open(&self.db_path)
            .map(drop)
            .with_context(|| format!("cannot open database file {}", self.db_path))
    }

    /// Build the process-lifetime policy from the configured token lists.
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy {
            country: DimensionRule::new(
                self.allow_countries.iter().cloned(),
                self.deny_countries.iter().cloned(),
            ),
            subdivision: DimensionRule::new(
                self.allow_subdivisions.iter().cloned(),
                self.deny_subdivisions.iter().cloned(),
            ),
            metro: DimensionRule::new(
                self.allow_metro_codes.iter().cloned(),
                self.deny_metro_codes.iter().cloned(),
            ),
            asn: DimensionRule::new(self.allow_asn.iter().cloned(), self.deny_asn.iter().cloned()),
        }
    }
}

fn list_var(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr =
        std::env::var("GEOGATE_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let db_path = std::env::var("GEOGATE_DB_PATH")
        .context("GEOGATE_DB_PATH must point to a MaxMind database file")?;

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        listen_addr,
        db_path,
        allow_countries: list_var("GEOGATE_ALLOW_COUNTRIES"),
        deny_countries: list_var("GEOGATE_DENY_COUNTRIES"),
        allow_subdivisions: list_var("GEOGATE_ALLOW_SUBDIVISIONS"),
        deny_subdivisions: list_var("GEOGATE_DENY_SUBDIVISIONS"),
        allow_metro_codes: list_var("GEOGATE_ALLOW_METRO_CODES"),
        deny_metro_codes: list_var("GEOGATE_DENY_METRO_CODES"),
        allow_asn: list_var("GEOGATE_ALLOW_ASN"),
        deny_asn: list_var("GEOGATE_DENY_ASN"),
        debug,
    })
}
