//! geogate Library
//!
//! This module exposes the geogate components for use in integration tests
//! and as a library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::inbound::{peer_gate, GateServer};
pub use adapters::outbound::MaxMindResolver;
pub use application::AccessService;
pub use config::{load_config, Config};
pub use domain::entities::GeoRecord;
pub use domain::ports::{RecordResolver, ResolveError};
pub use domain::services::{AccessPolicy, DimensionRule};
pub use domain::value_objects::{AttrValue, UNKNOWN_TOKEN};
