//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geogate domain.
//! They have no external dependencies and contain only business logic.

use crate::domain::value_objects::AttrValue;

/// Geolocation record resolved for a single source address.
///
/// Records are produced fresh per lookup, never mutated afterwards and
/// never cached: every request triggers a new resolution. Missing
/// attributes are represented by `None`, an empty sequence or a zero
/// code depending on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoRecord {
    /// Country code (ISO 3166-1 alpha-2), absent when the database has
    /// no country data for the address.
    pub country: Option<String>,
    /// Subdivision codes (ISO 3166-2), ordered from widest to narrowest.
    /// Empty when the database carries no subdivision data.
    pub subdivisions: Vec<String>,
    /// Metropolitan area code; `0` means no metro code assigned.
    pub metro_code: u16,
    /// Autonomous system number; `0` means no ASN assigned.
    pub asn: u32,
}

impl GeoRecord {
    /// The record used for addresses the database knows nothing about.
    /// It flows through normal evaluation, so policies can target it
    /// with the `UNK` token.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Country attribute, normalized.
    pub fn country_value(&self) -> AttrValue {
        AttrValue::from_text(self.country.as_deref().unwrap_or(""))
    }

    /// Metro code attribute, normalized.
    pub fn metro_value(&self) -> AttrValue {
        AttrValue::from_code(u32::from(self.metro_code))
    }

    /// ASN attribute, normalized.
    pub fn asn_value(&self) -> AttrValue {
        AttrValue::from_code(self.asn)
    }
}
