//! Access Policy - allow/deny evaluation over resolved records
//!
//! A policy holds four independent allow/deny token-set pairs, one per
//! dimension (country, subdivision, metro code, ASN). Evaluation is a
//! pure function of the record; no state is carried between calls.

use crate::domain::entities::GeoRecord;
use crate::domain::value_objects::AttrValue;
use std::collections::HashSet;

/// Allow/deny token sets for a single dimension.
#[derive(Debug, Clone, Default)]
pub struct DimensionRule {
    allow: HashSet<String>,
    deny: HashSet<String>,
}

impl DimensionRule {
    pub fn new<A, D>(allow: A, deny: D) -> Self
    where
        A: IntoIterator<Item = String>,
        D: IntoIterator<Item = String>,
    {
        Self {
            allow: allow.into_iter().collect(),
            deny: deny.into_iter().collect(),
        }
    }

    /// True when neither set is configured.
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }

    /// The core decision primitive for one attribute value.
    ///
    /// A non-empty deny set acts as an exclusive blocklist: the verdict
    /// is deny-set membership alone, and the allow set is not consulted
    /// at all, even for values present in neither set. Operators wanting
    /// allow-list semantics for a dimension must leave its deny set
    /// empty. Existing deployments depend on this precedence, so it is
    /// kept as is.
    ///
    /// With an empty deny set, a non-empty allow set admits only its
    /// members; with both sets empty every value passes.
    pub fn check(&self, value: &AttrValue) -> bool {
        if !self.deny.is_empty() {
            return !value.in_set(&self.deny);
        }
        if !self.allow.is_empty() {
            return value.in_set(&self.allow);
        }
        true
    }
}

/// The four dimension rules applied to every request, in evaluation order.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    pub country: DimensionRule,
    pub subdivision: DimensionRule,
    pub metro: DimensionRule,
    pub asn: DimensionRule,
}

impl AccessPolicy {
    /// Evaluate a record against all four dimensions.
    ///
    /// Dimensions run in a fixed order and the first failing one decides:
    /// country, subdivisions, metro code, ASN. The request is allowed iff
    /// every dimension passes.
    pub fn evaluate(&self, record: &GeoRecord) -> bool {
        if !self.country.check(&record.country_value()) {
            return false;
        }
        if !self.check_subdivisions(record) {
            return false;
        }
        if !self.metro.check(&record.metro_value()) {
            return false;
        }
        self.asn.check(&record.asn_value())
    }

    /// Every listed subdivision must pass individually. Records without
    /// subdivision data are checked once as unknown, so `UNK` tokens in
    /// the subdivision sets apply to them.
    fn check_subdivisions(&self, record: &GeoRecord) -> bool {
        if record.subdivisions.is_empty() {
            return self.subdivision.check(&AttrValue::Unknown);
        }
        record
            .subdivisions
            .iter()
            .all(|code| self.subdivision.check(&AttrValue::from_text(code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(allow: &[&str], deny: &[&str]) -> DimensionRule {
        DimensionRule::new(
            allow.iter().map(|t| t.to_string()),
            deny.iter().map(|t| t.to_string()),
        )
    }

    fn record(country: &str, subdivisions: &[&str], metro_code: u16, asn: u32) -> GeoRecord {
        GeoRecord {
            country: if country.is_empty() {
                None
            } else {
                Some(country.to_string())
            },
            subdivisions: subdivisions.iter().map(|s| s.to_string()).collect(),
            metro_code,
            asn,
        }
    }

    // ===== DimensionRule::check =====

    #[test]
    fn test_check_both_sets_empty_passes_everything() {
        let r = rule(&[], &[]);

        assert!(r.check(&AttrValue::from_text("US")));
        assert!(r.check(&AttrValue::from_text("anything")));
        assert!(r.check(&AttrValue::Unknown));
    }

    #[test]
    fn test_check_deny_member_fails_regardless_of_allow() {
        let r = rule(&["CN"], &["CN"]);
        assert!(!r.check(&AttrValue::from_text("CN")));

        let r = rule(&[], &["CN"]);
        assert!(!r.check(&AttrValue::from_text("CN")));
    }

    #[test]
    fn test_check_deny_nonmember_passes_even_when_allow_misses() {
        // Documented precedence: a non-empty deny set makes the allow set
        // irrelevant, even for values listed in neither set.
        let r = rule(&["US"], &["CN"]);

        assert!(r.check(&AttrValue::from_text("DE")));
        assert!(r.check(&AttrValue::from_text("US")));
        assert!(r.check(&AttrValue::Unknown));
    }

    #[test]
    fn test_check_allow_only_admits_members() {
        let r = rule(&["US", "CA"], &[]);

        assert!(r.check(&AttrValue::from_text("US")));
        assert!(r.check(&AttrValue::from_text("CA")));
        assert!(!r.check(&AttrValue::from_text("DE")));
        assert!(!r.check(&AttrValue::Unknown));
    }

    #[test]
    fn test_check_empty_and_zero_behave_as_unknown() {
        let deny_unk = rule(&[], &["UNK"]);
        assert!(!deny_unk.check(&AttrValue::from_text("")));
        assert!(!deny_unk.check(&AttrValue::from_text("0")));
        assert!(!deny_unk.check(&AttrValue::Unknown));

        let allow_unk = rule(&["UNK"], &[]);
        assert!(allow_unk.check(&AttrValue::from_text("")));
        assert!(allow_unk.check(&AttrValue::from_text("0")));
        assert!(allow_unk.check(&AttrValue::Unknown));
    }

    #[test]
    fn test_rule_is_empty() {
        assert!(rule(&[], &[]).is_empty());
        assert!(!rule(&["US"], &[]).is_empty());
        assert!(!rule(&[], &["CN"]).is_empty());
    }

    // ===== AccessPolicy::evaluate =====

    #[test]
    fn test_evaluate_all_rules_empty_allows_any_record() {
        let policy = AccessPolicy::default();

        assert!(policy.evaluate(&record("US", &["CA"], 807, 15169)));
        assert!(policy.evaluate(&GeoRecord::unknown()));
    }

    #[test]
    fn test_evaluate_denied_country() {
        let policy = AccessPolicy {
            country: rule(&[], &["CN"]),
            ..AccessPolicy::default()
        };

        assert!(!policy.evaluate(&record("CN", &[], 0, 0)));
        assert!(policy.evaluate(&record("US", &[], 0, 0)));
    }

    #[test]
    fn test_evaluate_country_allow_list() {
        let policy = AccessPolicy {
            country: rule(&["US", "CA"], &[]),
            ..AccessPolicy::default()
        };

        assert!(policy.evaluate(&record("US", &[], 0, 0)));
        assert!(policy.evaluate(&record("CA", &[], 0, 0)));
        assert!(!policy.evaluate(&record("DE", &[], 0, 0)));
    }

    #[test]
    fn test_evaluate_no_subdivision_data_checked_once_as_unknown() {
        let policy = AccessPolicy {
            subdivision: rule(&["CA"], &[]),
            ..AccessPolicy::default()
        };
        assert!(!policy.evaluate(&record("US", &[], 0, 0)));

        let policy = AccessPolicy {
            subdivision: rule(&["UNK"], &[]),
            ..AccessPolicy::default()
        };
        assert!(policy.evaluate(&record("US", &[], 0, 0)));
    }

    #[test]
    fn test_evaluate_every_subdivision_must_pass() {
        let policy = AccessPolicy {
            subdivision: rule(&["CA", "ON"], &[]),
            ..AccessPolicy::default()
        };

        assert!(policy.evaluate(&record("CA", &["ON"], 0, 0)));
        assert!(policy.evaluate(&record("CA", &["ON", "CA"], 0, 0)));
        // One listed subdivision outside the allow set fails the dimension.
        assert!(!policy.evaluate(&record("CA", &["ON", "QC"], 0, 0)));
    }

    #[test]
    fn test_evaluate_denied_subdivision_among_several() {
        let policy = AccessPolicy {
            subdivision: rule(&[], &["QC"]),
            ..AccessPolicy::default()
        };

        assert!(policy.evaluate(&record("CA", &["ON"], 0, 0)));
        assert!(!policy.evaluate(&record("CA", &["ON", "QC"], 0, 0)));
    }

    #[test]
    fn test_evaluate_metro_code() {
        let policy = AccessPolicy {
            metro: rule(&[], &["807"]),
            ..AccessPolicy::default()
        };

        assert!(!policy.evaluate(&record("US", &[], 807, 0)));
        assert!(policy.evaluate(&record("US", &[], 501, 0)));
        // Metro code zero is the unknown sentinel, not the token "0".
        assert!(policy.evaluate(&record("US", &[], 0, 0)));
    }

    #[test]
    fn test_evaluate_unknown_asn_matches_unk_token() {
        let policy = AccessPolicy {
            asn: rule(&["UNK"], &[]),
            ..AccessPolicy::default()
        };

        assert!(policy.evaluate(&record("US", &[], 0, 0)));
        assert!(!policy.evaluate(&record("US", &[], 0, 15169)));
    }

    #[test]
    fn test_evaluate_denied_asn() {
        let policy = AccessPolicy {
            asn: rule(&[], &["15169"]),
            ..AccessPolicy::default()
        };

        assert!(!policy.evaluate(&record("US", &[], 0, 15169)));
        assert!(policy.evaluate(&record("US", &[], 0, 13335)));
    }

    #[test]
    fn test_evaluate_short_circuits_on_country() {
        // Country fails first; a passing ASN must not rescue the verdict.
        let policy = AccessPolicy {
            country: rule(&[], &["CN"]),
            asn: rule(&["4134"], &[]),
            ..AccessPolicy::default()
        };

        assert!(!policy.evaluate(&record("CN", &[], 0, 4134)));
    }

    #[test]
    fn test_evaluate_all_dimensions_must_pass() {
        let policy = AccessPolicy {
            country: rule(&["US"], &[]),
            subdivision: rule(&["CA", "UNK"], &[]),
            metro: rule(&[], &["501"]),
            asn: rule(&[], &["666"]),
        };

        assert!(policy.evaluate(&record("US", &["CA"], 807, 15169)));
        assert!(!policy.evaluate(&record("DE", &["CA"], 807, 15169)));
        assert!(!policy.evaluate(&record("US", &["NY"], 807, 15169)));
        assert!(!policy.evaluate(&record("US", &["CA"], 501, 15169)));
        assert!(!policy.evaluate(&record("US", &["CA"], 807, 666)));
    }

    #[test]
    fn test_evaluate_unknown_record_with_unk_denies() {
        let policy = AccessPolicy {
            country: rule(&[], &["UNK"]),
            ..AccessPolicy::default()
        };

        assert!(!policy.evaluate(&GeoRecord::unknown()));
        assert!(policy.evaluate(&record("US", &[], 0, 0)));
    }
}
