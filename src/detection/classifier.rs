//! Column classifier
//!
//! Combines name-based and value-based evidence into a confidence score
//! per PII category. Name and address categories carry structural
//! heuristics on top of the catalog regexes because capitalized
//! multi-word strings are common in non-PII descriptive columns.

use crate::detection::patterns::{CategoryPatterns, PatternRegistry};
use crate::detection::report::PiiCategory;
use std::sync::Arc;

/// Maximum number of sample values considered per column
pub const MAX_SAMPLE_VALUES: usize = 100;

/// Minimum value length for the address structural heuristic
const MIN_ADDRESS_LEN: usize = 8;

/// Fraction of sampled values that must look like addresses
const ADDRESS_MATCH_FRACTION: f64 = 0.7;

/// Vocabulary that disqualifies a capitalized multi-word value from
/// counting as a person name (producers, places, descriptive labels)
const NON_PERSON_VOCAB: &[&str] = &[
    "chateau", "domaine", "estate", "vineyard", "vineyards", "winery", "cellars", "reserve",
    "valley", "ridge", "creek", "hills", "mountain", "lake", "river", "park", "north", "south",
    "east", "west", "city", "county", "company", "group", "inc", "ltd",
];

/// Classification outcome for one column
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Best-matching category, `None` when the column is not PII
    pub category: Option<PiiCategory>,
    /// Confidence score in [0, 1]
    pub confidence: f64,
    /// Sampled values matching the winning category
    pub match_count: usize,
}

impl Classification {
    fn not_pii() -> Self {
        Self {
            category: None,
            confidence: 0.0,
            match_count: 0,
        }
    }
}

/// Heuristic per-column PII classifier
///
/// Stateless apart from the shared read-only registry; safe to use
/// concurrently across columns.
pub struct ColumnClassifier {
    registry: Arc<PatternRegistry>,
}

impl ColumnClassifier {
    /// Create a classifier over a pattern registry
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Classify a column from its name and a sample of values
    ///
    /// An empty sample yields confidence 0.0 and no category. Values are
    /// evaluated as strings regardless of their original JSON type.
    pub fn classify(&self, column_name: &str, samples: &[String]) -> Classification {
        let samples: Vec<&str> = samples
            .iter()
            .take(MAX_SAMPLE_VALUES)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect();

        if samples.is_empty() {
            return Classification::not_pii();
        }

        let column_lower = column_name.to_lowercase();
        let mut best = Classification::not_pii();

        for patterns in self.registry.categories() {
            let (confidence, match_count) = self.score(patterns, &column_lower, &samples);
            // Strictly-greater keeps the catalog's tie-break order
            if confidence > best.confidence {
                best = Classification {
                    category: Some(patterns.category),
                    confidence,
                    match_count,
                };
            }
        }

        if best.confidence < self.registry.detection_threshold() {
            return Classification {
                category: None,
                confidence: best.confidence,
                match_count: 0,
            };
        }
        best
    }

    fn score(
        &self,
        patterns: &CategoryPatterns,
        column_lower: &str,
        samples: &[&str],
    ) -> (f64, usize) {
        let structural = matches!(patterns.category, PiiCategory::Name | PiiCategory::Address);

        // Descriptive columns (winery, variety, country, ...) produce
        // capitalized multi-word values that are not people or places of
        // residence; suppress name/address evidence entirely for them.
        if structural && self.registry.is_excluded_name(column_lower) {
            return (0.0, 0);
        }

        let keyword_hit = patterns.name_matches(column_lower);
        let mut confidence = 0.0;
        if keyword_hit {
            confidence += self.registry.name_keyword_weight();
        }

        let match_count = match patterns.category {
            PiiCategory::Name => self.count_name_matches(samples, keyword_hit),
            PiiCategory::Address => self.count_address_matches(patterns, samples),
            _ => samples.iter().filter(|v| patterns.matches(v)).count(),
        };

        let fraction = match_count as f64 / samples.len() as f64;
        let value_threshold = match patterns.category {
            PiiCategory::Address => ADDRESS_MATCH_FRACTION.max(patterns.value_threshold),
            _ => patterns.value_threshold,
        };
        if fraction >= value_threshold && match_count > 0 {
            confidence += patterns.value_weight;
        }

        (confidence.clamp(0.0, 1.0), match_count)
    }

    fn count_name_matches(&self, samples: &[&str], keyword_hit: bool) -> usize {
        samples
            .iter()
            .filter(|v| self.looks_like_person_name(v, keyword_hit))
            .count()
    }

    /// Multi-word capitalized tokens; without an explicit name keyword
    /// the check is stricter and rejects descriptive vocabulary.
    fn looks_like_person_name(&self, value: &str, keyword_hit: bool) -> bool {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        if tokens.len() < 2 || tokens.len() > 4 {
            return false;
        }

        let capitalized = tokens.iter().all(|t| {
            let mut chars = t.chars();
            matches!(chars.next(), Some(c) if c.is_uppercase())
                && t.chars().all(|c| c.is_alphabetic() || matches!(c, '\'' | '-' | '.'))
        });
        if !capitalized {
            return false;
        }
        if keyword_hit {
            return true;
        }

        let lower = value.to_lowercase();
        let has_vocab = NON_PERSON_VOCAB
            .iter()
            .any(|w| lower.split_whitespace().any(|t| t == *w))
            || self
                .registry
                .exclusion_words()
                .iter()
                .any(|w| lower.contains(w.as_str()));
        !has_vocab
    }

    fn count_address_matches(&self, patterns: &CategoryPatterns, samples: &[&str]) -> usize {
        samples
            .iter()
            .filter(|v| v.len() >= MIN_ADDRESS_LEN && patterns.matches(v))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ColumnClassifier {
        ColumnClassifier::new(Arc::new(PatternRegistry::default_patterns().unwrap()))
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_email_by_name_and_value() {
        let c = classifier().classify(
            "email",
            &strings(&["jane.doe@example.com", "bob@corp.io", "a@b.co"]),
        );
        assert_eq!(c.category, Some(PiiCategory::Email));
        assert!(c.confidence > 0.9);
        assert_eq!(c.match_count, 3);
    }

    #[test]
    fn test_email_by_value_only() {
        let c = classifier().classify(
            "contact_info",
            &strings(&["jane.doe@example.com", "bob@corp.io"]),
        );
        assert_eq!(c.category, Some(PiiCategory::Email));
        assert!((c.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_name_keyword_alone_is_not_enough_without_values() {
        // 0.6 from the keyword alone passes the 0.5 threshold
        let c = classifier().classify("first_name", &strings(&["alice", "bob"]));
        assert_eq!(c.category, Some(PiiCategory::Name));
        assert!((c.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_winery_exclusion_suppresses_name() {
        let c = classifier().classify(
            "winery",
            &strings(&["Chateau Margaux", "Opus One", "Penfolds Grange"]),
        );
        assert_eq!(c.category, None);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_person_names_without_keyword() {
        let c = classifier().classify(
            "respondent",
            &strings(&["Jane Doe", "Robert Smith", "Maria Garcia-Lopez"]),
        );
        assert_eq!(c.category, Some(PiiCategory::Name));
    }

    #[test]
    fn test_descriptive_values_rejected_without_keyword() {
        let c = classifier().classify(
            "producer",
            &strings(&["Silver Ridge Cellars", "Green Valley Estate", "Stone Creek Winery"]),
        );
        assert_eq!(c.category, None);
    }

    #[test]
    fn test_ssn_low_threshold() {
        let c = classifier().classify(
            "id_code",
            &strings(&["123-45-6789", "987-65-4321", "n/a", "n/a", "n/a"]),
        );
        // 2/5 = 0.4 matches exceed the 0.3 SSN threshold
        assert_eq!(c.category, Some(PiiCategory::Ssn));
    }

    #[test]
    fn test_address_needs_high_fraction() {
        let c = classifier().classify(
            "location",
            &strings(&["123 Main Street", "eastern district", "mountains", "coastal"]),
        );
        assert_eq!(c.category, None);

        let c = classifier().classify(
            "location",
            &strings(&["123 Main Street", "99 Oak Avenue", "7 Elm Rd", "450 Pine Blvd"]),
        );
        assert_eq!(c.category, Some(PiiCategory::Address));
    }

    #[test]
    fn test_empty_sample_is_unknown() {
        let c = classifier().classify("email", &[]);
        assert_eq!(c.category, None);
        assert_eq!(c.confidence, 0.0);

        let c = classifier().classify("email", &strings(&["", "  "]));
        assert_eq!(c.category, None);
    }

    #[test]
    fn test_numbers_as_strings_evaluated_as_strings() {
        let c = classifier().classify("phone", &strings(&["5551234567", "5559876543"]));
        assert_eq!(c.category, Some(PiiCategory::Phone));
        // Keyword (0.6) plus value evidence (0.8), clamped
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn test_confidence_clamped() {
        let c = classifier().classify(
            "email_address",
            &strings(&["a@b.com", "c@d.org", "e@f.net"]),
        );
        assert!(c.confidence <= 1.0);
    }

    #[test]
    fn test_date_of_birth_detection() {
        let c = classifier().classify(
            "dob",
            &strings(&["1984-02-11", "1991-07-23", "1979-12-01"]),
        );
        assert_eq!(c.category, Some(PiiCategory::DateOfBirth));
    }

    #[test]
    fn test_ip_address_detection() {
        let c = classifier().classify(
            "last_seen_from",
            &strings(&["192.168.0.1", "10.20.30.40"]),
        );
        assert_eq!(c.category, Some(PiiCategory::IpAddress));
    }
}
