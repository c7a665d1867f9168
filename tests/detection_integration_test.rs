//! Integration tests for PII detection over synthetic tabular data

use cloak::detection::{DatasetDetector, PatternRegistry, PiiCategory, RiskLevel};
use cloak::domain::{Row, Schema};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

/// A synthetic customer dataset containing several kinds of PII
fn customer_rows() -> Vec<Row> {
    let names = ["Jane Smith", "Robert Jones", "Maria Garcia", "Wei Chen"];
    let streets = [
        "123 Main Street",
        "48 Oak Avenue Apt 2",
        "901 Harbor Blvd",
        "17 Cedar Lane",
    ];
    (0..20)
        .map(|i| {
            let mut row = Row::new();
            row.insert("customer_id".into(), json!(format!("C-{i:04}")));
            row.insert("full_name".into(), json!(names[i % names.len()]));
            row.insert("email".into(), json!(format!("user{i}@example.com")));
            row.insert("phone".into(), json!("555-867-5309"));
            row.insert("ssn".into(), json!("123-45-6789"));
            row.insert("address".into(), json!(streets[i % streets.len()]));
            row.insert("birth_date".into(), json!("1984-02-29"));
            row.insert("balance".into(), json!(100.5 + i as f64));
            row
        })
        .collect()
}

/// A wine-review style dataset with no PII at all
fn wine_rows() -> Vec<Row> {
    (0..15)
        .map(|i| {
            let mut row = Row::new();
            row.insert("country".into(), json!("Portugal"));
            row.insert("winery".into(), json!("Quinta dos Avidagos"));
            row.insert("province".into(), json!("Douro"));
            row.insert("region_1".into(), json!("Alto Douro"));
            row.insert("variety".into(), json!("Portuguese Red"));
            row.insert("designation".into(), json!("Avidagos"));
            row.insert("points".into(), json!(85 + (i % 10)));
            row.insert("price".into(), json!(15.0 + i as f64));
            row
        })
        .collect()
}

#[test]
fn test_customer_dataset_detects_all_categories() {
    let rows = customer_rows();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);

    assert!(report.has_pii);
    assert_eq!(report.risk_level, RiskLevel::High);
    for column in ["full_name", "email", "phone", "ssn", "address", "birth_date"] {
        assert!(
            report.affected_columns.contains(column),
            "expected {column} to be flagged"
        );
    }
    assert!(!report.affected_columns.contains("balance"));

    assert_eq!(report.findings_for("ssn")[0].category, PiiCategory::Ssn);
    assert_eq!(report.findings_for("email")[0].category, PiiCategory::Email);
    assert_eq!(
        report.findings_for("birth_date")[0].category,
        PiiCategory::DateOfBirth
    );
}

#[test]
fn test_wine_dataset_is_clean() {
    let rows = wine_rows();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);

    assert!(!report.has_pii, "found: {:?}", report.affected_columns);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert!(report.findings.is_empty());
}

#[test]
fn test_winery_column_not_mistaken_for_name() {
    // "winery" contains "name"-adjacent capitalized values; the
    // exclusion vocabulary must keep it out of the report
    let rows = wine_rows();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);
    assert!(!report.affected_columns.contains("winery"));
    assert!(!report.affected_columns.contains("country"));
    assert!(!report.affected_columns.contains("province"));
}

#[test]
fn test_masked_samples_never_expose_raw_values() {
    let rows = customer_rows();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);
    for finding in &report.findings {
        assert!(!finding.sample_value_masked.contains("123-45-6789"));
        assert!(!finding.sample_value_masked.contains("user0@example.com"));
        assert!(!finding.sample_value_masked.contains("Jane Smith"));
    }
}

#[test]
fn test_recommendations_cover_each_affected_category() {
    let rows = customer_rows();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);
    assert!(!report.recommendations.is_empty());
    let joined = report.recommendations.join("\n").to_lowercase();
    assert!(joined.contains("ssn") || joined.contains("social security"));
    assert!(joined.contains("email"));
}

#[test]
fn test_custom_pattern_library_from_file() {
    let toml = r#"
[settings]
detection_threshold = 0.5
name_keyword_weight = 0.6

[categories.email]
patterns = ['^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$']
value_threshold = 0.4
value_weight = 0.8
keywords = ["email", "e-mail"]
"#;
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    write!(file, "{toml}").unwrap();

    let registry = PatternRegistry::from_file(file.path()).unwrap();
    let detector = DatasetDetector::with_registry(Arc::new(registry));

    let rows = customer_rows();
    let schema = Schema::infer(&rows, 100);
    let report = detector.detect(&rows, &schema);

    // The cut-down catalog only knows about email
    assert!(report.affected_columns.contains("email"));
    assert!(!report.affected_columns.contains("ssn"));
}

#[test]
fn test_pattern_library_load_failures() {
    assert!(PatternRegistry::from_file("/nonexistent/patterns.toml").is_err());

    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    write!(
        file,
        r#"
[settings]
detection_threshold = 0.5
name_keyword_weight = 0.6

[categories.email]
patterns = ['(unclosed']
"#
    )
    .unwrap();
    assert!(PatternRegistry::from_file(file.path()).is_err());
}

#[test]
fn test_detection_on_generated_identities() {
    // Detection should not depend on any fixed value set
    let rows: Vec<Row> = (0..50)
        .map(|i| {
            let mut row = Row::new();
            row.insert("email".into(), json!(SafeEmail().fake::<String>()));
            row.insert("full_name".into(), json!(Name().fake::<String>()));
            row.insert("note".into(), json!(format!("order {i}")));
            row
        })
        .collect();
    let schema = Schema::infer(&rows, 100);
    let detector = DatasetDetector::new().unwrap();

    let report = detector.detect(&rows, &schema);
    assert!(report.affected_columns.contains("email"));
    assert!(report.affected_columns.contains("full_name"));
    assert!(!report.affected_columns.contains("note"));
}

#[test]
fn test_schema_infer_types_and_samples() {
    let rows = customer_rows();
    let schema = Schema::infer(&rows, 100);

    assert!(schema.contains("email"));
    assert!(schema.contains("balance"));
    assert_eq!(schema.len(), 8);
    let email = schema.get("email").unwrap();
    assert!(!email.sample_values.is_empty());
}
