//! End-to-end tests for the decision orchestrator and applier

use cloak::detection::DatasetDetector;
use cloak::domain::{CloakError, Row, Schema};
use cloak::pipeline::{
    AnonymizationApplier, AnonymizationRequest, ApplyOptions, Decision, DecisionOrchestrator,
    DecisionRequest,
};
use cloak::transform::Technique;
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;

fn sample_rows() -> Vec<Row> {
    let names = ["Jane Smith", "Robert Jones", "Maria Garcia"];
    (0..12)
        .map(|i| {
            let mut row = Row::new();
            row.insert("user_id".into(), json!(format!("u-{i:03}")));
            row.insert("full_name".into(), json!(names[i % names.len()]));
            row.insert("email".into(), json!(format!("user{}@example.com", i % 4)));
            row.insert("ssn".into(), json!("123-45-6789"));
            row.insert("plan".into(), json!("basic"));
            row
        })
        .collect()
}

fn detect(rows: &[Row]) -> (Schema, cloak::detection::DetectionReport) {
    let schema = Schema::infer(rows, 100);
    let detector = DatasetDetector::new().unwrap();
    let report = detector.detect(rows, &schema);
    (schema, report)
}

fn anonymize_request(methods: &[(&str, &str)]) -> DecisionRequest {
    DecisionRequest {
        decision: Decision::Anonymize,
        anonymization: Some(AnonymizationRequest {
            fields_to_anonymize: vec![],
            anonymization_methods: methods
                .iter()
                .map(|(c, t)| (c.to_string(), t.to_string()))
                .collect(),
            unique_identifier: None,
            requires_lookup_file: false,
        }),
        overridden_columns: vec![],
    }
}

#[test]
fn test_anonymize_email_with_hash() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    assert!(report.affected_columns.contains("email"));

    let request = anonymize_request(&[("email", "hash_sha256")]);
    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    for (before, after) in rows.iter().zip(result.data.iter()) {
        let hashed = after["email"].as_str().unwrap();
        assert_eq!(hashed.len(), 64);
        assert!(hashed.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hashed, before["email"].as_str().unwrap());
    }

    // Same plaintext always hashes to the same digest
    let d0 = result.data[0]["email"].as_str().unwrap();
    let d4 = result.data[4]["email"].as_str().unwrap();
    assert_eq!(d0, d4, "user0@example.com appears in both rows");
    assert!(result.columns_anonymized.contains(&"email".to_string()));
}

#[test]
fn test_partial_method_map_still_covers_all_detected_columns() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    assert!(report.affected_columns.contains("email"));
    assert!(report.affected_columns.contains("ssn"));

    // Only email gets an explicit technique; ssn must still be
    // anonymized via its category default rather than passed through.
    let request = anonymize_request(&[("email", "hash_sha256")]);
    let result = DecisionOrchestrator::new()
        .process(rows, schema, &report, &request)
        .unwrap();

    assert!(result.columns_anonymized.contains(&"email".to_string()));
    assert!(result.columns_anonymized.contains(&"ssn".to_string()));
    for row in &result.data {
        assert_eq!(row["ssn"].as_str().unwrap(), "***********");
    }
}

#[test]
fn test_exclude_removes_columns_everywhere() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    let affected = report.affected_columns.clone();
    assert!(!affected.is_empty());

    let request = DecisionRequest {
        decision: Decision::Exclude,
        anonymization: None,
        overridden_columns: vec![],
    };
    let result = DecisionOrchestrator::new()
        .process(rows, schema, &report, &request)
        .unwrap();

    for column in &affected {
        assert!(!result.schema.contains(column));
        for row in &result.data {
            assert!(!row.contains_key(column), "{column} still present in rows");
        }
    }
    assert_eq!(result.details.columns_after, result.schema.len());
    assert!(result.data.iter().all(|r| r.contains_key("plan")));
}

#[test]
fn test_include_keeps_everything_with_warning() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    let request = DecisionRequest {
        decision: Decision::Include,
        anonymization: None,
        overridden_columns: vec![],
    };
    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    assert_eq!(result.data, rows);
    assert!(result.columns_removed.is_empty());
    assert!(result.columns_anonymized.is_empty());
    assert!(!result.details.warnings.is_empty());
}

#[test]
fn test_override_invariant() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    assert!(report.affected_columns.contains("email"));

    let mut request = anonymize_request(&[]);
    request.overridden_columns = vec!["email".to_string()];

    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    // Overridden columns come through bit-identical
    for (before, after) in rows.iter().zip(result.data.iter()) {
        assert_eq!(before["email"], after["email"]);
    }
    assert!(!result.columns_anonymized.contains(&"email".to_string()));
    // Non-overridden detected columns are still anonymized
    assert!(result.columns_anonymized.contains(&"ssn".to_string()));
}

#[test]
fn test_bypass_when_everything_is_overridden() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    let mut request = anonymize_request(&[]);
    request.overridden_columns = report.affected_columns.iter().cloned().collect();

    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    assert_eq!(result.data, rows);
    assert!(result.columns_anonymized.is_empty());
    assert!(!result.details.warnings.is_empty());
}

#[test]
fn test_unknown_technique_aborts_before_mutation() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    let request = anonymize_request(&[("email", "rot13")]);
    let err = DecisionOrchestrator::new()
        .process(rows, schema, &report, &request)
        .unwrap_err();
    assert!(matches!(err, CloakError::UnsupportedTechnique(ref id) if id == "rot13"));
}

#[test]
fn test_invalid_decision_string() {
    let err = Decision::from_str("obfuscate").unwrap_err();
    assert!(matches!(err, CloakError::InvalidDecision(ref s) if s == "obfuscate"));
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    let request = anonymize_request(&[("full_name", "substitute_fake")]);

    let options = ApplyOptions {
        seed: Some(42),
        ..ApplyOptions::new()
    };
    let a = DecisionOrchestrator::with_options(options.clone())
        .process(rows.clone(), schema.clone(), &report, &request)
        .unwrap();
    let b = DecisionOrchestrator::with_options(options)
        .process(rows, schema, &report, &request)
        .unwrap();

    assert_eq!(a.data, b.data);
}

#[test]
fn test_consistency_within_a_run() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    let request = anonymize_request(&[("full_name", "substitute_fake")]);

    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    // Identical originals map to identical replacements
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (before, after) in rows.iter().zip(result.data.iter()) {
        let original = before["full_name"].as_str().unwrap().to_string();
        let replaced = after["full_name"].as_str().unwrap().to_string();
        if let Some(prev) = seen.get(&original) {
            assert_eq!(prev, &replaced);
        }
        seen.insert(original, replaced);
    }
}

#[test]
fn test_lookup_table_round_trip() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    let mut request = anonymize_request(&[("email", "hash_sha256")]);
    if let Some(ref mut anon) = request.anonymization {
        anon.unique_identifier = Some("user_id".to_string());
        anon.requires_lookup_file = true;
    }

    let options = ApplyOptions {
        unique_identifier: Some("user_id".to_string()),
        build_lookup: true,
        ..ApplyOptions::new()
    };
    let result = DecisionOrchestrator::with_options(options)
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    let table = result.lookup_table.as_ref().unwrap();
    assert_eq!(table.record_count(), rows.len());

    let entry = table.get("u-000", "email").unwrap();
    assert_eq!(entry.original, "user0@example.com");
    assert_eq!(entry.anonymized, result.data[0]["email"].as_str().unwrap());
}

#[test]
fn test_schema_samples_refreshed_after_anonymization() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);
    let request = anonymize_request(&[("email", "hash_sha256")]);

    let result = DecisionOrchestrator::new()
        .process(rows, schema, &report, &request)
        .unwrap();

    let email = result.schema.get("email").unwrap();
    for sample in &email.sample_values {
        assert!(
            !sample.contains("@example.com"),
            "schema sample leaked plaintext: {sample}"
        );
    }
}

#[test]
fn test_fields_to_anonymize_restricts_scope() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    let mut request = anonymize_request(&[]);
    if let Some(ref mut anon) = request.anonymization {
        anon.fields_to_anonymize = vec!["email".to_string()];
    }

    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    assert_eq!(result.columns_anonymized, vec!["email".to_string()]);
    // Untouched detected columns stay original
    for (before, after) in rows.iter().zip(result.data.iter()) {
        assert_eq!(before["ssn"], after["ssn"]);
    }
}

#[test]
fn test_preview_does_not_mutate_and_matches_catalog() {
    let rows = sample_rows();
    let before = rows.clone();

    let mut techniques = BTreeMap::new();
    techniques.insert("email".to_string(), Technique::HashSha256);

    let applier = AnonymizationApplier::new(ApplyOptions::new());
    let preview = applier.preview(&rows, &techniques, 3).unwrap();

    assert_eq!(rows, before);
    assert_eq!(preview.len(), 3);
    for row in &preview {
        for cell in &row.cells {
            assert_eq!(cell.technique, "hash_sha256");
            assert_ne!(cell.original, cell.anonymized);
        }
    }
}

#[test]
fn test_null_cells_pass_through() {
    let mut rows = sample_rows();
    rows[0].insert("email".into(), serde_json::Value::Null);
    let (schema, report) = detect(&rows);

    let request = anonymize_request(&[("email", "hash_sha256")]);
    let result = DecisionOrchestrator::new()
        .process(rows, schema, &report, &request)
        .unwrap();

    assert!(result.data[0]["email"].is_null());
    assert!(result.data[1]["email"].is_string());
}

#[test]
fn test_default_techniques_without_method_map() {
    let rows = sample_rows();
    let (schema, report) = detect(&rows);

    // No methods supplied at all: defaults per category apply
    let request = anonymize_request(&[]);
    let result = DecisionOrchestrator::new()
        .process(rows.clone(), schema, &report, &request)
        .unwrap();

    // SSN defaults to full masking
    for row in &result.data {
        assert_eq!(row["ssn"].as_str().unwrap(), "***********");
    }
    // Email defaults to fake substitution
    for (before, after) in rows.iter().zip(result.data.iter()) {
        let email = after["email"].as_str().unwrap();
        assert!(email.contains('@'));
        assert_ne!(email, before["email"].as_str().unwrap());
    }
}
