//! End-to-end scoring tests over real input files
//!
//! Covers the reference scenarios, identical inputs, error results and the
//! deadline helper.

use grader_application::{MetricRegistry, ScoringService};
use grader_common::GraderConfig;
use grader_domain::{DuplicatePolicy, ScoreResult, UnknownMetricPolicy};
use grader_testing::builders::TableBuilder;
use grader_testing::fixtures::*;
use grader_testing::mocks::MockTableSource;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn service() -> ScoringService {
    ScoringService::from_config(&GraderConfig::default())
}

fn assert_score(result: ScoreResult, expected: f64) {
    match result {
        ScoreResult::Score { score } => assert!(
            (score - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            score
        ),
        ScoreResult::Error { error } => panic!("expected score {}, got error {}", expected, error),
    }
}

#[test]
fn test_accuracy_scenario() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", LABELS_SUBMISSION_CSV);

    assert_eq!(service().score(&sub, &gt, "accuracy"), ScoreResult::score(0.5));
}

#[test]
fn test_rmse_scenario() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", VALUES_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", VALUES_SUBMISSION_CSV);

    assert_eq!(service().score(&sub, &gt, "RMSE"), ScoreResult::score(1.154701));
}

#[test]
fn test_identical_files() {
    let dir = InputDir::new();
    let values = dir.write("values.csv", "id,y\n1,3.0\n2,-0.5\n3,2.0\n4,7.0\n");
    let labels = dir.write("labels.csv", "id,y\n1,a\n2,b\n3,a\n4,c\n");

    for metric in ["mae", "mse", "rmse"] {
        assert_eq!(service().score(&values, &values, metric), ScoreResult::score(0.0));
    }
    for metric in ["accuracy", "f1_weighted"] {
        assert_eq!(service().score(&labels, &labels, metric), ScoreResult::score(1.0));
    }
    assert_eq!(service().score(&values, &values, "r2"), ScoreResult::score(1.0));
}

#[test]
fn test_mixed_formats_and_compression() {
    let dir = InputDir::new();
    let gt = dir.write_gz(
        "gt.json.gz",
        id_value_json("label", &[(1, json!("yes")), (2, json!("no")), (3, json!("yes"))]),
    );
    let sub = dir.write("sub.tsv", "id\tlabel\n1\tyes\n2\tyes\n4\tno\n");

    assert_eq!(service().score(&sub, &gt, "accuracy"), ScoreResult::score(0.5));
}

#[test]
fn test_reference_regression_values() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", id_value_csv("y", &[(1, "3"), (2, "-0.5"), (3, "2"), (4, "7")]));
    let sub = dir.write("sub.csv", id_value_csv("y", &[(1, "2.5"), (2, "0.0"), (3, "2"), (4, "8")]));

    assert_score(service().score(&sub, &gt, "mae"), 0.5);
    assert_score(service().score(&sub, &gt, "mse"), 0.375);
    assert_score(service().score(&sub, &gt, "r2"), 0.948608);
    assert_score(service().score(&sub, &gt, "explained_variance"), 0.957173);
    assert_score(service().score(&sub, &gt, "median_absolute_error"), 0.5);
}

#[test]
fn test_reference_classification_values() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", id_value_csv("y", &[(1, "cat"), (2, "dog"), (3, "cat"), (4, "bird")]));
    let sub = dir.write("sub.csv", id_value_csv("y", &[(1, "cat"), (2, "cat"), (3, "cat"), (4, "dog")]));

    assert_score(service().score(&sub, &gt, "f1"), 0.4);
    assert_score(service().score(&sub, &gt, "f1_macro"), 0.266667);
    assert_score(service().score(&sub, &gt, "recall_weighted"), 0.5);
    assert_score(service().score(&sub, &gt, "balanced_accuracy"), 0.333333);
}

#[test]
fn test_binary_probability_metrics() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", id_value_csv("y", &[(1, "0"), (2, "0"), (3, "1"), (4, "1")]));
    let sub = dir.write("sub.csv", id_value_csv("y", &[(1, "0.1"), (2, "0.4"), (3, "0.35"), (4, "0.8")]));

    assert_score(service().score(&sub, &gt, "roc_auc"), 0.75);
    assert_score(service().score(&sub, &gt, "cross_entropy"), 0.472288);
}

#[test]
fn test_unknown_metric_falls_back_to_accuracy() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", LABELS_SUBMISSION_CSV);

    assert_eq!(service().score(&sub, &gt, "banana"), ScoreResult::score(0.5));
}

#[test]
fn test_unknown_metric_rejected_when_strict() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", LABELS_SUBMISSION_CSV);

    let mut config = GraderConfig::default();
    config.scoring.unknown_metric = UnknownMetricPolicy::Reject;
    let service = ScoringService::from_config(&config);

    assert_eq!(
        service.score(&sub, &gt, "banana"),
        ScoreResult::error("Unknown metric: banana")
    );
}

#[test]
fn test_empty_intersection() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", "id,y\n1,a\n");
    let sub = dir.write("sub.csv", "id,y\n2,a\n");

    assert_eq!(
        service().score(&sub, &gt, "accuracy"),
        ScoreResult::error("No matching IDs found.")
    );
}

#[test]
fn test_all_missing_regression_values() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", "id,y\n1,\n2,NA\n");
    let sub = dir.write("sub.csv", "id,y\n1,1.0\n2,2.0\n");

    assert_eq!(
        service().score(&sub, &gt, "mae"),
        ScoreResult::error("No valid numeric data.")
    );
}

#[test]
fn test_missing_file_is_an_error_result() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
    let missing = dir.file("missing.csv");

    let result = service().score(missing.to_str().unwrap(), &gt, "accuracy");
    assert!(result.as_error().unwrap().starts_with("Failed to read"));
}

#[test]
fn test_duplicate_ids_rejected_when_configured() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", "id,label\n1,yes\n1,no\n");

    assert_eq!(service().score(&sub, &gt, "accuracy"), ScoreResult::score(0.0));

    let mut config = GraderConfig::default();
    config.scoring.duplicate_ids = DuplicatePolicy::Reject;
    assert_eq!(
        ScoringService::from_config(&config).score(&sub, &gt, "accuracy"),
        ScoreResult::error("Duplicate ID found in submission: 1")
    );
}

#[test]
fn test_wire_shape() {
    let dir = InputDir::new();
    let gt = dir.write("gt.csv", VALUES_GROUND_TRUTH_CSV);
    let sub = dir.write("sub.csv", VALUES_SUBMISSION_CSV);

    let result = service().score(&sub, &gt, "rmse");
    assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"score":1.154701}"#);
}

#[test]
fn test_service_loads_both_inputs_once() {
    let source = Arc::new(
        MockTableSource::new()
            .with_table("gt", TableBuilder::new().numbers("id", &[1.0]).texts("y", &["a"]).build())
            .with_table("sub", TableBuilder::new().numbers("id", &[1.0]).texts("y", &["a"]).build()),
    );
    let service = ScoringService::new(
        Arc::new(MetricRegistry::standard()),
        source.clone(),
        DuplicatePolicy::default(),
    );

    assert_eq!(service.score("sub", "gt", "accuracy"), ScoreResult::score(1.0));
    assert_eq!(source.requests(), vec!["sub", "gt"]);
}

#[test]
fn test_failed_submission_load_skips_ground_truth() {
    let source = Arc::new(
        MockTableSource::new()
            .with_table("gt", TableBuilder::new().numbers("id", &[1.0]).texts("y", &["a"]).build()),
    );
    let service = ScoringService::new(
        Arc::new(MetricRegistry::standard()),
        source.clone(),
        DuplicatePolicy::default(),
    );

    let result = service.score("missing", "gt", "accuracy");
    assert!(result.as_error().is_some());
    assert_eq!(source.request_count(), 1);
}

#[tokio::test]
async fn test_score_within_times_out() {
    let source = MockTableSource::new()
        .with_table("gt", TableBuilder::new().numbers("id", &[1.0]).texts("y", &["a"]).build())
        .with_delay(Duration::from_millis(500));
    let service = Arc::new(ScoringService::new(
        Arc::new(MetricRegistry::standard()),
        Arc::new(source),
        DuplicatePolicy::default(),
    ));

    let result = service
        .score_within(
            "gt".to_string(),
            "gt".to_string(),
            "accuracy".to_string(),
            Duration::from_millis(50),
        )
        .await;

    assert_eq!(result, ScoreResult::error("Scoring timed out after 0.05s"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_scoring_is_idempotent(
        values in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 2..40),
        metric in proptest::sample::select(vec!["mae", "mse", "rmse", "r2", "mape", "explained_variance"]),
    ) {
        let to_csv = |column: fn(&(f64, f64)) -> f64| {
            let mut csv = String::from("id,y\n");
            for (i, pair) in values.iter().enumerate() {
                csv.push_str(&format!("{},{}\n", i, column(pair)));
            }
            csv
        };

        let dir = InputDir::new();
        let gt = dir.write("gt.csv", to_csv(|pair| pair.0));
        let sub = dir.write("sub.csv", to_csv(|pair| pair.1));

        let service = service();
        let first = service.score(&sub, &gt, metric);
        let second = service.score(&sub, &gt, metric);

        prop_assert!(first.is_score());
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
