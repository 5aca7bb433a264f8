//! Integration test: config load, record store, lookup + predict service, HTTP routes.

mod common;

use axum::body::Body;
use common::{fixture, fixture_config, load_store};
use credit_scoring::config::ServiceConfig;
use credit_scoring::features::Preprocessor;
use credit_scoring::model::ScoringError;
use credit_scoring::server::router;
use credit_scoring::store::{FieldValue, RecordLookup, StoreError};
use credit_scoring::{
    CreditService, CustomerRecord, FeatureFrame, FeatureSchema, RecordStore, ScoreError, Scorer,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct CountingStore {
    inner: RecordStore,
    calls: Arc<AtomicUsize>,
}

impl RecordLookup for CountingStore {
    fn find(&self, customer_id: &str) -> Vec<&CustomerRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(customer_id)
    }
}

struct FailingScorer;

impl Scorer for FailingScorer {
    fn predict(&self, _features: &FeatureFrame) -> Result<Vec<String>, ScoringError> {
        Err(ScoringError::Backend("boom".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct CountingScorer(AtomicUsize);

impl Scorer for CountingScorer {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<String>, ScoringError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["Standard".to_string(); features.n_rows()])
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn fixture_service() -> CreditService {
    CreditService::from_config(&fixture_config()).unwrap()
}

fn counting_service() -> (CreditService, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: load_store(),
        calls: calls.clone(),
    };
    let service = CreditService::new(
        store,
        Preprocessor::batch(FeatureSchema::default()),
        Arc::new(CountingScorer(AtomicUsize::new(0))),
    );
    (service, calls)
}

async fn get_json(uri: &str) -> serde_json::Value {
    let app = router(Arc::new(fixture_service()));
    let request = axum::http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

// --- config ---

#[test]
fn config_load_default() {
    let c = ServiceConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.features.selected_columns.len(), 10);
    assert_eq!(c.features.numeric_columns.len(), 23);
    assert_eq!(c.server.port, 8000);
    assert_eq!(c.generator.seed, 42);
}

#[test]
fn config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"server": {"port": 9100}, "log": {"json": false}}"#).unwrap();
    let c = ServiceConfig::load(&path);
    assert_eq!(c.server.port, 9100);
    assert_eq!(c.server.host, "127.0.0.1");
    assert!(!c.log.json);
    assert_eq!(c.log.level, "info");
}

// --- record store ---

#[test]
fn store_finds_rows_in_snapshot_order() {
    let store = load_store();
    assert_eq!(store.len(), 7);
    assert_eq!(store.customer_count(), 4);

    let rows = store.find("ID_5");
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.customer_id() == "ID_5"));
    assert_eq!(
        rows[0].get("Credit_Mix"),
        Some(&FieldValue::Category(Some("Good".into())))
    );
    assert!(store.find("ID_404").is_empty());
    assert!(!store.contains("ID_404"));
}

#[test]
fn store_keeps_raw_missing_and_infinite_values() {
    let store = load_store();
    let rows = store.find("ID_5");
    match rows[1].get("debt_to_income_ratio") {
        Some(FieldValue::Number(v)) => assert!(v.is_infinite()),
        other => panic!("unexpected {other:?}"),
    }
    match rows[2].get("Outstanding_Debt") {
        Some(FieldValue::Number(v)) => assert!(v.is_nan()),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        rows[2].get("Payment_Behaviour"),
        Some(&FieldValue::Category(None))
    );
    assert!(rows[0].get("Name").is_none());
}

#[test]
fn store_missing_file_fails() {
    let err = RecordStore::load(&fixture("nope.csv"), &FeatureSchema::default()).unwrap_err();
    assert!(matches!(err, StoreError::Csv(_)));
}

#[test]
fn store_missing_declared_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.csv");
    std::fs::write(&path, "Customer_ID,age_group\nID_1,gt50\n").unwrap();
    let err = RecordStore::load(&path, &FeatureSchema::default()).unwrap_err();
    assert!(matches!(err, StoreError::MissingColumn(ref c) if c == "Payment_Behaviour"));
}

#[test]
fn store_rejects_non_numeric_cells() {
    let schema = FeatureSchema {
        id_column: "id".into(),
        categorical: vec!["grade".into()],
        numeric: vec!["rate".into()],
        selected: vec!["rate".into()],
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "id,grade,rate\nA,x,1.5\nB,y,lots\n").unwrap();
    let err = RecordStore::load(&path, &schema).unwrap_err();
    assert!(matches!(err, StoreError::InvalidNumber { line: 3, .. }));
}

// --- service ---

#[test]
fn empty_id_never_touches_the_store() {
    let (service, calls) = counting_service();
    assert!(matches!(
        service.score_customer(""),
        Err(ScoreError::EmptyCustomerId)
    ));
    assert!(matches!(
        service.score_customer("   "),
        Err(ScoreError::EmptyCustomerId)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_id_is_not_found() {
    let (service, calls) = counting_service();
    let err = service.score_customer("ID_404").unwrap_err();
    assert!(matches!(err, ScoreError::NotFound));
    assert_eq!(err.to_string(), "No DB entry found");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn known_id_scores_every_row_twice() {
    let scorer = Arc::new(CountingScorer(AtomicUsize::new(0)));
    let service = CreditService::new(
        load_store(),
        Preprocessor::batch(FeatureSchema::default()),
        scorer.clone(),
    );
    let p = service.score_customer("ID_5").unwrap();
    assert_eq!(p.customer_id, "ID_5");
    assert_eq!(p.prediction.len(), 3);
    assert_eq!(p.prediction, p.proba);
    assert_eq!(scorer.0.load(Ordering::SeqCst), 2);
}

#[test]
fn preprocessing_failure_is_reported_generically() {
    let service = fixture_service();
    let err = service.score_customer("ID_7").unwrap_err();
    assert!(matches!(err, ScoreError::Preprocess(_)));
    assert_eq!(err.kind(), "empty_features");
    assert_eq!(err.to_string(), "Cannot get prediction");
}

#[test]
fn scoring_failure_is_reported_generically() {
    let service = CreditService::new(
        load_store(),
        Preprocessor::batch(FeatureSchema::default()),
        Arc::new(FailingScorer),
    );
    let err = service.score_customer("ID_5").unwrap_err();
    assert!(matches!(err, ScoreError::Scoring(_)));
    assert_eq!(err.to_string(), "Cannot get prediction");
}

#[test]
fn golden_id_5_prediction() {
    let service = fixture_service();
    let p = service.score_customer("ID_5").unwrap();
    assert_eq!(p.prediction, ["Good", "Standard", "Poor"]);
    assert_eq!(p.proba, ["Good", "Standard", "Poor"]);
}

#[test]
fn startup_fails_without_model() {
    let mut config = fixture_config();
    config.model.path = fixture("missing-model.json");
    assert!(CreditService::from_config(&config).is_err());
}

// --- HTTP ---

#[tokio::test]
async fn root_greets() {
    let json = get_json("/").await;
    assert_eq!(json, serde_json::json!({ "Hello": "World" }));
}

#[tokio::test]
async fn credit_score_success_payload() {
    let json = get_json("/credit-score?customer_id=ID_5").await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["customer_id"], "ID_5");
    assert_eq!(json["prediction"], serde_json::json!(["Good", "Standard", "Poor"]));
    assert_eq!(json["proba"], json["prediction"]);
}

#[tokio::test]
async fn credit_score_empty_id() {
    for uri in ["/credit-score?customer_id=", "/credit-score"] {
        let json = get_json(uri).await;
        assert_eq!(
            json,
            serde_json::json!({ "status": "error", "message": "No institution passed" })
        );
    }
}

#[tokio::test]
async fn credit_score_unknown_id() {
    let json = get_json("/credit-score?customer_id=ID_404").await;
    assert_eq!(
        json,
        serde_json::json!({ "status": "error", "message": "No DB entry found" })
    );
}

#[tokio::test]
async fn credit_score_unencodable_batch() {
    let json = get_json("/credit-score?customer_id=ID_9").await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Cannot get prediction");
}

#[tokio::test]
async fn credit_score_malformed_query_is_json_error() {
    let json = get_json("/credit-score?customer_id=ID_5&customer_id=ID_7").await;
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("duplicate field"));
    assert!(json.get("prediction").is_none());
}
