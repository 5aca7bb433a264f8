//! Preprocessing: imputation, reference-category encoding, batch vs fitted scaling, projection.

mod common;

use common::{assert_close, load_store, rows};
use credit_scoring::features::{
    FittedTransform, MinMaxScaler, PreprocessError, Preprocessor, Scaling,
};
use credit_scoring::{CustomerRecord, FeatureSchema};
use ndarray::array;

fn column(frame: &credit_scoring::FeatureFrame, name: &str) -> Vec<f64> {
    frame.column(name).unwrap().to_vec()
}

#[test]
fn batch_transform_produces_selected_columns_in_order() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    let frame = pre.transform(&rows(&store, &["ID_5"])).unwrap();

    assert_eq!(frame.n_rows(), 3);
    assert_eq!(frame.columns(), FeatureSchema::default().selected.as_slice());
}

#[test]
fn batch_transform_scales_each_column_to_unit_range() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    let frame = pre.transform(&rows(&store, &["ID_5"])).unwrap();

    assert_eq!(column(&frame, "Interest_Rate"), vec![0.0, 0.5, 1.0]);
    assert_eq!(column(&frame, "Delay_from_due_date"), vec![0.0, 0.5, 1.0]);
    assert_eq!(column(&frame, "total_financial_obligations"), vec![0.0, 1.0, 0.5]);
    assert_eq!(column(&frame, "interest_bank_accounts_interaction"), vec![0.0, 0.5, 1.0]);
    assert_eq!(column(&frame, "age_group_gt50"), vec![0.0, 1.0, 1.0]);
    assert_eq!(column(&frame, "Credit_Mix_Good"), vec![1.0, 0.0, 0.0]);
    assert_eq!(column(&frame, "Credit_Mix_Standard"), vec![0.0, 1.0, 0.0]);
}

#[test]
fn infinities_and_missing_numbers_become_zero_before_scaling() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    let frame = pre.transform(&rows(&store, &["ID_5"])).unwrap();

    // debt_to_income_ratio: [0.4, inf -> 0, 0.8]
    let dti = column(&frame, "debt_to_income_ratio");
    assert_close(dti[0], 0.5);
    assert_close(dti[1], 0.0);
    assert_close(dti[2], 1.0);

    // Outstanding_Debt: [800, 1800, empty -> 0]
    let debt = column(&frame, "Outstanding_Debt");
    assert_close(debt[0], 800.0 / 1800.0);
    assert_close(debt[1], 1.0);
    assert_close(debt[2], 0.0);
}

#[test]
fn same_batch_twice_gives_identical_output() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    let batch = rows(&store, &["ID_5"]);
    assert_eq!(pre.transform(&batch).unwrap(), pre.transform(&batch).unwrap());
}

#[test]
fn batch_scaling_depends_on_co_present_rows() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());

    let alone = pre.transform(&rows(&store, &["ID_5"])).unwrap();
    let with_other = pre.transform(&rows(&store, &["ID_5", "ID_12"])).unwrap();

    // Second ID_5 row, Interest_Rate 15: range [5, 25] alone, [5, 45] with ID_12 present.
    assert_close(alone.row(1)[0], 0.5);
    assert_close(with_other.row(1)[0], 0.25);
    assert_ne!(alone.row(1), with_other.row(1));
}

#[test]
fn one_hot_drops_exactly_one_level_per_column() {
    let store = load_store();
    let schema = FeatureSchema::default();
    let fitted = FittedTransform::fit(&rows(&store, &["ID_5"]), &schema).unwrap();

    // age_group 2 levels, Payment_Behaviour 3 (incl. filled "0"), Month 3, Credit_Mix 3, Occupation 1
    assert_eq!(fitted.columns.len(), schema.numeric.len() + 1 + 2 + 2 + 2);
    let has = |c: &str| fitted.columns.iter().any(|x| x == c);
    assert!(has("age_group_gt50"));
    assert!(!has("age_group_31-50"));
    assert!(!has("Payment_Behaviour_0"));
    assert!(has("Payment_Behaviour_High_spent_Large_value_payments"));
    assert!(has("Payment_Behaviour_Low_spent_Small_value_payments"));
    assert!(!has("Credit_Mix_Bad"));
    assert!(!has("Occupation_Engineer"));
    assert_eq!(&fitted.columns[..schema.numeric.len()], schema.numeric.as_slice());
}

#[test]
fn single_row_batch_is_missing_indicator_columns() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    let err = pre.transform(&rows(&store, &["ID_7"])).unwrap_err();
    assert!(matches!(err, PreprocessError::MissingColumn(ref c) if c == "age_group_gt50"));
}

#[test]
fn absent_category_level_fails_projection() {
    let store = load_store();
    let pre = Preprocessor::batch(FeatureSchema::default());
    // ID_9 has Credit_Mix Good/Standard only, so Good is the dropped reference level.
    let err = pre.transform(&rows(&store, &["ID_9"])).unwrap_err();
    assert!(matches!(err, PreprocessError::MissingColumn(ref c) if c == "Credit_Mix_Good"));
}

#[test]
fn empty_input_short_circuits() {
    let pre = Preprocessor::batch(FeatureSchema::default());
    let frame = pre.transform(&[]).unwrap();
    assert!(frame.is_empty());
    assert_eq!(frame.n_cols(), 10);
}

#[test]
fn missing_declared_field_is_reported() {
    let pre = Preprocessor::batch(FeatureSchema::default());
    let record = CustomerRecord::new("ID_1").with_category("age_group", Some("gt50"));
    let err = pre.transform(&[&record]).unwrap_err();
    assert!(matches!(err, PreprocessError::MissingInput(_)));
}

#[test]
fn fitted_mode_is_idempotent_on_a_single_row() {
    let store = load_store();
    let schema = FeatureSchema::default();
    let all: Vec<&CustomerRecord> = store.records().iter().collect();
    let fitted = FittedTransform::fit(&all, &schema).unwrap();
    let pre = Preprocessor::new(schema, Scaling::Fitted(fitted)).unwrap();

    let single = rows(&store, &["ID_7"]);
    let first = pre.transform(&single).unwrap();
    let second = pre.transform(&single).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.n_rows(), 1);
    assert_eq!(first.n_cols(), 10);
    assert!(first.values().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn fitted_mode_ignores_co_present_rows() {
    let store = load_store();
    let schema = FeatureSchema::default();
    let all: Vec<&CustomerRecord> = store.records().iter().collect();
    let fitted = FittedTransform::fit(&all, &schema).unwrap();
    let pre = Preprocessor::new(schema, Scaling::Fitted(fitted)).unwrap();

    let alone = pre.transform(&rows(&store, &["ID_5"])).unwrap();
    let with_other = pre.transform(&rows(&store, &["ID_5", "ID_12"])).unwrap();
    for r in 0..3 {
        assert_eq!(alone.row(r), with_other.row(r));
    }
    // Interest_Rate 15 within fitted range [5, 45]
    assert_close(alone.row(1)[0], 0.25);
}

#[test]
fn fitted_transform_rejects_other_schema() {
    let store = load_store();
    let schema = FeatureSchema::default();
    let all: Vec<&CustomerRecord> = store.records().iter().collect();
    let fitted = FittedTransform::fit(&all, &schema).unwrap();

    let mut other = schema.clone();
    other.numeric.pop();
    let err = Preprocessor::new(other, Scaling::Fitted(fitted)).unwrap_err();
    assert!(matches!(err, PreprocessError::IncompatibleTransform(_)));
}

#[test]
fn fitted_transform_save_and_load() {
    let store = load_store();
    let schema = FeatureSchema::default();
    let all: Vec<&CustomerRecord> = store.records().iter().collect();
    let fitted = FittedTransform::fit(&all, &schema).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transform.json");
    fitted.save(&path).unwrap();
    assert_eq!(FittedTransform::load(&path).unwrap(), fitted);
}

#[test]
fn fit_on_no_rows_is_an_error() {
    let err = FittedTransform::fit(&[], &FeatureSchema::default()).unwrap_err();
    assert!(matches!(err, PreprocessError::EmptyFit));
}

#[test]
fn zero_range_column_scales_to_zero() {
    let mut values = array![[3.0, 1.0], [3.0, 5.0]];
    let scaler = MinMaxScaler::fit(&values);
    scaler.transform(&mut values);
    assert_eq!(values, array![[0.0, 0.0], [0.0, 1.0]]);
}
