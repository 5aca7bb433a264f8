//! Service and generator configuration. Every field has a default, so an absent
//! config file reproduces the stock hold-out snapshot + random-forest setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Customer record snapshot (CSV) loaded once at startup
    pub data_path: PathBuf,
    /// Pre-built scoring artifact
    pub model: ModelConfig,
    /// Column schema and preprocessing recipe
    pub features: FeaturesConfig,
    /// HTTP bind address
    pub server: ServerConfig,
    /// Synthetic dataset generation
    pub generator: GeneratorConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// JSON tree-ensemble export
    Forest,
    /// ONNX classifier, run through ONNX Runtime
    Onnx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub kind: ModelKind,
    /// Label for each class index emitted by index-valued backends (ONNX)
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub id_column: String,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    /// Columns handed to the scorer, in order, after encoding and scaling
    pub selected_columns: Vec<String>,
    pub scaling: ScalingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Refit min-max on each request's rows
    Batch,
    /// Apply a persisted vocabulary + scaler
    Fitted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub mode: ScalingMode,
    /// Required when mode is `fitted`
    pub transform_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub n_customers: usize,
    pub n_transactions: usize,
    pub n_telco_events: usize,
    pub n_social_events: usize,
    pub n_repayments: usize,
    pub missing: MissingFractions,
}

/// Fraction of rows whose designated column is nulled after generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingFractions {
    pub profession: f64,
    pub age: f64,
    pub transaction_amount: f64,
    pub telco_value: f64,
    pub sentiment_score: f64,
    pub repayment_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/credit_hold_out_data.csv"),
            model: ModelConfig::default(),
            features: FeaturesConfig::default(),
            server: ServerConfig::default(),
            generator: GeneratorConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/rf_credit_pipeline.json"),
            kind: ModelKind::Forest,
            classes: strings(&["Good", "Poor", "Standard"]),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            id_column: "Customer_ID".to_string(),
            categorical_columns: strings(&[
                "age_group",
                "Payment_Behaviour",
                "Month",
                "Credit_Mix",
                "Occupation",
            ]),
            numeric_columns: strings(&[
                "Monthly_Inhand_Salary",
                "Num_Bank_Accounts",
                "Num_Credit_Card",
                "Interest_Rate",
                "Delay_from_due_date",
                "Outstanding_Debt",
                "Credit_Utilization_Ratio",
                "imputed_age",
                "imputed_ccl",
                "imputed_monthly_balance",
                "total_emi_per_month_transform",
                "num_loan_transform",
                "debt_to_income_ratio",
                "loan_to_income_ratio",
                "total_financial_obligations",
                "total_credit_utilization",
                "delayed_payment_impact",
                "salary_deviation",
                "banking_to_credit_ratio",
                "annual_savings_estimate",
                "credit_card_limit_utilization",
                "debt_utilization_interaction",
                "interest_bank_accounts_interaction",
            ]),
            selected_columns: strings(&[
                "Interest_Rate",
                "Delay_from_due_date",
                "Outstanding_Debt",
                "debt_to_income_ratio",
                "total_financial_obligations",
                "debt_utilization_interaction",
                "interest_bank_accounts_interaction",
                "age_group_gt50",
                "Credit_Mix_Good",
                "Credit_Mix_Standard",
            ]),
            scaling: ScalingConfig::default(),
        }
    }
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            mode: ScalingMode::Batch,
            transform_path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("data"),
            seed: 42,
            n_customers: 10_000,
            n_transactions: 68_000,
            n_telco_events: 33_000,
            n_social_events: 27_200,
            n_repayments: 18_350,
            missing: MissingFractions::default(),
        }
    }
}

impl Default for MissingFractions {
    fn default() -> Self {
        Self {
            profession: 0.05,
            age: 0.074,
            transaction_amount: 0.0523,
            telco_value: 0.0334,
            sentiment_score: 0.07,
            repayment_amount: 0.1,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ServiceConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<ServiceConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    /// Resolve the config path from `CREDIT_CONFIG_PATH`, falling back to `config.json`.
    pub fn path_from_env() -> PathBuf {
        std::env::var("CREDIT_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }
}
