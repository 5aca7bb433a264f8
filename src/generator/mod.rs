//! Synthetic customer datasets: demographics plus four event tables, each with a fixed
//! fraction of one column nulled to simulate missing data.

mod events;
mod profile;

pub use events::{
    repayments, social_events, telco_events, transactions, Platform, Repayment,
    RepaymentStatus, SocialEvent, SocialEventType, TelcoEvent, TelcoEventType, Transaction,
    TransactionType, GOOD_CREDIT_THRESHOLD,
};
pub use profile::{
    customer_id, sample_profile, sample_profiles, CustomerProfile, Gender, Profession,
    MAX_CREDIT_SCORE, MIN_CREDIT_SCORE,
};

use crate::config::{GeneratorConfig, MissingFractions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEMOGRAPHICS_FILE: &str = "demographics.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const TELCO_FILE: &str = "telco.csv";
pub const SOCIAL_FILE: &str = "social_media.csv";
pub const REPAYMENTS_FILE: &str = "repayment_history.csv";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("distribution: {0}")]
    Distribution(String),
    #[error("events requested but no customer profiles generated")]
    NoProfiles,
    #[error("missing fraction for `{column}` must be within [0, 1], got {value}")]
    InvalidFraction { column: &'static str, value: f64 },
}

fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Weights need not sum to one; the last item absorbs rounding slack.
fn pick_weighted<T: Copy, R: Rng>(rng: &mut R, items: &[(T, f64)]) -> T {
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    let mut u = rng.gen::<f64>() * total;
    for (item, w) in items {
        if u < *w {
            return *item;
        }
        u -= w;
    }
    items[items.len() - 1].0
}

/// pandas writes booleans as `True` / `False`.
fn py_bool<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *v { "True" } else { "False" })
}

/// Null one column in exactly `round(fraction * rows)` distinct rows chosen uniformly.
/// Returns how many rows were cleared.
pub fn inject_missing<T, R: Rng>(
    rows: &mut [T],
    fraction: f64,
    rng: &mut R,
    mut clear: impl FnMut(&mut T),
) -> usize {
    let amount = ((fraction.clamp(0.0, 1.0) * rows.len() as f64).round() as usize).min(rows.len());
    let picked = rand::seq::index::sample(rng, rows.len(), amount);
    for i in picked.iter() {
        clear(&mut rows[i]);
    }
    amount
}

fn check_fractions(m: &MissingFractions) -> Result<(), GeneratorError> {
    let all = [
        ("profession", m.profession),
        ("age", m.age),
        ("amount", m.transaction_amount),
        ("value", m.telco_value),
        ("sentiment_score", m.sentiment_score),
        ("repayment_amount", m.repayment_amount),
    ];
    for (column, value) in all {
        if !(0.0..=1.0).contains(&value) {
            return Err(GeneratorError::InvalidFraction { column, value });
        }
    }
    Ok(())
}

/// All five tables, missing values already injected.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub demographics: Vec<CustomerProfile>,
    pub transactions: Vec<Transaction>,
    pub telco: Vec<TelcoEvent>,
    pub social: Vec<SocialEvent>,
    pub repayments: Vec<Repayment>,
    /// `<file>.<column>` → rows nulled
    pub nulled: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub out_dir: PathBuf,
    pub seed: u64,
    /// file name → rows written
    pub files: BTreeMap<String, usize>,
    pub nulled: BTreeMap<String, usize>,
}

/// Sample every table from `config.seed`. Events are drawn from the complete profiles;
/// demographics nulling happens afterwards.
pub fn generate(config: &GeneratorConfig) -> Result<Datasets, GeneratorError> {
    check_fractions(&config.missing)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let m = &config.missing;
    let mut nulled = BTreeMap::new();

    let profiles = sample_profiles(config.n_customers, &mut rng);
    let mut transactions = transactions(&profiles, config.n_transactions, &mut rng)?;
    let mut telco = telco_events(&profiles, config.n_telco_events, &mut rng)?;
    let mut social = social_events(&profiles, config.n_social_events, &mut rng)?;
    let mut repayments = repayments(&profiles, config.n_repayments, &mut rng)?;

    let mut demographics = profiles;
    let n = inject_missing(&mut demographics, m.profession, &mut rng, |p| p.profession = None);
    nulled.insert(format!("{DEMOGRAPHICS_FILE}.profession"), n);
    let n = inject_missing(&mut demographics, m.age, &mut rng, |p| p.age = None);
    nulled.insert(format!("{DEMOGRAPHICS_FILE}.age"), n);
    let n = inject_missing(&mut transactions, m.transaction_amount, &mut rng, |t| {
        t.amount = None
    });
    nulled.insert(format!("{TRANSACTIONS_FILE}.amount"), n);
    let n = inject_missing(&mut telco, m.telco_value, &mut rng, |t| t.value = None);
    nulled.insert(format!("{TELCO_FILE}.value"), n);
    let n = inject_missing(&mut social, m.sentiment_score, &mut rng, |s| {
        s.sentiment_score = None
    });
    nulled.insert(format!("{SOCIAL_FILE}.sentiment_score"), n);
    let n = inject_missing(&mut repayments, m.repayment_amount, &mut rng, |r| {
        r.repayment_amount = None
    });
    nulled.insert(format!("{REPAYMENTS_FILE}.repayment_amount"), n);

    Ok(Datasets {
        demographics,
        transactions,
        telco,
        social,
        repayments,
        nulled,
    })
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize, GeneratorError> {
    let mut w = csv::Writer::from_path(path)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(rows.len())
}

impl Datasets {
    /// Write the five CSV files under `out_dir`, creating it if needed.
    pub fn write_all(&self, out_dir: &Path) -> Result<BTreeMap<String, usize>, GeneratorError> {
        std::fs::create_dir_all(out_dir)?;
        let mut files = BTreeMap::new();
        let mut put = |name: &str, rows: usize| {
            info!(file = name, rows, "dataset written");
            files.insert(name.to_string(), rows);
        };
        put(
            DEMOGRAPHICS_FILE,
            write_csv(&out_dir.join(DEMOGRAPHICS_FILE), &self.demographics)?,
        );
        put(
            TRANSACTIONS_FILE,
            write_csv(&out_dir.join(TRANSACTIONS_FILE), &self.transactions)?,
        );
        put(TELCO_FILE, write_csv(&out_dir.join(TELCO_FILE), &self.telco)?);
        put(SOCIAL_FILE, write_csv(&out_dir.join(SOCIAL_FILE), &self.social)?);
        put(
            REPAYMENTS_FILE,
            write_csv(&out_dir.join(REPAYMENTS_FILE), &self.repayments)?,
        );
        Ok(files)
    }
}

/// Generate and write every dataset to `config.out_dir`.
pub fn run(config: &GeneratorConfig) -> Result<GenerationSummary, GeneratorError> {
    let datasets = generate(config)?;
    let files = datasets.write_all(&config.out_dir)?;
    Ok(GenerationSummary {
        out_dir: config.out_dir.clone(),
        seed: config.seed,
        files,
        nulled: datasets.nulled,
    })
}
