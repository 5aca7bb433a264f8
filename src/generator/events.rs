//! Event samplers. Every event draws its customer uniformly, with replacement, so a
//! customer may appear many times or not at all.

use super::profile::CustomerProfile;
use super::{pick, pick_weighted, GeneratorError};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize, Serializer};

/// 2023-01-01T00:00:00Z
const WINDOW_START: i64 = 1_672_531_200;
/// 2024-01-01T00:00:00Z
const WINDOW_END: i64 = 1_704_067_200;

fn timestamp<R: Rng>(rng: &mut R) -> DateTime<Utc> {
    DateTime::from_timestamp(rng.gen_range(WINDOW_START..=WINDOW_END), 0).unwrap_or_default()
}

fn serialize_ts<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format("%Y-%m-%d %H:%M:%S"))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, GeneratorError> {
    Normal::new(mean, std_dev).map_err(|e| GeneratorError::Distribution(e.to_string()))
}

/// Redraw until non-negative.
fn non_negative<R: Rng>(dist: &Normal<f64>, rng: &mut R) -> f64 {
    loop {
        let v = dist.sample(rng);
        if v >= 0.0 {
            return v;
        }
    }
}

fn draw_customer<'a, R: Rng>(
    profiles: &'a [CustomerProfile],
    rng: &mut R,
) -> Result<&'a CustomerProfile, GeneratorError> {
    if profiles.is_empty() {
        return Err(GeneratorError::NoProfiles);
    }
    Ok(&profiles[rng.gen_range(0..profiles.len())])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Purchase,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub customer_id: String,
    #[serde(serialize_with = "serialize_ts")]
    pub timestamp: DateTime<Utc>,
    pub amount: Option<f64>,
    pub transaction_type: TransactionType,
}

pub fn transactions<R: Rng>(
    profiles: &[CustomerProfile],
    n: usize,
    rng: &mut R,
) -> Result<Vec<Transaction>, GeneratorError> {
    let active = normal(240_000.0, 47_900.0)?;
    let quiet = normal(106_000.0, 47_900.0)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let customer = draw_customer(profiles, rng)?;
        let dist = if customer.high_activity { &active } else { &quiet };
        let amount = non_negative(dist, rng);
        out.push(Transaction {
            transaction_id: format!("TX_{i}"),
            customer_id: customer.customer_id.clone(),
            timestamp: timestamp(rng),
            amount: Some(round2(amount)),
            transaction_type: pick(
                rng,
                &[
                    TransactionType::Deposit,
                    TransactionType::Withdrawal,
                    TransactionType::Purchase,
                ],
            ),
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TelcoEventType {
    #[serde(rename = "Airtime Purchase")]
    AirtimePurchase,
    #[serde(rename = "Data Usage")]
    DataUsage,
    Call,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelcoEvent {
    pub event_id: String,
    pub customer_id: String,
    #[serde(serialize_with = "serialize_ts")]
    pub timestamp: DateTime<Utc>,
    pub event_type: TelcoEventType,
    pub value: Option<f64>,
}

pub fn telco_events<R: Rng>(
    profiles: &[CustomerProfile],
    n: usize,
    rng: &mut R,
) -> Result<Vec<TelcoEvent>, GeneratorError> {
    let active = normal(700.0, 100.0)?;
    let quiet = normal(300.0, 100.0)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let customer = draw_customer(profiles, rng)?;
        let dist = if customer.high_activity { &active } else { &quiet };
        let value = non_negative(dist, rng);
        out.push(TelcoEvent {
            event_id: format!("TELCO_{i}"),
            customer_id: customer.customer_id.clone(),
            timestamp: timestamp(rng),
            event_type: pick(
                rng,
                &[
                    TelcoEventType::AirtimePurchase,
                    TelcoEventType::DataUsage,
                    TelcoEventType::Call,
                ],
            ),
            value: Some(round2(value)),
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Whatsapp,
    Facebook,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SocialEventType {
    #[serde(rename = "Message Sent")]
    MessageSent,
    #[serde(rename = "Post Created")]
    PostCreated,
    Comment,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialEvent {
    pub event_id: String,
    pub customer_id: String,
    #[serde(serialize_with = "serialize_ts")]
    pub timestamp: DateTime<Utc>,
    pub platform: Platform,
    pub event_type: SocialEventType,
    pub sentiment_score: Option<f64>,
}

pub fn social_events<R: Rng>(
    profiles: &[CustomerProfile],
    n: usize,
    rng: &mut R,
) -> Result<Vec<SocialEvent>, GeneratorError> {
    let active = normal(0.7, 0.5)?;
    let quiet = normal(-0.2, 0.5)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let customer = draw_customer(profiles, rng)?;
        let dist = if customer.high_activity { &active } else { &quiet };
        let sentiment = dist.sample(rng);
        out.push(SocialEvent {
            event_id: format!("SOCIAL_{i}"),
            customer_id: customer.customer_id.clone(),
            timestamp: timestamp(rng),
            platform: pick(rng, &[Platform::Whatsapp, Platform::Facebook, Platform::Twitter]),
            event_type: pick(
                rng,
                &[
                    SocialEventType::MessageSent,
                    SocialEventType::PostCreated,
                    SocialEventType::Comment,
                ],
            ),
            sentiment_score: Some(round2(sentiment)),
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepaymentStatus {
    #[serde(rename = "On Time")]
    OnTime,
    Late,
    Missed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Repayment {
    pub repayment_id: String,
    pub customer_id: String,
    pub loan_id: String,
    #[serde(serialize_with = "serialize_ts")]
    pub timestamp: DateTime<Utc>,
    pub repayment_amount: Option<f64>,
    pub status: RepaymentStatus,
}

/// Credit scores above this draw from the high repayment distribution.
pub const GOOD_CREDIT_THRESHOLD: i32 = 600;

pub fn repayments<R: Rng>(
    profiles: &[CustomerProfile],
    n: usize,
    rng: &mut R,
) -> Result<Vec<Repayment>, GeneratorError> {
    let good = normal(500_000.0, 10_000.0)?;
    let poor = normal(50_000.0, 10_000.0)?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let customer = draw_customer(profiles, rng)?;
        let dist = if customer.credit_score > GOOD_CREDIT_THRESHOLD {
            &good
        } else {
            &poor
        };
        let amount = dist.sample(rng).max(0.0);
        out.push(Repayment {
            repayment_id: format!("REPAY_{i}"),
            customer_id: customer.customer_id.clone(),
            loan_id: format!("LOAN_{}", rng.gen_range(1..=n + 1000)),
            timestamp: timestamp(rng),
            repayment_amount: Some(round2(amount)),
            status: pick_weighted(
                rng,
                &[
                    (RepaymentStatus::OnTime, 0.7),
                    (RepaymentStatus::Late, 0.2),
                    (RepaymentStatus::Missed, 0.1),
                ],
            ),
        });
    }
    Ok(out)
}
