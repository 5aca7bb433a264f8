//! Customer profiles with age-dependent profession, rurality/profession-dependent credit
//! score and profession/age-dependent activity.

use super::{pick, pick_weighted, py_bool};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Profession {
    Trader,
    Teacher,
    Engineer,
    Farmer,
    #[serde(rename = "Healthcare Worker")]
    HealthcareWorker,
}

pub const MIN_CREDIT_SCORE: i32 = 300;
pub const MAX_CREDIT_SCORE: i32 = 850;

const STATES: [&str; 50] = [
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah",
    "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

/// One demographics row. `age` and `profession` are optional so missing-value injection can
/// clear them after event sampling has used the full profile.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub age: Option<u32>,
    pub gender: Gender,
    pub location: &'static str,
    pub profession: Option<Profession>,
    #[serde(serialize_with = "py_bool")]
    pub is_rural: bool,
    pub credit_score: i32,
    #[serde(serialize_with = "py_bool")]
    pub high_activity: bool,
}

pub fn customer_id(i: usize) -> String {
    format!("ID_{i}")
}

fn profession_for_age<R: Rng>(age: u32, rng: &mut R) -> Profession {
    use Profession::*;
    if age < 25 {
        pick_weighted(rng, &[(Trader, 0.5), (Teacher, 0.3), (Engineer, 0.2)])
    } else if age < 40 {
        pick_weighted(
            rng,
            &[(Farmer, 0.2), (Trader, 0.4), (Engineer, 0.3), (HealthcareWorker, 0.1)],
        )
    } else {
        pick_weighted(rng, &[(Farmer, 0.5), (Teacher, 0.3), (Trader, 0.2)])
    }
}

fn credit_score<R: Rng>(is_rural: bool, profession: Profession, rng: &mut R) -> i32 {
    let base = if is_rural {
        rng.gen_range(300..=700)
    } else {
        rng.gen_range(400..=850)
    };
    let adjust = match profession {
        Profession::Engineer | Profession::Trader => rng.gen_range(-20..=50),
        Profession::Farmer => rng.gen_range(-50..=20),
        _ => 0,
    };
    (base + adjust).clamp(MIN_CREDIT_SCORE, MAX_CREDIT_SCORE)
}

fn high_activity<R: Rng>(profession: Profession, age: u32, rng: &mut R) -> bool {
    match profession {
        Profession::Trader | Profession::Engineer => age < 40 && rng.gen_bool(0.7),
        Profession::Farmer => rng.gen_bool(0.3),
        _ => rng.gen_bool(0.5),
    }
}

pub fn sample_profile<R: Rng>(i: usize, rng: &mut R) -> CustomerProfile {
    let is_rural = rng.gen_bool(0.5);
    let age = rng.gen_range(18..=60);
    let gender = pick(rng, &[Gender::Male, Gender::Female]);
    let location = pick(rng, &STATES);
    let profession = profession_for_age(age, rng);
    let credit_score = credit_score(is_rural, profession, rng);
    let high_activity = high_activity(profession, age, rng);

    CustomerProfile {
        customer_id: customer_id(i),
        age: Some(age),
        gender,
        location,
        profession: Some(profession),
        is_rural,
        credit_score,
        high_activity,
    }
}

pub fn sample_profiles<R: Rng>(n: usize, rng: &mut R) -> Vec<CustomerProfile> {
    (0..n).map(|i| sample_profile(i, rng)).collect()
}
