use rand::Rng;

use casefile_core::{CASE_ID, Error, SCRIPTED_TESTIMONIES, Testimony};

use super::{Generated, pick};
use crate::faker::person_name;

pub const TABLE: &str = "witness_reports";

const OBSERVATIONS: [&str; 6] = [
    "I saw a suspicious person near the stage.",
    "There was a loud noise before people started running.",
    "Someone was arguing loudly moments before it happened.",
    "I noticed someone rushing backstage right after the performance.",
    "I noticed broken glass and heard shouting.",
    "There was a strange person watching the actors all evening.",
];

const ACTIONS: [&str; 6] = [
    "They looked nervous and kept checking over their shoulder.",
    "They dropped something and quickly picked it up.",
    "They ran off when the commotion started.",
    "They were wearing dark clothes and avoided eye contact.",
    "They seemed to be waiting for someone.",
    "They spoke briefly with another person and left.",
];

/// The scripted statements filed against the canonical case.
pub fn fixtures<R: Rng>(rng: &mut R) -> Vec<Testimony> {
    SCRIPTED_TESTIMONIES
        .iter()
        .map(|text| Testimony {
            case_id: CASE_ID.to_string(),
            witness_name: person_name(rng),
            testimony: text.to_string(),
        })
        .collect()
}

/// `count` statements about random cases, one observation plus one action each.
pub fn filler<R: Rng>(
    rng: &mut R,
    case_ids: &[String],
    count: usize,
) -> Result<Vec<Testimony>, Error> {
    if count > 0 && case_ids.is_empty() {
        return Err(Error::InvariantViolation(
            "witness reports need at least one case id".to_string(),
        ));
    }

    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let case_id = case_ids[rng.random_range(0..case_ids.len())].clone();
        let witness_name = person_name(rng);
        let observation = pick(rng, &OBSERVATIONS);
        let action = pick(rng, &ACTIONS);
        rows.push(Testimony {
            case_id,
            witness_name,
            testimony: format!("{observation} {action}"),
        });
    }
    Ok(rows)
}

/// Witness reports: the five scripted statements then `rows - 5` random ones.
pub fn generate<R: Rng>(
    rng: &mut R,
    case_ids: &[String],
    rows: usize,
) -> Result<Generated<Testimony>, Error> {
    if rows < SCRIPTED_TESTIMONIES.len() {
        return Err(Error::InsufficientRows {
            table: TABLE,
            requested: rows,
            minimum: SCRIPTED_TESTIMONIES.len(),
        });
    }
    let fixtures = fixtures(rng);
    let filler = filler(rng, case_ids, rows - fixtures.len())?;
    Ok(Generated::merge(fixtures, filler))
}
