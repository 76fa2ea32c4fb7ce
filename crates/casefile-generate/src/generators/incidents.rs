use std::collections::HashSet;

use rand::Rng;

use casefile_core::{CASE_ID, Error, Incident, canonical_incident};

use super::{Generated, HistoryWindow, random_code, sample};

pub const TABLE: &str = "police_records";

/// Length of a random case id.
const CASE_ID_LEN: usize = 10;

/// The canonical murder case.
pub fn fixtures() -> Vec<Incident> {
    vec![canonical_incident()]
}

/// `count` random incidents with case ids distinct from each other and from the canonical case.
pub fn filler<R: Rng>(rng: &mut R, count: usize, window: &HistoryWindow) -> Vec<Incident> {
    let mut used: HashSet<String> = HashSet::from([CASE_ID.to_string()]);
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let case_id = loop {
            let candidate = random_code(rng, CASE_ID_LEN);
            if used.insert(candidate.clone()) {
                break candidate;
            }
        };
        rows.push(Incident {
            case_id,
            squad: sample(rng),
            date: window.sample_date(rng),
            location: sample(rng),
            incident_type: sample(rng),
        });
    }
    rows
}

/// Police records: the canonical case followed by `rows - 1` random incidents.
pub fn generate<R: Rng>(
    rng: &mut R,
    rows: usize,
    window: &HistoryWindow,
) -> Result<Generated<Incident>, Error> {
    let fixtures = fixtures();
    if rows < fixtures.len() {
        return Err(Error::InsufficientRows {
            table: TABLE,
            requested: rows,
            minimum: fixtures.len(),
        });
    }
    let filler = filler(rng, rows - fixtures.len(), window);
    Ok(Generated::merge(fixtures, filler))
}
