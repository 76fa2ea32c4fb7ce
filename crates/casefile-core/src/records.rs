use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{
    Direction, IncidentLocation, IncidentType, Involvement, Squad, StaffRole, TheaterArea,
};

/// Row of `police_records.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub case_id: String,
    pub squad: Squad,
    pub date: NaiveDate,
    pub location: IncidentLocation,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
}

/// Row of `witness_reports.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimony {
    pub case_id: String,
    pub witness_name: String,
    pub testimony: String,
}

/// Row of `stage_access.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub timestamp: NaiveDateTime,
    pub location: TheaterArea,
    pub member_id: String,
    pub direction: Direction,
}

/// Row of `staff_database.csv`.
///
/// `involvement` travels with the record in memory but is never written out;
/// the CSV consumer has to deduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_role: StaffRole,
    #[serde(skip, default = "bystander")]
    pub involvement: Involvement,
}

fn bystander() -> Involvement {
    Involvement::Bystander
}

/// Badge id handed to a member of staff, tagged with their part in the case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub involvement: Involvement,
}

/// Every badge id that can show up in the access log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffPool {
    pub members: Vec<StaffMember>,
}

impl StaffPool {
    /// Build a pool, checking ids are unique and the case principals appear once.
    pub fn new(members: Vec<StaffMember>) -> Result<Self> {
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.id.as_str()) {
                return Err(Error::InvariantViolation(format!(
                    "duplicate staff id '{}'",
                    member.id
                )));
            }
        }

        let pool = Self { members };
        for involvement in [Involvement::Murderer, Involvement::Victim] {
            let count = pool
                .members
                .iter()
                .filter(|member| member.involvement == involvement)
                .count();
            if count != 1 {
                return Err(Error::InvariantViolation(format!(
                    "staff pool needs exactly one {involvement}, found {count}"
                )));
            }
        }
        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StaffMember> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Id of the single member with the given involvement.
    pub fn principal(&self, involvement: Involvement) -> Result<&str> {
        self.members
            .iter()
            .find(|member| member.involvement == involvement)
            .map(|member| member.id.as_str())
            .ok_or_else(|| {
                Error::InvariantViolation(format!("staff pool has no {involvement}"))
            })
    }
}

/// All four tables of one generated case file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub incidents: Vec<Incident>,
    pub testimonies: Vec<Testimony>,
    pub access_events: Vec<AccessEvent>,
    pub staff: Vec<StaffRecord>,
}

impl Dataset {
    /// Resolve the planted answer from the staff table.
    pub fn solution(&self) -> Result<Solution> {
        Ok(Solution {
            case_id: crate::scenario::CASE_ID.to_string(),
            case_date: crate::scenario::canonical_date(),
            murderer: self.principal(Involvement::Murderer)?,
            victim: self.principal(Involvement::Victim)?,
        })
    }

    fn principal(&self, involvement: Involvement) -> Result<Principal> {
        let mut matches = self
            .staff
            .iter()
            .filter(|record| record.involvement == involvement);
        let record = matches.next().ok_or_else(|| {
            Error::InvalidDataset(format!("staff table has no {involvement}"))
        })?;
        if matches.next().is_some() {
            return Err(Error::InvalidDataset(format!(
                "staff table has more than one {involvement}"
            )));
        }
        Ok(Principal::from(record))
    }
}

/// Distinct member ids of an access log, in order of first appearance.
pub fn distinct_member_ids(events: &[AccessEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter(|event| seen.insert(event.member_id.as_str()))
        .map(|event| event.member_id.clone())
        .collect()
}

/// One side of the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_role: StaffRole,
}

impl From<&StaffRecord> for Principal {
    fn from(record: &StaffRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            employee_role: record.employee_role,
        }
    }
}

/// The planted answer of the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub case_id: String,
    pub case_date: NaiveDate,
    pub murderer: Principal,
    pub victim: Principal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, involvement: Involvement) -> StaffMember {
        StaffMember {
            id: id.to_string(),
            involvement,
        }
    }

    fn event(member_id: &str) -> AccessEvent {
        AccessEvent {
            timestamp: NaiveDateTime::default(),
            location: TheaterArea::Backstage,
            member_id: member_id.to_string(),
            direction: Direction::Entering,
        }
    }

    #[test]
    fn distinct_ids_keep_first_appearance_order() {
        let events = vec![event("B"), event("A"), event("B"), event("C"), event("A")];
        assert_eq!(distinct_member_ids(&events), vec!["B", "A", "C"]);
    }

    #[test]
    fn pool_rejects_duplicate_ids() {
        let err = StaffPool::new(vec![
            member("X1", Involvement::Murderer),
            member("X1", Involvement::Victim),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn pool_requires_both_principals() {
        let err = StaffPool::new(vec![
            member("X1", Involvement::Murderer),
            member("X2", Involvement::Bystander),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::InvariantViolation("staff pool needs exactly one victim, found 0".to_string())
        );
    }

    #[test]
    fn pool_resolves_principals_by_tag() {
        let pool = StaffPool::new(vec![
            member("B1", Involvement::Bystander),
            member("V1", Involvement::Victim),
            member("M1", Involvement::Murderer),
        ])
        .expect("valid pool");
        assert_eq!(pool.principal(Involvement::Murderer), Ok("M1"));
        assert_eq!(pool.principal(Involvement::Victim), Ok("V1"));
    }
}
