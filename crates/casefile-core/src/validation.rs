use std::collections::{BTreeSet, HashSet};

use crate::error::{Error, Result};
use crate::records::{Dataset, distinct_member_ids};
use crate::scenario::{
    CASE_ID, SCRIPTED_TESTIMONIES, canonical_incident, timeline_for, timeline_matches,
};
use crate::types::{Direction, Involvement, TheaterArea};

/// Validate a case file, failing on the first broken invariant.
pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    match check_dataset(dataset).into_iter().next() {
        Some(problem) => Err(Error::InvalidDataset(problem)),
        None => Ok(()),
    }
}

/// Collect every broken invariant of a case file.
///
/// This checks:
/// - case ids are unique and the canonical incident appears exactly once
/// - testimonies reference known cases and include the scripted statements
/// - the scripted timeline is present for both principals
/// - the victim never leaves the dressing room after the last entry
/// - the staff table covers exactly the badge ids seen in the access log
/// - the murderer and victim hold their pinned roles
pub fn check_dataset(dataset: &Dataset) -> Vec<String> {
    let mut problems = Vec::new();
    check_incidents(dataset, &mut problems);
    check_testimonies(dataset, &mut problems);
    check_staff(dataset, &mut problems);
    check_timeline(dataset, &mut problems);
    problems
}

fn check_incidents(dataset: &Dataset, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for incident in &dataset.incidents {
        if !seen.insert(incident.case_id.as_str()) {
            problems.push(format!("duplicate case id: {}", incident.case_id));
        }
    }

    let canonical = canonical_incident();
    let matching = dataset
        .incidents
        .iter()
        .filter(|incident| incident.case_id == CASE_ID)
        .collect::<Vec<_>>();
    match matching.as_slice() {
        [] => problems.push(format!("canonical case {CASE_ID} missing from police records")),
        [incident] => {
            if **incident != canonical {
                problems.push(format!(
                    "canonical case {CASE_ID} does not match the scripted incident"
                ));
            }
        }
        _ => {}
    }
}

fn check_testimonies(dataset: &Dataset, problems: &mut Vec<String>) {
    let case_ids: HashSet<&str> = dataset
        .incidents
        .iter()
        .map(|incident| incident.case_id.as_str())
        .collect();

    for (index, testimony) in dataset.testimonies.iter().enumerate() {
        if !case_ids.contains(testimony.case_id.as_str()) {
            problems.push(format!(
                "witness report {} references unknown case {}",
                index + 1,
                testimony.case_id
            ));
        }
    }

    for scripted in SCRIPTED_TESTIMONIES {
        let present = dataset
            .testimonies
            .iter()
            .any(|testimony| testimony.case_id == CASE_ID && testimony.testimony == scripted);
        if !present {
            problems.push(format!("scripted testimony missing: \"{scripted}\""));
        }
    }
}

fn check_staff(dataset: &Dataset, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for record in &dataset.staff {
        if !seen.insert(record.employee_id.as_str()) {
            problems.push(format!("duplicate employee id: {}", record.employee_id));
        }
    }

    let staff_ids: BTreeSet<&str> = seen.into_iter().collect();
    let access_ids = distinct_member_ids(&dataset.access_events);
    let access_ids: BTreeSet<&str> = access_ids.iter().map(String::as_str).collect();
    for missing in access_ids.difference(&staff_ids) {
        problems.push(format!("badge id {missing} has no staff record"));
    }
    for unused in staff_ids.difference(&access_ids) {
        problems.push(format!("employee {unused} never appears in the access log"));
    }

    for involvement in [Involvement::Murderer, Involvement::Victim] {
        let records = dataset
            .staff
            .iter()
            .filter(|record| record.involvement == involvement)
            .collect::<Vec<_>>();
        match records.as_slice() {
            [record] => {
                if Some(record.employee_role) != involvement.pinned_role() {
                    problems.push(format!(
                        "{involvement} {} has role {}",
                        record.employee_id, record.employee_role
                    ));
                }
            }
            _ => problems.push(format!(
                "expected exactly one {involvement} in staff table, found {}",
                records.len()
            )),
        }
    }
}

fn check_timeline(dataset: &Dataset, problems: &mut Vec<String>) {
    for involvement in [Involvement::Murderer, Involvement::Victim] {
        let Some(record) = dataset
            .staff
            .iter()
            .find(|record| record.involvement == involvement)
        else {
            continue;
        };
        if !timeline_matches(&dataset.access_events, &record.employee_id, involvement) {
            problems.push(format!(
                "scripted movements of the {involvement} {} are incomplete",
                record.employee_id
            ));
        }
        if involvement == Involvement::Victim {
            check_victim_stays(dataset, &record.employee_id, problems);
        }
    }
}

fn check_victim_stays(dataset: &Dataset, victim_id: &str, problems: &mut Vec<String>) {
    let Some(last_entry) = timeline_for(Involvement::Victim)
        .filter(|entry| {
            entry.area == TheaterArea::DressingRoom && entry.direction == Direction::Entering
        })
        .map(|entry| entry.timestamp())
        .max()
    else {
        return;
    };

    let left = dataset.access_events.iter().any(|event| {
        event.member_id == victim_id
            && event.direction == Direction::Leaving
            && event.timestamp.date() == last_entry.date()
            && event.timestamp > last_entry
    });
    if left {
        problems.push(format!(
            "victim {victim_id} leaves after the final dressing room entry"
        ));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::records::{StaffRecord, Testimony};
    use crate::scenario::TIMELINE;
    use crate::types::StaffRole;

    fn staff(id: &str, role: StaffRole, involvement: Involvement) -> StaffRecord {
        StaffRecord {
            employee_id: id.to_string(),
            employee_name: format!("Name {id}"),
            employee_role: role,
            involvement,
        }
    }

    fn minimal_dataset() -> Dataset {
        let access_events = TIMELINE
            .iter()
            .map(|entry| match entry.involvement {
                Involvement::Murderer => entry.event_for("MURDER01"),
                _ => entry.event_for("VICTIM01"),
            })
            .collect();
        Dataset {
            incidents: vec![canonical_incident()],
            testimonies: SCRIPTED_TESTIMONIES
                .iter()
                .map(|text| Testimony {
                    case_id: CASE_ID.to_string(),
                    witness_name: "Jane Roe".to_string(),
                    testimony: text.to_string(),
                })
                .collect(),
            access_events,
            staff: vec![
                staff("MURDER01", StaffRole::LightingTechnician, Involvement::Murderer),
                staff("VICTIM01", StaffRole::LeadActor, Involvement::Victim),
            ],
        }
    }

    #[test]
    fn accepts_minimal_case_file() {
        assert_eq!(validate_dataset(&minimal_dataset()), Ok(()));
    }

    #[test]
    fn rejects_missing_scripted_testimony() {
        let mut dataset = minimal_dataset();
        dataset.testimonies.remove(2);
        let problems = check_dataset(&dataset);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("scripted testimony missing"));
    }

    #[test]
    fn rejects_wrong_pinned_role() {
        let mut dataset = minimal_dataset();
        dataset.staff[0].employee_role = StaffRole::Usher;
        assert_eq!(
            check_dataset(&dataset),
            vec!["murderer MURDER01 has role Usher".to_string()]
        );
    }

    #[test]
    fn rejects_victim_leaving_dressing_room() {
        let mut dataset = minimal_dataset();
        let mut leaving = TIMELINE[10].event_for("VICTIM01");
        leaving.direction = Direction::Leaving;
        leaving.timestamp = leaving
            .timestamp
            .date()
            .and_time(NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default());
        dataset.access_events.push(leaving);
        assert_eq!(
            check_dataset(&dataset),
            vec!["victim VICTIM01 leaves after the final dressing room entry".to_string()]
        );
    }

    #[test]
    fn reports_badge_ids_without_staff_record() {
        let mut dataset = minimal_dataset();
        let mut stranger = TIMELINE[0].event_for("STRANGER");
        stranger.location = TheaterArea::SoundBooth;
        dataset.access_events.push(stranger);
        assert_eq!(
            check_dataset(&dataset),
            vec!["badge id STRANGER has no staff record".to_string()]
        );
    }

    #[test]
    fn reports_duplicate_canonical_case() {
        let mut dataset = minimal_dataset();
        dataset.incidents.push(canonical_incident());
        assert_eq!(
            check_dataset(&dataset),
            vec![format!("duplicate case id: {CASE_ID}")]
        );
    }
}
