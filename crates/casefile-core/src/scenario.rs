//! The scripted case: the one incident, testimonies and badge movements
//! that encode the answer of the puzzle.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::records::{AccessEvent, Incident};
use crate::types::{
    Direction, IncidentLocation, IncidentType, Involvement, Squad, TheaterArea,
};

/// Case id of the murder under investigation.
pub const CASE_ID: &str = "AURORA-2025-03-15";

/// Witness statements filed against the canonical case, in order.
pub const SCRIPTED_TESTIMONIES: [&str; 5] = [
    "I saw the lighting technician arguing with the victim earlier in the day. They seemed very angry.",
    "The stage manager was acting strangely all evening, constantly checking the time.",
    "I noticed the costume designer had access to the victim's dressing room multiple times.",
    "The sound engineer was the last person I saw talking to the victim before the performance.",
    "The director and the victim had a heated argument about creative differences during rehearsal.",
];

const CANONICAL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 3, 15) {
    Some(date) => date,
    None => panic!("invalid canonical date"),
};

/// Day of the murder.
pub fn canonical_date() -> NaiveDate {
    CANONICAL_DATE
}

/// The incident every other table points back to.
pub fn canonical_incident() -> Incident {
    Incident {
        case_id: CASE_ID.to_string(),
        squad: Squad::Homicide,
        date: canonical_date(),
        location: IncidentLocation::AuroraTheater,
        incident_type: IncidentType::Murder,
    }
}

/// One badge swipe of the scripted evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub involvement: Involvement,
    pub hms: (u32, u32, u32),
    pub area: TheaterArea,
    pub direction: Direction,
}

impl TimelineEntry {
    const fn new(
        involvement: Involvement,
        hms: (u32, u32, u32),
        area: TheaterArea,
        direction: Direction,
    ) -> Self {
        Self {
            involvement,
            hms,
            area,
            direction,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        let (hour, minute, second) = self.hms;
        let time = NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default();
        NaiveDateTime::new(canonical_date(), time)
    }

    /// Materialize the swipe for a concrete badge id.
    pub fn event_for(&self, member_id: &str) -> AccessEvent {
        AccessEvent {
            timestamp: self.timestamp(),
            location: self.area,
            member_id: member_id.to_string(),
            direction: self.direction,
        }
    }

    /// Whether `event` is this swipe made by `member_id`.
    pub fn matches(&self, event: &AccessEvent, member_id: &str) -> bool {
        event.member_id == member_id
            && event.timestamp == self.timestamp()
            && event.location == self.area
            && event.direction == self.direction
    }
}

/// Murderer's movements, then the victim's. The victim never leaves the
/// dressing room after the last entry: that is where the body is found.
pub const TIMELINE: [TimelineEntry; 11] = [
    TimelineEntry::new(
        Involvement::Murderer,
        (18, 30, 45),
        TheaterArea::Backstage,
        Direction::Entering,
    ),
    TimelineEntry::new(
        Involvement::Murderer,
        (19, 15, 22),
        TheaterArea::LightingGrid,
        Direction::Entering,
    ),
    TimelineEntry::new(
        Involvement::Murderer,
        (19, 45, 10),
        TheaterArea::LightingGrid,
        Direction::Leaving,
    ),
    TimelineEntry::new(
        Involvement::Murderer,
        (19, 46, 33),
        TheaterArea::DressingRoom,
        Direction::Entering,
    ),
    TimelineEntry::new(
        Involvement::Murderer,
        (19, 52, 18),
        TheaterArea::DressingRoom,
        Direction::Leaving,
    ),
    TimelineEntry::new(
        Involvement::Murderer,
        (21, 30, 5),
        TheaterArea::Backstage,
        Direction::Leaving,
    ),
    TimelineEntry::new(
        Involvement::Victim,
        (17, 45, 12),
        TheaterArea::DressingRoom,
        Direction::Entering,
    ),
    TimelineEntry::new(
        Involvement::Victim,
        (18, 30, 33),
        TheaterArea::DressingRoom,
        Direction::Leaving,
    ),
    TimelineEntry::new(
        Involvement::Victim,
        (18, 35, 47),
        TheaterArea::MainStage,
        Direction::Entering,
    ),
    TimelineEntry::new(
        Involvement::Victim,
        (20, 15, 22),
        TheaterArea::MainStage,
        Direction::Leaving,
    ),
    TimelineEntry::new(
        Involvement::Victim,
        (20, 20, 18),
        TheaterArea::DressingRoom,
        Direction::Entering,
    ),
];

/// Scripted swipes for one principal.
pub fn timeline_for(involvement: Involvement) -> impl Iterator<Item = &'static TimelineEntry> {
    TIMELINE
        .iter()
        .filter(move |entry| entry.involvement == involvement)
}

/// Last moment the victim was seen alive.
pub fn time_of_death() -> NaiveDateTime {
    timeline_for(Involvement::Victim)
        .map(TimelineEntry::timestamp)
        .max()
        .unwrap_or_default()
}

/// Whether every scripted swipe of `involvement` is present for `member_id`.
pub fn timeline_matches(events: &[AccessEvent], member_id: &str, involvement: Involvement) -> bool {
    timeline_for(involvement).all(|entry| {
        events
            .iter()
            .any(|event| entry.matches(event, member_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_has_six_murderer_and_five_victim_swipes() {
        assert_eq!(timeline_for(Involvement::Murderer).count(), 6);
        assert_eq!(timeline_for(Involvement::Victim).count(), 5);
        assert!(timeline_for(Involvement::Bystander).next().is_none());
    }

    #[test]
    fn victim_ends_entering_dressing_room() {
        let last = timeline_for(Involvement::Victim)
            .max_by_key(|entry| entry.timestamp())
            .expect("victim timeline");
        assert_eq!(last.area, TheaterArea::DressingRoom);
        assert_eq!(last.direction, Direction::Entering);
        assert_eq!(
            time_of_death().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-03-15 20:20:18"
        );
    }

    #[test]
    fn timeline_matches_requires_every_swipe() {
        let mut events: Vec<AccessEvent> = timeline_for(Involvement::Victim)
            .map(|entry| entry.event_for("VICTIM01"))
            .collect();
        assert!(timeline_matches(&events, "VICTIM01", Involvement::Victim));
        assert!(!timeline_matches(&events, "OTHER001", Involvement::Victim));

        events.pop();
        assert!(!timeline_matches(&events, "VICTIM01", Involvement::Victim));
    }

    #[test]
    fn canonical_incident_is_the_theater_murder() {
        let incident = canonical_incident();
        assert_eq!(incident.case_id, "AURORA-2025-03-15");
        assert_eq!(incident.date.to_string(), "2025-03-15");
        assert_eq!(incident.location, IncidentLocation::AuroraTheater);
    }
}
