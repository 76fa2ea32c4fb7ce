use chrono::NaiveDateTime;
use rand::Rng;

use casefile_core::{
    AccessEvent, Error, Involvement, StaffMember, StaffPool, TIMELINE, canonical_date,
    time_of_death,
};

use super::{Generated, HistoryWindow, sample, sample_time};

pub const TABLE: &str = "stage_access";

/// Hour the theater opens on the day of the murder.
const THEATER_OPENS: u32 = 9;

/// How filler access events are spread over time.
#[derive(Debug, Clone, Copy)]
pub struct AccessLogSettings {
    pub canonical_day_probability: f64,
    pub window: HistoryWindow,
}

/// The scripted evening, resolved to the pool's murderer and victim ids.
pub fn fixtures(pool: &StaffPool) -> Result<Vec<AccessEvent>, Error> {
    let murderer = pool.principal(Involvement::Murderer)?;
    let victim = pool.principal(Involvement::Victim)?;
    TIMELINE
        .iter()
        .map(|entry| match entry.involvement {
            Involvement::Murderer => Ok(entry.event_for(murderer)),
            Involvement::Victim => Ok(entry.event_for(victim)),
            Involvement::Bystander => Err(Error::InvariantViolation(
                "scripted timeline names a bystander".to_string(),
            )),
        })
        .collect()
}

/// `count` random swipes by members of the pool.
///
/// The victim is never drawn for a swipe later than the time of death.
pub fn filler<R: Rng>(
    rng: &mut R,
    pool: &StaffPool,
    count: usize,
    settings: &AccessLogSettings,
) -> Result<Vec<AccessEvent>, Error> {
    let death = time_of_death();
    let alive: Vec<&StaffMember> = pool
        .members
        .iter()
        .filter(|member| member.involvement != Involvement::Victim)
        .collect();
    if alive.is_empty() && count > 0 {
        return Err(Error::InvariantViolation(
            "access log needs at least one staff member besides the victim".to_string(),
        ));
    }

    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let timestamp = filler_timestamp(rng, settings);
        let location = sample(rng);
        let member = if timestamp > death {
            alive[rng.random_range(0..alive.len())]
        } else {
            &pool.members[rng.random_range(0..pool.members.len())]
        };
        rows.push(AccessEvent {
            timestamp,
            location,
            member_id: member.id.clone(),
            direction: sample(rng),
        });
    }
    Ok(rows)
}

fn filler_timestamp<R: Rng>(rng: &mut R, settings: &AccessLogSettings) -> NaiveDateTime {
    if rng.random::<f64>() < settings.canonical_day_probability {
        NaiveDateTime::new(canonical_date(), sample_time(rng, THEATER_OPENS))
    } else {
        settings.window.sample_datetime(rng)
    }
}

/// Stage access log: the eleven scripted swipes then `rows - 11` random ones.
pub fn generate<R: Rng>(
    rng: &mut R,
    pool: &StaffPool,
    rows: usize,
    settings: &AccessLogSettings,
) -> Result<Generated<AccessEvent>, Error> {
    if rows < TIMELINE.len() {
        return Err(Error::InsufficientRows {
            table: TABLE,
            requested: rows,
            minimum: TIMELINE.len(),
        });
    }
    let fixtures = fixtures(pool)?;
    let filler = filler(rng, pool, rows - fixtures.len(), settings)?;
    Ok(Generated::merge(fixtures, filler))
}
