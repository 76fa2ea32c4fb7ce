use std::collections::HashSet;

use rand::Rng;

use casefile_core::{Error, Involvement, StaffMember, StaffPool, StaffRecord, StaffRole};

use super::{Generated, pick, random_code};
use crate::faker::person_name;

pub const TABLE: &str = "staff_database";

/// Length of a badge id.
const MEMBER_ID_LEN: usize = 8;

/// Fresh pool of unique badge ids: one murderer, one victim, the rest bystanders.
pub fn generate_pool<R: Rng>(rng: &mut R, size: usize) -> Result<StaffPool, Error> {
    if size < 2 {
        return Err(Error::InsufficientRows {
            table: "staff_pool",
            requested: size,
            minimum: 2,
        });
    }

    let mut used = HashSet::new();
    let mut members = Vec::with_capacity(size);
    for index in 0..size {
        let id = loop {
            let candidate = random_code(rng, MEMBER_ID_LEN);
            if used.insert(candidate.clone()) {
                break candidate;
            }
        };
        let involvement = match index {
            0 => Involvement::Murderer,
            1 => Involvement::Victim,
            _ => Involvement::Bystander,
        };
        members.push(StaffMember { id, involvement });
    }
    StaffPool::new(members)
}

/// One staff record per badge id, in the order given.
///
/// Roles follow the involvement recorded in `pool`, so the order of
/// `employee_ids` never decides who the murderer is. No staff row is
/// scripted, so every row counts as filler.
pub fn generate<R: Rng>(
    rng: &mut R,
    employee_ids: &[String],
    pool: &StaffPool,
) -> Result<Generated<StaffRecord>, Error> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(employee_ids.len());
    for employee_id in employee_ids {
        if !seen.insert(employee_id.as_str()) {
            return Err(Error::InvariantViolation(format!(
                "employee id '{employee_id}' listed twice"
            )));
        }
        let member = pool.get(employee_id).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "employee id '{employee_id}' is not in the staff pool"
            ))
        })?;

        let employee_name = person_name(rng);
        let employee_role = match member.involvement.pinned_role() {
            Some(role) => role,
            None => pick(rng, StaffRole::ASSIGNABLE),
        };
        rows.push(StaffRecord {
            employee_id: employee_id.clone(),
            employee_name,
            employee_role,
            involvement: member.involvement,
        });
    }

    for involvement in [Involvement::Murderer, Involvement::Victim] {
        if !rows.iter().any(|row| row.involvement == involvement) {
            return Err(Error::InvariantViolation(format!(
                "the {involvement} never appears in the access log"
            )));
        }
    }
    Ok(Generated::merge(Vec::new(), rows))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn pool_ids(pool: &StaffPool) -> Vec<String> {
        pool.members.iter().map(|member| member.id.clone()).collect()
    }

    #[test]
    fn pool_tags_murderer_and_victim() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pool = generate_pool(&mut rng, 20).expect("pool");
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.members[0].involvement, Involvement::Murderer);
        assert_eq!(pool.members[1].involvement, Involvement::Victim);
        assert!(pool.members.iter().all(|m| m.id.len() == MEMBER_ID_LEN));
    }

    #[test]
    fn roles_follow_involvement_not_position() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pool = generate_pool(&mut rng, 6).expect("pool");
        let mut ids = pool_ids(&pool);
        ids.reverse();

        let staff = generate(&mut rng, &ids, &pool).expect("staff");
        assert!(staff.fixtures().is_empty());
        let murderer = staff
            .rows
            .iter()
            .find(|row| row.involvement == Involvement::Murderer)
            .expect("murderer");
        let victim = staff
            .rows
            .iter()
            .find(|row| row.involvement == Involvement::Victim)
            .expect("victim");

        assert_eq!(murderer.employee_id, pool.members[0].id);
        assert_eq!(murderer.employee_role, StaffRole::LightingTechnician);
        assert_eq!(victim.employee_id, pool.members[1].id);
        assert_eq!(victim.employee_role, StaffRole::LeadActor);
        assert!(
            staff
                .rows
                .iter()
                .filter(|row| row.involvement == Involvement::Bystander)
                .all(|row| row.employee_role != StaffRole::LeadActor)
        );
    }

    #[test]
    fn unknown_employee_id_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = generate_pool(&mut rng, 4).expect("pool");
        let mut ids = pool_ids(&pool);
        ids.push("NOTSTAFF".to_string());
        let err = generate(&mut rng, &ids, &pool).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn duplicate_employee_id_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = generate_pool(&mut rng, 4).expect("pool");
        let mut ids = pool_ids(&pool);
        let repeated = ids[2].clone();
        ids.push(repeated.clone());
        let err = generate(&mut rng, &ids, &pool).unwrap_err();
        assert_eq!(
            err,
            Error::InvariantViolation(format!("employee id '{repeated}' listed twice"))
        );
    }

    #[test]
    fn missing_victim_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = generate_pool(&mut rng, 4).expect("pool");
        let ids: Vec<String> = pool_ids(&pool)
            .into_iter()
            .filter(|id| pool.get(id).map(|m| m.involvement) != Some(Involvement::Victim))
            .collect();
        let err = generate(&mut rng, &ids, &pool).unwrap_err();
        assert_eq!(
            err,
            Error::InvariantViolation("the victim never appears in the access log".to_string())
        );
    }

    #[test]
    fn pool_of_one_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            generate_pool(&mut rng, 1),
            Err(Error::InsufficientRows { minimum: 2, .. })
        ));
    }
}
