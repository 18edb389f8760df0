//! Dynasty Setup
//!
//! Founds a dynasty with a married king and queen.

use rand::Rng;

use super::names::random_name;
use super::world::{ROYAL_FACTION, ROYAL_REGION};
use crate::components::dynasty::Dynasty;
use crate::components::person::{Gender, Roster};
use crate::config::PersonConfig;

/// Both founders are aged within this range at the start year
pub const FOUNDER_MIN_AGE: i32 = 20;
pub const FOUNDER_MAX_AGE: i32 = 40;

pub fn found_dynasty<R: Rng + ?Sized>(
    name: &str,
    year: i32,
    roster: &mut Roster,
    person: &PersonConfig,
    rng: &mut R,
) -> Dynasty {
    let king_age = rng.gen_range(FOUNDER_MIN_AGE..=FOUNDER_MAX_AGE);
    let queen_age = rng.gen_range(FOUNDER_MIN_AGE..=FOUNDER_MAX_AGE);

    let king = roster.spawn(
        random_name(Gender::Male, rng),
        Gender::Male,
        year - king_age,
        ROYAL_FACTION,
        ROYAL_REGION,
        person.initial_health,
    );
    let queen = roster.spawn(
        random_name(Gender::Female, rng),
        Gender::Female,
        year - queen_age,
        ROYAL_FACTION,
        ROYAL_REGION,
        person.initial_health,
    );

    roster.marry(king, queen);
    if let Some(founder) = roster.get_mut(king) {
        founder.was_monarch = true;
    }

    tracing::info!(
        target: "dynasty",
        "{} founded by {} and {}",
        name,
        roster.name(king),
        roster.name(queen)
    );

    Dynasty::new(name, king, queen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_found_dynasty() {
        let mut roster = Roster::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let dynasty = found_dynasty("House Nerdival", 1000, &mut roster, &PersonConfig::default(), &mut rng);

        let king = roster.get(dynasty.founder).unwrap();
        let queen = roster.get(dynasty.founding_queen).unwrap();

        assert_eq!(dynasty.monarch, Some(dynasty.founder));
        assert_eq!(king.gender, Gender::Male);
        assert_eq!(queen.gender, Gender::Female);
        assert!(king.was_monarch);
        assert!(!queen.was_monarch);
        assert_eq!(king.partners, vec![dynasty.founding_queen]);
        assert_eq!(king.faction, "Noble Houses");
        assert_eq!(queen.region, "Central Valley");
        for founder in [king, queen] {
            let age = founder.age(1000);
            assert!((FOUNDER_MIN_AGE..=FOUNDER_MAX_AGE).contains(&age), "age {}", age);
            assert_eq!(founder.health, 100);
        }
    }
}
