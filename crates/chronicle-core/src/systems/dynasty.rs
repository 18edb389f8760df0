//! Dynasty System
//!
//! Ages every family member once per year. For each member, in joining
//! order: health loss, death check, then either a marriage attempt or a
//! birth attempt. A monarch's death triggers succession.

use bevy_ecs::prelude::*;
use rand::Rng;

use chronicle_events::{ChronicleEntry, DynastyEvent, SuccessionRelation};

use super::marriage::MarriageMarket;
use crate::components::dynasty::{Dynasties, Dynasty};
use crate::components::person::{Gender, PersonId, Roster};
use crate::config::{ChildbirthConfig, Config, MarriageConfig, PersonConfig};
use crate::events::YearChronicle;
use crate::setup::{random_gender, random_name};
use crate::simulation::{SimClock, SimRng};

/// Youngest age at which a child or sibling can take the throne
pub const SUCCESSION_MIN_AGE: i32 = 18;

/// Resource: settings for aging, marriage and childbirth
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DynastySettings {
    pub person: PersonConfig,
    pub marriage: MarriageConfig,
    pub childbirth: ChildbirthConfig,
}

impl DynastySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            person: config.person.clone(),
            marriage: config.marriage.clone(),
            childbirth: config.childbirth.clone(),
        }
    }
}

/// Uniform roll in `[low, high]`; collapses to `low` for an empty range
pub(crate) fn roll_between<R: Rng + ?Sized>(rng: &mut R, low: i32, high: i32) -> i32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Chance that an unpartnered adult of `age` tries to marry this year
pub fn marriage_chance(age: i32, marriage: &MarriageConfig) -> f64 {
    let years_past_min = f64::from((age - marriage.min_age).max(0));
    (marriage.marriage_chance_base + years_past_min * marriage.marriage_chance_increase)
        .min(marriage.max_marriage_chance)
}

/// Runs one year for a single dynasty and returns its family events
pub fn simulate_dynasty_year<R: Rng + ?Sized>(
    dynasty: &mut Dynasty,
    year: i32,
    roster: &mut Roster,
    market: &mut MarriageMarket,
    settings: &DynastySettings,
    rng: &mut R,
) -> Vec<DynastyEvent> {
    let mut events = Vec::new();

    for id in dynasty.family.clone() {
        if !roster.is_alive(id) {
            dynasty.leave(id);
            continue;
        }

        if let Some(age) = age_one_year(id, year, roster, &settings.person, rng) {
            roster.kill(id, year);
            dynasty.leave(id);
            tracing::info!(target: "dynasty", "{} died at age {}", roster.name(id), age);
            events.push(DynastyEvent::Death {
                year,
                dynasty: dynasty.name.clone(),
                person: roster.name(id),
                age,
            });
            if dynasty.monarch == Some(id) {
                events.push(replace_monarch(dynasty, id, year, roster));
            }
            continue;
        }

        if let Some(event) = try_marry(dynasty, id, year, roster, market, &settings.marriage, rng) {
            events.push(event);
            continue;
        }

        if let Some(event) = try_birth(dynasty, id, year, roster, settings, rng) {
            events.push(event);
        }
    }

    events
}

/// Applies yearly health loss and returns the age at death if the person dies
fn age_one_year<R: Rng + ?Sized>(
    id: PersonId,
    year: i32,
    roster: &mut Roster,
    person: &PersonConfig,
    rng: &mut R,
) -> Option<i32> {
    let loss = roll_between(rng, person.health_decrease_min, person.health_decrease_max);
    let member = roster.get_mut(id)?;
    member.health -= loss;

    let age = member.age(year);
    let limit = person.max_base_age + roll_between(rng, 0, person.max_age_bonus);
    (member.health <= 0 || age > limit).then_some(age)
}

fn try_marry<R: Rng + ?Sized>(
    dynasty: &mut Dynasty,
    id: PersonId,
    year: i32,
    roster: &mut Roster,
    market: &mut MarriageMarket,
    marriage: &MarriageConfig,
    rng: &mut R,
) -> Option<DynastyEvent> {
    let age = roster.get(id)?.age(year);
    if age < marriage.min_age || roster.living_partner(id).is_some() {
        return None;
    }
    if rng.gen::<f64>() >= marriage_chance(age, marriage) {
        return None;
    }

    let Some(partner) = market.find_partner(roster.get(id)?, year, roster, marriage, rng) else {
        tracing::debug!(
            target: "marriage",
            "{} wanted to marry, but the market had no suitable partner",
            roster.name(id)
        );
        return None;
    };

    roster.marry(id, partner);
    market.remove(partner);
    dynasty.join(partner);
    tracing::info!(target: "marriage", "{} married {}", roster.name(id), roster.name(partner));

    Some(DynastyEvent::Marriage {
        year,
        dynasty: dynasty.name.clone(),
        person: roster.name(id),
        partner: roster.name(partner),
        age,
    })
}

fn try_birth<R: Rng + ?Sized>(
    dynasty: &mut Dynasty,
    mother: PersonId,
    year: i32,
    roster: &mut Roster,
    settings: &DynastySettings,
    rng: &mut R,
) -> Option<DynastyEvent> {
    let childbirth = &settings.childbirth;
    let (age, faction, region) = {
        let person = roster.get(mother)?;
        if person.gender != Gender::Female {
            return None;
        }
        (person.age(year), person.faction.clone(), person.region.clone())
    };
    if age <= childbirth.min_age || age >= childbirth.max_age {
        return None;
    }
    let father = roster.living_partner(mother)?;
    if rng.gen::<f64>() >= childbirth.chance {
        return None;
    }

    let gender = random_gender(rng);
    let child = roster.spawn(
        random_name(gender, rng),
        gender,
        year,
        faction,
        region,
        settings.person.initial_health,
    );
    roster.add_child(mother, father, child);
    dynasty.join(child);
    tracing::info!(
        target: "dynasty",
        "{} was born to {} and {}",
        roster.name(child),
        roster.name(mother),
        roster.name(father)
    );

    Some(DynastyEvent::Birth {
        year,
        dynasty: dynasty.name.clone(),
        child: roster.name(child),
        mother: roster.name(mother),
        father: roster.name(father),
    })
}

/// Oldest living adult child, else oldest living adult sibling
pub fn find_successor(
    monarch: PersonId,
    year: i32,
    roster: &Roster,
) -> Option<(PersonId, SuccessionRelation)> {
    let person = roster.get(monarch)?;
    let eligible = |id: &PersonId| {
        roster
            .get(*id)
            .is_some_and(|p| p.is_alive() && p.age(year) >= SUCCESSION_MIN_AGE)
    };
    let oldest = |ids: Vec<PersonId>| {
        ids.into_iter()
            .filter_map(|id| roster.get(id))
            .min_by_key(|p| (p.birth_year, p.id))
            .map(|p| p.id)
    };

    let children: Vec<PersonId> = person.children.iter().copied().filter(eligible).collect();
    if let Some(child) = oldest(children) {
        return Some((child, SuccessionRelation::Child));
    }

    let (mother, father) = person.parents?;
    let mut siblings: Vec<PersonId> = [mother, father]
        .iter()
        .filter_map(|parent| roster.get(*parent))
        .flat_map(|parent| parent.children.iter().copied())
        .filter(|id| *id != monarch)
        .filter(eligible)
        .collect();
    siblings.sort();
    siblings.dedup();

    oldest(siblings).map(|sibling| (sibling, SuccessionRelation::Sibling))
}

fn replace_monarch(
    dynasty: &mut Dynasty,
    old: PersonId,
    year: i32,
    roster: &mut Roster,
) -> DynastyEvent {
    let old_is_king = roster.get(old).is_some_and(|p| p.gender == Gender::Male);

    match find_successor(old, year, roster) {
        Some((successor, relation)) => {
            dynasty.monarch = Some(successor);
            let is_king = match roster.get_mut(successor) {
                Some(person) => {
                    person.was_monarch = true;
                    person.gender == Gender::Male
                }
                None => false,
            };
            tracing::info!(
                target: "dynasty",
                "{} succeeds {} in {}",
                roster.name(successor),
                roster.name(old),
                dynasty.name
            );
            DynastyEvent::Succession {
                year,
                dynasty: dynasty.name.clone(),
                old_monarch: roster.name(old),
                new_monarch: roster.name(successor),
                relation,
                is_king,
            }
        }
        None => {
            dynasty.monarch = None;
            tracing::warn!(target: "dynasty", "{} has no heir; the line ends", dynasty.name);
            DynastyEvent::NoSuccessor {
                year,
                dynasty: dynasty.name.clone(),
                monarch: roster.name(old),
                is_king: old_is_king,
            }
        }
    }
}

/// System: run the year for every dynasty, in founding order
pub fn simulate_dynasties(
    clock: Res<SimClock>,
    settings: Res<DynastySettings>,
    mut rng: ResMut<SimRng>,
    mut roster: ResMut<Roster>,
    mut market: ResMut<MarriageMarket>,
    mut dynasties: ResMut<Dynasties>,
    mut chronicle: ResMut<YearChronicle>,
) {
    for dynasty in dynasties.dynasties.iter_mut() {
        let events = simulate_dynasty_year(
            dynasty,
            clock.year,
            &mut roster,
            &mut market,
            &settings,
            &mut rng.0,
        );
        chronicle.extend(events.into_iter().map(ChronicleEntry::Dynasty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn royal(roster: &mut Roster, name: &str, gender: Gender, birth_year: i32) -> PersonId {
        roster.spawn(name, gender, birth_year, "Noble Houses", "Central Valley", 100)
    }

    /// Settings under which nobody dies, marries or gives birth
    fn quiet() -> DynastySettings {
        DynastySettings {
            person: PersonConfig {
                health_decrease_max: 0,
                max_base_age: 200,
                max_age_bonus: 0,
                ..Default::default()
            },
            marriage: MarriageConfig {
                marriage_chance_base: 0.0,
                marriage_chance_increase: 0.0,
                new_candidate_chance: 0.0,
                ..Default::default()
            },
            childbirth: ChildbirthConfig {
                chance: 0.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_marriage_chance_grows_and_caps() {
        let marriage = MarriageConfig::default();
        assert!((marriage_chance(18, &marriage) - 0.1).abs() < 1e-9);
        assert!((marriage_chance(20, &marriage) - 0.2).abs() < 1e-9);
        assert!((marriage_chance(60, &marriage) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_birth_to_married_woman() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 975);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 978);
        roster.marry(king, queen);
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        let mut settings = quiet();
        settings.childbirth.chance = 1.0;

        let events = simulate_dynasty_year(
            &mut dynasty,
            1000,
            &mut roster,
            &mut MarriageMarket::new(),
            &settings,
            &mut StepRng::new(0, 0),
        );

        assert_eq!(events.len(), 1);
        let DynastyEvent::Birth { mother, father, .. } = &events[0] else {
            panic!("expected birth, got {:?}", events[0]);
        };
        assert_eq!(mother, "Kyra");
        assert_eq!(father, "Baelor");
        assert_eq!(dynasty.family.len(), 3);
        assert_eq!(roster.get(king).unwrap().children.len(), 1);
    }

    #[test]
    fn test_no_birth_outside_age_window() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 940);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 955);
        roster.marry(king, queen);
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        let mut settings = quiet();
        settings.childbirth.chance = 1.0;

        let events = simulate_dynasty_year(
            &mut dynasty,
            1000,
            &mut roster,
            &mut MarriageMarket::new(),
            &settings,
            &mut StepRng::new(0, 0),
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_widow_remarries_from_market() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 970);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 975);
        roster.marry(king, queen);
        roster.kill(queen, 995);
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        let mut market = MarriageMarket::new();
        let candidate = roster.spawn("Isolde", Gender::Female, 976, "Temple of Light", "Coastal Regions", 100);
        market.add(candidate, 5);

        let mut settings = quiet();
        settings.marriage.marriage_chance_base = 1.0;

        let events = simulate_dynasty_year(
            &mut dynasty,
            1000,
            &mut roster,
            &mut market,
            &settings,
            &mut StepRng::new(0, 0),
        );

        assert_eq!(
            events,
            vec![DynastyEvent::Marriage {
                year: 1000,
                dynasty: "House Nerdival".into(),
                person: "Baelor".into(),
                partner: "Isolde".into(),
                age: 30,
            }]
        );
        assert!(market.is_empty());
        assert!(dynasty.is_member(candidate));
        assert!(!dynasty.is_member(queen));
        assert_eq!(roster.get(king).unwrap().partners, vec![queen, candidate]);
    }

    #[test]
    fn test_death_by_old_age_passes_crown_to_oldest_child() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 900);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 960);
        roster.marry(king, queen);
        let younger = royal(&mut roster, "Aegon", Gender::Male, 985);
        let elder = royal(&mut roster, "Lyra", Gender::Female, 980);
        let infant = royal(&mut roster, "Wren", Gender::Female, 998);
        for child in [younger, elder, infant] {
            roster.add_child(queen, king, child);
        }
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        let mut settings = quiet();
        settings.person.max_base_age = 80;

        let events = simulate_dynasty_year(
            &mut dynasty,
            1000,
            &mut roster,
            &mut MarriageMarket::new(),
            &settings,
            &mut StepRng::new(0, 0),
        );

        assert_eq!(
            events,
            vec![
                DynastyEvent::Death {
                    year: 1000,
                    dynasty: "House Nerdival".into(),
                    person: "Baelor".into(),
                    age: 100,
                },
                DynastyEvent::Succession {
                    year: 1000,
                    dynasty: "House Nerdival".into(),
                    old_monarch: "Baelor".into(),
                    new_monarch: "Lyra".into(),
                    relation: SuccessionRelation::Child,
                    is_king: false,
                },
            ]
        );
        assert_eq!(dynasty.monarch, Some(elder));
        assert!(roster.get(elder).unwrap().was_monarch);
        assert!(!dynasty.is_member(king));
    }

    #[test]
    fn test_sibling_succession() {
        let mut roster = Roster::new();
        let mother = royal(&mut roster, "Kyra", Gender::Female, 930);
        let father = royal(&mut roster, "Baelor", Gender::Male, 928);
        let monarch = royal(&mut roster, "Aegon", Gender::Male, 960);
        let sister = royal(&mut roster, "Lyra", Gender::Female, 962);
        roster.add_child(mother, father, monarch);
        roster.add_child(mother, father, sister);

        assert_eq!(
            find_successor(monarch, 1000, &roster),
            Some((sister, SuccessionRelation::Sibling))
        );
    }

    #[test]
    fn test_minor_child_cannot_succeed() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 950);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 960);
        let child = royal(&mut roster, "Wren", Gender::Female, 990);
        roster.add_child(queen, king, child);

        assert_eq!(find_successor(king, 1000, &roster), None);
    }

    #[test]
    fn test_line_ends_without_heir() {
        let mut roster = Roster::new();
        let king = royal(&mut roster, "Baelor", Gender::Male, 950);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 960);
        roster.marry(king, queen);
        roster.get_mut(king).unwrap().health = 1;
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        let mut settings = quiet();
        settings.person.health_decrease_min = 5;
        settings.person.health_decrease_max = 5;

        let events = simulate_dynasty_year(
            &mut dynasty,
            1000,
            &mut roster,
            &mut MarriageMarket::new(),
            &settings,
            &mut StepRng::new(0, 0),
        );

        assert!(events.contains(&DynastyEvent::NoSuccessor {
            year: 1000,
            dynasty: "House Nerdival".into(),
            monarch: "Baelor".into(),
            is_king: true,
        }));
        assert_eq!(dynasty.monarch, None);
    }

    #[test]
    fn test_long_run_keeps_family_consistent() {
        let mut roster = Roster::new();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut market = MarriageMarket::new();
        let settings = DynastySettings::default();
        let king = royal(&mut roster, "Baelor", Gender::Male, 975);
        let queen = royal(&mut roster, "Kyra", Gender::Female, 978);
        roster.marry(king, queen);
        roster.get_mut(king).unwrap().was_monarch = true;
        let mut dynasty = Dynasty::new("House Nerdival", king, queen);

        for year in 1000..1100 {
            market.update(year, &mut roster, &settings.marriage, &settings.person, &mut rng);
            simulate_dynasty_year(&mut dynasty, year, &mut roster, &mut market, &settings, &mut rng);

            for id in &dynasty.family {
                assert!(roster.is_alive(*id), "dead member {} left in family", id);
            }
            if let Some(monarch) = dynasty.monarch {
                assert!(roster.get(monarch).unwrap().was_monarch);
            }
        }
    }
}
