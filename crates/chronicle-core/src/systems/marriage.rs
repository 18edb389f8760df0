//! Marriage Market
//!
//! A yearly pool of unmarried outsiders that dynasty members can marry.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::dynasty::{roll_between, DynastySettings};
use crate::components::person::{Person, PersonId, Roster};
use crate::config::{MarriageConfig, PersonConfig};
use crate::setup::{random_gender, random_name, FACTIONS, REGIONS};
use crate::simulation::{SimClock, SimRng};

/// An outsider available for marriage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarriageCandidate {
    pub person: PersonId,
    /// Years left before the candidate leaves the market
    pub remaining_years: u32,
}

/// Resource: current marriage candidates
#[derive(Resource, Debug, Clone, Default)]
pub struct MarriageMarket {
    candidates: Vec<MarriageCandidate>,
}

impl MarriageMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[MarriageCandidate] {
        &self.candidates
    }

    pub fn add(&mut self, person: PersonId, remaining_years: u32) {
        self.candidates.push(MarriageCandidate {
            person,
            remaining_years,
        });
    }

    pub fn remove(&mut self, person: PersonId) {
        self.candidates.retain(|c| c.person != person);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Expires stale candidates and possibly adds a new one.
    ///
    /// Candidates leave once their years run out, or when they die or marry.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        year: i32,
        roster: &mut Roster,
        marriage: &MarriageConfig,
        person: &PersonConfig,
        rng: &mut R,
    ) {
        self.candidates.retain(|c| {
            c.remaining_years > 0
                && roster
                    .get(c.person)
                    .is_some_and(|p| p.is_alive() && p.partners.is_empty())
        });
        for candidate in &mut self.candidates {
            candidate.remaining_years -= 1;
        }

        if rng.gen::<f64>() >= marriage.new_candidate_chance {
            return;
        }

        let gender = random_gender(rng);
        let name = random_name(gender, rng);
        let age = roll_between(rng, marriage.candidate_min_age, marriage.candidate_max_age);
        let faction = FACTIONS.choose(rng).copied().unwrap_or("Noble Houses");
        let region = REGIONS.choose(rng).copied().unwrap_or("Central Valley");

        let id = roster.spawn(name, gender, year - age, faction, region, person.initial_health);
        self.add(id, marriage.candidate_years);
        tracing::debug!(target: "marriage", "Added new marriage candidate: {}", name);
    }

    /// Picks a random unmarried candidate of the opposite gender within the
    /// allowed age gap.
    pub fn find_partner<R: Rng + ?Sized>(
        &self,
        seeker: &Person,
        year: i32,
        roster: &Roster,
        marriage: &MarriageConfig,
        rng: &mut R,
    ) -> Option<PersonId> {
        let seeker_age = seeker.age(year);
        let suitable: Vec<PersonId> = self
            .candidates
            .iter()
            .filter_map(|c| roster.get(c.person))
            .filter(|p| {
                p.id != seeker.id
                    && p.is_alive()
                    && p.gender != seeker.gender
                    && p.partners.is_empty()
                    && (p.age(year) - seeker_age).abs() <= marriage.max_age_difference
            })
            .map(|p| p.id)
            .collect();

        if suitable.is_empty() {
            return None;
        }
        Some(suitable[rng.gen_range(0..suitable.len())])
    }
}

/// System: refresh the marriage market before dynasties age
pub fn update_marriage_market(
    clock: Res<SimClock>,
    settings: Res<DynastySettings>,
    mut rng: ResMut<SimRng>,
    mut roster: ResMut<Roster>,
    mut market: ResMut<MarriageMarket>,
) {
    market.update(
        clock.year,
        &mut roster,
        &settings.marriage,
        &settings.person,
        &mut rng.0,
    );
}
