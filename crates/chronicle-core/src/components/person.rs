//! Person Components
//!
//! Dynasty members and marriage candidates live in a single [`Roster`]
//! arena; relationships are stored as [`PersonId`]s.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a person in the [`Roster`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "person_{:04}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn opposite(&self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    /// Symbol used in the family tree
    pub fn symbol(&self) -> &'static str {
        match self {
            Gender::Male => "♂",
            Gender::Female => "♀",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

/// A single person in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub gender: Gender,
    pub birth_year: i32,
    /// `None` while alive
    pub death_year: Option<i32>,
    /// Falls each year; death at 0
    pub health: i32,
    pub faction: String,
    pub region: String,
    /// Current and former partners, in marriage order
    pub partners: Vec<PersonId>,
    pub children: Vec<PersonId>,
    /// `(mother, father)` for people born during the run
    pub parents: Option<(PersonId, PersonId)>,
    pub was_monarch: bool,
}

impl Person {
    pub fn is_alive(&self) -> bool {
        self.death_year.is_none()
    }

    /// Age in `year`, or age at death for the deceased
    pub fn age(&self, year: i32) -> i32 {
        self.death_year.unwrap_or(year) - self.birth_year
    }

    /// Birth and death years as shown in the family tree
    pub fn lifespan(&self) -> String {
        match self.death_year {
            Some(death) => format!("{}–{}", self.birth_year, death),
            None => format!("born {}", self.birth_year),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.gender, self.lifespan())
    }
}

/// Resource: everyone who has ever existed in the run
#[derive(Resource, Debug, Clone, Default)]
pub struct Roster {
    persons: Vec<Person>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a living person with the given starting health
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        gender: Gender,
        birth_year: i32,
        faction: impl Into<String>,
        region: impl Into<String>,
        health: i32,
    ) -> PersonId {
        let id = PersonId(self.persons.len() as u32);
        let person = Person {
            id,
            name: name.into(),
            gender,
            birth_year,
            death_year: None,
            health,
            faction: faction.into(),
            region: region.into(),
            partners: Vec::new(),
            children: Vec::new(),
            parents: None,
            was_monarch: false,
        };
        tracing::debug!(target: "dynasty", "Created new person: {}", person.name);
        self.persons.push(person);
        id
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.get_mut(id.0 as usize)
    }

    /// Name for display; unknown ids render as their id
    pub fn name(&self, id: PersonId) -> String {
        self.get(id)
            .map(|person| person.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn is_alive(&self, id: PersonId) -> bool {
        self.get(id).is_some_and(Person::is_alive)
    }

    /// Records a marriage on both sides
    pub fn marry(&mut self, a: PersonId, b: PersonId) {
        if let Some(person) = self.get_mut(a) {
            if !person.partners.contains(&b) {
                person.partners.push(b);
            }
        }
        if let Some(person) = self.get_mut(b) {
            if !person.partners.contains(&a) {
                person.partners.push(a);
            }
        }
    }

    /// The most recent partner who is still alive
    pub fn living_partner(&self, id: PersonId) -> Option<PersonId> {
        self.get(id)?
            .partners
            .iter()
            .rev()
            .copied()
            .find(|partner| self.is_alive(*partner))
    }

    /// Links a newborn to both parents
    pub fn add_child(&mut self, mother: PersonId, father: PersonId, child: PersonId) {
        for parent in [mother, father] {
            if let Some(person) = self.get_mut(parent) {
                person.children.push(child);
            }
        }
        if let Some(person) = self.get_mut(child) {
            person.parents = Some((mother, father));
        }
    }

    pub fn kill(&mut self, id: PersonId, year: i32) {
        if let Some(person) = self.get_mut(id) {
            person.death_year.get_or_insert(year);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| person.is_alive())
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn couple() -> (Roster, PersonId, PersonId) {
        let mut roster = Roster::new();
        let king = roster.spawn("Baelor", Gender::Male, 970, "Noble Houses", "Central Valley", 100);
        let queen = roster.spawn("Kyra", Gender::Female, 975, "Noble Houses", "Central Valley", 100);
        (roster, king, queen)
    }

    #[test]
    fn test_age_stops_at_death() {
        let (mut roster, king, _) = couple();
        assert_eq!(roster.get(king).unwrap().age(1000), 30);

        roster.kill(king, 1010);
        assert_eq!(roster.get(king).unwrap().age(1050), 40);
        assert!(!roster.is_alive(king));
    }

    #[test]
    fn test_marry_is_symmetric_and_idempotent() {
        let (mut roster, king, queen) = couple();
        roster.marry(king, queen);
        roster.marry(queen, king);

        assert_eq!(roster.get(king).unwrap().partners, vec![queen]);
        assert_eq!(roster.get(queen).unwrap().partners, vec![king]);
        assert_eq!(roster.living_partner(king), Some(queen));
    }

    #[test]
    fn test_widow_has_no_living_partner() {
        let (mut roster, king, queen) = couple();
        roster.marry(king, queen);
        roster.kill(king, 1005);

        assert_eq!(roster.living_partner(queen), None);
    }

    #[test]
    fn test_add_child_links_parents() {
        let (mut roster, king, queen) = couple();
        let child = roster.spawn("Lyra", Gender::Female, 1001, "Noble Houses", "Central Valley", 100);
        roster.add_child(queen, king, child);

        assert_eq!(roster.get(king).unwrap().children, vec![child]);
        assert_eq!(roster.get(queen).unwrap().children, vec![child]);
        assert_eq!(roster.get(child).unwrap().parents, Some((queen, king)));
    }

    #[test]
    fn test_lifespan_display() {
        let (mut roster, king, _) = couple();
        assert_eq!(roster.get(king).unwrap().to_string(), "Baelor (male, born 970)");

        roster.kill(king, 1031);
        assert_eq!(roster.get(king).unwrap().lifespan(), "970–1031");
    }
}
