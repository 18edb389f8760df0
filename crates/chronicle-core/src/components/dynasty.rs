//! Dynasty Components

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// A ruling family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dynasty {
    pub name: String,
    pub founder: PersonId,
    pub founding_queen: PersonId,
    /// `None` once the line has ended
    pub monarch: Option<PersonId>,
    /// Living members processed each year, in joining order
    pub family: Vec<PersonId>,
}

impl Dynasty {
    pub fn new(name: impl Into<String>, king: PersonId, queen: PersonId) -> Self {
        Self {
            name: name.into(),
            founder: king,
            founding_queen: queen,
            monarch: Some(king),
            family: vec![king, queen],
        }
    }

    pub fn is_member(&self, id: PersonId) -> bool {
        self.family.contains(&id)
    }

    pub fn join(&mut self, id: PersonId) {
        if !self.is_member(id) {
            self.family.push(id);
        }
    }

    pub fn leave(&mut self, id: PersonId) {
        self.family.retain(|member| *member != id);
    }
}

/// Resource: all dynasties in founding order
#[derive(Resource, Debug, Clone, Default)]
pub struct Dynasties {
    pub dynasties: Vec<Dynasty>,
}

impl Dynasties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dynasty: Dynasty) {
        self.dynasties.push(dynasty);
    }

    pub fn get(&self, name: &str) -> Option<&Dynasty> {
        self.dynasties.iter().find(|dynasty| dynasty.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dynasty> {
        self.dynasties.iter()
    }

    pub fn len(&self) -> usize {
        self.dynasties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dynasties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dynasty_crowns_founder() {
        let dynasty = Dynasty::new("House Nerdival", PersonId(0), PersonId(1));
        assert_eq!(dynasty.monarch, Some(PersonId(0)));
        assert_eq!(dynasty.family, vec![PersonId(0), PersonId(1)]);
    }

    #[test]
    fn test_join_and_leave() {
        let mut dynasty = Dynasty::new("House Nerdival", PersonId(0), PersonId(1));
        dynasty.join(PersonId(2));
        dynasty.join(PersonId(2));
        dynasty.leave(PersonId(0));

        assert_eq!(dynasty.family, vec![PersonId(1), PersonId(2)]);
        assert!(!dynasty.is_member(PersonId(0)));
    }
}
