//! Given names for generated people.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::person::Gender;

pub const MALE_NAMES: [&str; 48] = [
    "Baelor", "Draven", "Falathar", "Hadrian", "Jareth", "Lysander", "Nyx", "Oberon",
    "Quintus", "Thorian", "Valerian", "Xander", "Aric", "Caspian", "Finnian", "Haelen",
    "Jorvik", "Kael", "Maelor", "Orion", "Raffael", "Tiberius", "Zaltar", "Aegon",
    "Balin", "Corvus", "Darius", "Eldrin", "Fenris", "Gideon", "Hektor", "Ignis",
    "Jarik", "Kaelan", "Lorien", "Marius", "Nereus", "Osric", "Phelan", "Ragnar",
    "Silas", "Talon", "Ulric", "Viggo", "Wulfric", "Xylon", "Yorath", "Zephyr",
];

pub const FEMALE_NAMES: [&str; 52] = [
    "Aeliana", "Caelia", "Elyndra", "Gwendolyn", "Isolde", "Kyra", "Myranda", "Phiala",
    "Rhiannon", "Seraphina", "Ursula", "Wynter", "Ylva", "Zephyra", "Brynn", "Dahlia",
    "Elowen", "Giselle", "Ilaria", "Lyra", "Niamh", "Primrose", "Saoirse", "Ulani",
    "Vespera", "Wren", "Xylia", "Yvaine", "Anya", "Brynja", "Calista", "Demetra",
    "Eira", "Fiona", "Gwyneira", "Hestia", "Iona", "Juno", "Kassandra", "Lilith",
    "Morgana", "Nixie", "Ophelia", "Pandora", "Ravenna", "Selene", "Titania", "Valencia",
    "Winifred", "Xanthe", "Yara", "Zelda",
];

pub fn names_for(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Male => &MALE_NAMES,
        Gender::Female => &FEMALE_NAMES,
    }
}

/// Pick a random given name for `gender`
pub fn random_name<R: Rng + ?Sized>(gender: Gender, rng: &mut R) -> &'static str {
    names_for(gender).choose(rng).copied().unwrap_or("Unnamed")
}

/// Even odds of either gender
pub fn random_gender<R: Rng + ?Sized>(rng: &mut R) -> Gender {
    if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}
