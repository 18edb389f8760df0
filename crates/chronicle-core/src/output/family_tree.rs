//! Family tree rendering from a dynasty's founder.

use std::collections::HashSet;
use std::fmt::Write;

use crate::components::dynasty::Dynasty;
use crate::components::person::{Person, PersonId, Roster};

pub fn render_family_tree(dynasty: &Dynasty, roster: &Roster) -> String {
    let mut out = format!("Family tree of {}:\n", dynasty.name);
    let mut shown = HashSet::new();
    render_person(dynasty.founder, 0, roster, &mut shown, &mut out);
    out
}

fn describe(person: &Person) -> String {
    let status = if person.is_alive() { "alive" } else { "†" };
    format!(
        "{} {} ({}, {})",
        person.gender.symbol(),
        person.name,
        status,
        person.lifespan()
    )
}

fn render_person(
    id: PersonId,
    level: usize,
    roster: &Roster,
    shown: &mut HashSet<PersonId>,
    out: &mut String,
) {
    let Some(person) = roster.get(id) else {
        return;
    };
    if !shown.insert(id) {
        return;
    }

    let branch = if level > 0 { "├── " } else { "" };
    let crown = if person.was_monarch { "♛ " } else { "" };
    let mut line = format!("{}{}{}{}", "  ".repeat(level), branch, crown, describe(person));

    let partners: Vec<String> = person
        .partners
        .iter()
        .filter_map(|partner| roster.get(*partner))
        .map(describe)
        .collect();
    if !partners.is_empty() {
        line.push_str(" ⚭ ");
        line.push_str(&partners.join(", "));
    }
    let _ = writeln!(out, "{}", line);

    for child in &person.children {
        render_person(*child, level + 1, roster, shown, out);
    }
}
