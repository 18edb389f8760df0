//! Plain-text chronicle rendering.

use chronicle_events::ChronicleEntry;

use super::filter::EventFilter;

/// Renders one year's entries, or `None` when the filter leaves nothing
pub fn render_year(year: i32, entries: &[ChronicleEntry], filter: &EventFilter) -> Option<String> {
    let lines: Vec<String> = filter.apply(entries).map(render_entry).collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("Year {}\n{}", year, lines.join("\n")))
}

pub fn render_entry(entry: &ChronicleEntry) -> String {
    match entry {
        ChronicleEntry::World(event) => format!("  * {}", event),
        ChronicleEntry::Dynasty(event) => format!("  [{}] {}", event.dynasty(), event),
    }
}
