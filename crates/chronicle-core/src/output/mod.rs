//! Output Module
//!
//! Text rendering, entry filtering, and family trees.

pub mod family_tree;
pub mod filter;
pub mod text;

pub use family_tree::render_family_tree;
pub use filter::EventFilter;
pub use text::{render_entry, render_year};
