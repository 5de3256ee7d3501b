//! Main menu entries of the interactive converter.
//!
//! Entries are chosen by number; `Display` gives the label shown next to it.
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum MenuChoice {
    #[strum(serialize = "1", to_string = "Convert from one currency to another")]
    Convert,
    #[strum(serialize = "2", to_string = "Search currency codes")]
    Search,
    #[strum(serialize = "3", to_string = "Refresh rates")]
    Refresh,
    #[strum(serialize = "4", to_string = "Exit")]
    Exit,
}

impl MenuChoice {
    /// Parses the number typed at the menu prompt.
    pub fn from_input(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }

    /// Menu lines, e.g. `1. Convert from one currency to another`.
    pub fn lines() -> Vec<String> {
        MenuChoice::iter()
            .enumerate()
            .map(|(i, choice)| format!("{}. {}", i + 1, choice))
            .collect()
    }

    /// Number of entries, for the invalid-choice hint.
    pub fn count() -> usize {
        MenuChoice::iter().count()
    }
}
