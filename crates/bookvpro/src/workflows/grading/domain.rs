use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse label for how crowded a title's market is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Grade {
    /// No competing sellers and no catalog card.
    A,
    /// Crowded, already catalogued, or the lookup failed.
    #[default]
    B,
    /// Open market but too little search demand.
    C,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signals scraped or fetched for a single title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchSignal {
    pub seller_count: u32,
    pub has_card: bool,
    pub search_volume: Option<u64>,
}

/// One row of grading output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationRecord {
    pub title: String,
    pub search_volume: u64,
    pub seller_count: u32,
    pub has_card: bool,
    pub grade: Grade,
    pub link: String,
}

/// Link used when no result page could be fetched.
pub const UNAVAILABLE_LINK: &str = "#";

impl ClassificationRecord {
    /// Safe record for a title whose lookup failed.
    pub fn fallback(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            search_volume: 0,
            seller_count: 1,
            has_card: false,
            grade: Grade::B,
            link: UNAVAILABLE_LINK.to_string(),
        }
    }
}

impl Default for ClassificationRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            search_volume: 0,
            seller_count: 0,
            has_card: false,
            grade: Grade::default(),
            link: UNAVAILABLE_LINK.to_string(),
        }
    }
}
