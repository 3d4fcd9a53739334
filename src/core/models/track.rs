//! Track and year models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic track (specialization). The set is fixed at build time; the
/// per-track year tables live in the rule-table data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Mathematics
    Math,
    /// Physics
    Physics,
    /// Computer science
    Info,
    /// Natural sciences
    Sciences,
    /// Arabic literature
    Lettres,
    /// Music (permanently unsupported curriculum)
    Musique,
}

impl Track {
    /// All tracks, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Math,
        Self::Physics,
        Self::Info,
        Self::Sciences,
        Self::Lettres,
        Self::Musique,
    ];

    /// Stable identifier used in the rule tables and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Physics => "physics",
            Self::Info => "info",
            Self::Sciences => "sciences",
            Self::Lettres => "lettres",
            Self::Musique => "musique",
        }
    }

    /// Parse a track from user input. Accepts the table identifier plus the
    /// spelled-out names shown in menus (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "math" | "maths" | "mathematics" => Some(Self::Math),
            "physics" | "physique" => Some(Self::Physics),
            "info" | "computer science" | "informatique" => Some(Self::Info),
            "sciences" | "natural sciences" => Some(Self::Sciences),
            "lettres" | "arabic literature" => Some(Self::Lettres),
            "musique" | "music" => Some(Self::Musique),
            _ => None,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Sub-level qualifier for years that carry two alternative curricula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// The "+4" curriculum
    #[serde(rename = "+4")]
    PlusFour,
    /// The "+5" curriculum
    #[serde(rename = "+5")]
    PlusFive,
}

impl Variant {
    /// Canonical rendering ("+4" / "+5").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlusFour => "+4",
            Self::PlusFive => "+5",
        }
    }

    /// Parse a variant from user input ("+4", "4", "+5", "5").
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "+4" | "4" => Some(Self::PlusFour),
            "+5" | "5" => Some(Self::PlusFive),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A track-scoped curriculum stage: year number 1-5, optionally qualified
/// by a sub-level variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Year {
    /// Nominal year number (1-5)
    pub number: u8,
    /// Optional sub-level qualifier
    pub variant: Option<Variant>,
}

impl Year {
    /// A plain year without a sub-level.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self {
            number,
            variant: None,
        }
    }

    /// A year qualified by a sub-level variant.
    #[must_use]
    pub const fn with_variant(number: u8, variant: Variant) -> Self {
        Self {
            number,
            variant: Some(variant),
        }
    }

    /// Level label as shown to users, e.g. "math4 (+5)".
    #[must_use]
    pub fn label(&self, track: Track) -> String {
        match self.variant {
            Some(v) => format!("{}{} ({v})", track.id(), self.number),
            None => format!("{}{}", track.id(), self.number),
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Some(v) => write!(f, "{} ({v})", self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

/// Availability of a (track, year) rule table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearStatus {
    /// The year has a populated subject table.
    #[default]
    Active,
    /// Recognized but its table has not been curated yet.
    #[serde(rename = "pending")]
    NotYetAvailable,
    /// Will never be supported.
    #[serde(rename = "unsupported")]
    PermanentlyUnsupported,
}

impl YearStatus {
    /// User-facing availability message, distinct per status.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Active => "available",
            Self::NotYetAvailable => "not available yet, please wait for a future update",
            Self::PermanentlyUnsupported => "not supported",
        }
    }
}
