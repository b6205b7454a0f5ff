//! Core domain types for the cultural zodiac.
//!
//! Everything here serializes to the JSON shape the web client expects, so
//! field names are part of the wire contract.

use serde::{Deserialize, Serialize};

// =============================================================================
// Signs
// =============================================================================

/// One fixed, named taste archetype in the catalog.
///
/// Signs are loaded once at startup and shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRecord {
    /// Unique identity of the sign
    pub name: String,
    pub emoji: String,
    /// Lowercase tags describing the sign's vibe
    pub keywords: Vec<String>,
    pub mood: String,
    pub era: String,
    /// How unhinged the sign is, from 1 to 5
    pub absurdity: u8,
    pub rare: bool,
    pub description: String,
    /// Thematic grouping shared by several signs
    pub constellation: String,
    /// Free-text nod to another sign. Not validated as a reference.
    pub compatibility: String,
}

// =============================================================================
// Request-side types
// =============================================================================

/// A single thing the user says they love.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteInput {
    pub name: String,
    /// Category hint such as "movie", "game" or "artist"
    #[serde(rename = "type")]
    pub kind: String,
}

impl TasteInput {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

// =============================================================================
// Result types
// =============================================================================

/// Companion persona bundled with a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteTwin {
    pub name: String,
    pub emoji: String,
    pub bio: String,
}

impl TasteTwin {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            bio: bio.into(),
        }
    }
}

/// The final answer for one request: a sign plus the narrative generated
/// for this particular set of tastes.
///
/// The sign's fields are flattened so the JSON object reads as one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub sign: SignRecord,
    pub prophecy: String,
    pub symbolism: String,
    pub taste_tags: Vec<String>,
    pub taste_twin: TasteTwin,
}

impl ResultRecord {
    /// Build a result for `sign` with request-specific narrative fields.
    pub fn from_sign(
        sign: &SignRecord,
        prophecy: impl Into<String>,
        symbolism: impl Into<String>,
        taste_tags: Vec<String>,
        taste_twin: TasteTwin,
    ) -> Self {
        Self {
            sign: sign.clone(),
            prophecy: prophecy.into(),
            symbolism: symbolism.into(),
            taste_tags,
            taste_twin,
        }
    }

    pub fn name(&self) -> &str {
        &self.sign.name
    }
}
