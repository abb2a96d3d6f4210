//! Stance type

use serde::Deserialize;
use serde::Serialize;

/// Foot stance of a skater.
///
/// The stance set is closed: query parameters and stored values outside it
/// are treated as absent rather than round-tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// Pushes with the front foot.
    Mongo,
    /// Rides right-foot-forward.
    Goofy,
}

impl Stance {
    /// All known stances, in display order.
    pub const ALL: [Stance; 2] = [Stance::Mongo, Stance::Goofy];

    /// Returns the lowercase wire form of this stance.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Mongo => "mongo",
            Stance::Goofy => "goofy",
        }
    }

    /// Parses a stance from its wire form. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Stance> {
        match s {
            "mongo" => Some(Stance::Mongo),
            "goofy" => Some(Stance::Goofy),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
