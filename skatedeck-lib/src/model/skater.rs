//! Skater record

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::Money;
use super::Stance;

/// A skater record from the roster database.
///
/// Records are created and deleted through the store; the browsing views
/// never mutate individual field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skater {
    /// Unique identifier.
    pub id: Uuid,
    /// Full name.
    pub name: String,
    /// Contact email. Also the default sort column for the roster.
    pub email: String,
    /// Age in years.
    pub age: u8,
    /// Foot stance.
    pub stance: Stance,
    /// Free-form trick/stat blurb.
    pub stats: String,
    /// Price of the skater's current deck.
    pub deck_price: Money,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Skater {
    /// Creates a new record with a fresh id, stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        age: u8,
        stance: Stance,
        stats: impl Into<String>,
        deck_price: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            age,
            stance,
            stats: stats.into(),
            deck_price,
            created_at: Utc::now(),
        }
    }
}
