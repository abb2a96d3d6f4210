//! Sample roster generation for first-run seeding.

use chrono::Duration;
use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use crate::model::Money;
use crate::model::Skater;
use crate::model::Stance;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carla", "Dmitri", "Elena", "Felix", "Greta", "Hugo", "Ines", "Jonas",
    "Kirra", "Leo", "Mara", "Nico", "Odette", "Pablo", "Quinn", "Rosa", "Sven", "Tessa",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Burton", "Caballero", "Dyrdek", "Evans", "Fischer", "Gonzales", "Hawk",
    "Ishikawa", "Janssen", "Koston", "Lutzka", "Mullen", "Nyjah", "Ortiz", "Petrov",
    "Reynolds", "Song", "Thomas", "Vallely",
];

const TRICKS: &[&str] = &[
    "kickflip", "heelflip", "ollie", "50-50 grind", "boardslide", "tre flip", "nollie",
    "manual", "rock to fakie", "shove-it",
];

/// Generates `count` sample skaters with randomized but plausible fields.
///
/// Emails are unique within one call; everything else may repeat.
pub fn sample(count: usize) -> Vec<Skater> {
    let mut rng = rand::rng();
    let now = Utc::now();

    (0..count)
        .map(|i| {
            let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Alex");
            let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Doe");
            let stance = if rng.random_bool(0.5) {
                Stance::Mongo
            } else {
                Stance::Goofy
            };
            let tricks: Vec<&str> = (0..rng.random_range(1..=3))
                .filter_map(|_| TRICKS.choose(&mut rng).copied())
                .collect();

            Skater {
                id: Uuid::new_v4(),
                name: format!("{} {}", first, last),
                email: format!(
                    "{}.{}{}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    i
                ),
                age: rng.random_range(8..=50),
                stance,
                stats: tricks.join(", "),
                deck_price: Money::from_cents(rng.random_range(2_500..15_000)),
                created_at: now - Duration::days(rng.random_range(0..365)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_emails_are_unique() {
        let skaters = sample(100);
        assert_eq!(skaters.len(), 100);

        let mut emails: Vec<_> = skaters.iter().map(|s| s.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 100);
    }
}
