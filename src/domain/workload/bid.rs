//! Synthetic bid records produced by the workload generator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RecordId, Timestamp};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Ken", "Barbara", "Dennis", "Margaret", "Edsger", "Frances", "Alan",
    "Radia", "Leslie", "Donald", "Hedy", "John",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Torvalds", "Thompson", "Liskov", "Ritchie", "Hamilton", "Dijkstra",
    "Allen", "Turing", "Perlman", "Lamport", "Knuth", "Lamarr", "Backus",
];

const ADJECTIVES: &[&str] = &[
    "Vintage", "Signed", "Refurbished", "Limited", "Handmade", "Rare", "Mint", "Oversized",
];

const ITEMS: &[&str] = &[
    "Mechanical Keyboard", "Gopher Plush", "Cockroach Figurine", "Server Rack", "Laptop Sticker",
    "Conference Hoodie", "Database Textbook", "Coffee Mug", "Arcade Cabinet",
];

const REGIONS: &[&str] = &["us-east1", "us-west2", "europe-west1", "asia-southeast1"];

/// Smallest bid, in cents.
pub const MIN_AMOUNT_CENTS: i64 = 100;
/// Largest bid, in cents.
pub const MAX_AMOUNT_CENTS: i64 = 500_000;

/// One synthetic auction bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: RecordId,
    pub bidder: String,
    pub item: String,
    pub amount_cents: i64,
    pub region: String,
    pub created_at: Timestamp,
}

impl Bid {
    /// Fakes a bid from the built-in word lists.
    pub fn fake<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: RecordId::new(),
            bidder: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
            item: format!("{} {}", pick(rng, ADJECTIVES), pick(rng, ITEMS)),
            amount_cents: rng.gen_range(MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS),
            region: pick(rng, REGIONS).to_string(),
            created_at: Timestamp::now(),
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fake_bid_fields_come_from_word_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let bid = Bid::fake(&mut rng);
            let (first, last) = bid.bidder.split_once(' ').unwrap();
            assert!(FIRST_NAMES.contains(&first));
            assert!(LAST_NAMES.contains(&last));
            assert!(REGIONS.contains(&bid.region.as_str()));
            assert!(ITEMS.iter().any(|item| bid.item.ends_with(item)));
        }
    }

    #[test]
    fn fake_bid_amount_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let bid = Bid::fake(&mut rng);
            assert!((MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(&bid.amount_cents));
        }
    }

    #[test]
    fn fake_bids_get_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_ne!(Bid::fake(&mut rng).id, Bid::fake(&mut rng).id);
    }
}
