//! Derived rating summaries.
//!
//! Aggregates are always rebuilt from a [`StarDistribution`] read out of the
//! ratings table, never patched incrementally. An overwrite of an existing vote
//! therefore cannot leave the average out of step with the counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use super::value_objects::RatingValue;

/// Per-star vote counts for one material. Index 0 holds one-star votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarDistribution {
    counts: [i64; 5],
}

impl StarDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a distribution from raw rating values, skipping anything outside 1..=5.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        let mut distribution = Self::new();
        for value in values {
            distribution.add(value, 1);
        }
        distribution
    }

    /// Adds `count` votes for `star`. Returns `false` and changes nothing when
    /// `star` is not a valid rating.
    pub fn add(&mut self, star: i32, count: i64) -> bool {
        match Self::index(star) {
            Some(i) => {
                self.counts[i] += count;
                true
            }
            None => {
                tracing::warn!(star, count, "ignoring out-of-range rating bucket");
                false
            }
        }
    }

    pub fn count(&self, star: i32) -> i64 {
        Self::index(star).map_or(0, |i| self.counts[i])
    }

    pub fn total(&self) -> i64 {
        self.counts.iter().sum()
    }

    /// Σ star × count.
    pub fn weighted_sum(&self) -> i64 {
        self.counts
            .iter()
            .zip(RatingValue::MIN..)
            .map(|(count, star)| count * i64::from(star))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All five buckets, zero counts included.
    pub fn to_map(&self) -> BTreeMap<u8, i64> {
        (1u8..=5).zip(self.counts).collect()
    }

    fn index(star: i32) -> Option<usize> {
        if (RatingValue::MIN..=RatingValue::MAX).contains(&star) {
            usize::try_from(star - RatingValue::MIN).ok()
        } else {
            None
        }
    }
}

/// Rating summary returned by the read and write paths.
///
/// `total_ratings` always equals the sum of `distribution`, and
/// `average_rating` is `Σ star*count / total` rounded to one decimal, or `0.0`
/// when nobody has rated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatingAggregate {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub distribution: BTreeMap<u8, i64>,
    /// The caller's own rating, when a caller is known and has rated.
    pub user_rating: Option<i32>,
}

impl RatingAggregate {
    pub fn empty() -> Self {
        Self::from_distribution(&StarDistribution::new())
    }

    pub fn from_distribution(distribution: &StarDistribution) -> Self {
        let total = distribution.total();
        let average_rating = if total == 0 {
            0.0
        } else {
            round_to_one_decimal(distribution.weighted_sum() as f64 / total as f64)
        };

        Self {
            average_rating,
            total_ratings: total,
            distribution: distribution.to_map(),
            user_rating: None,
        }
    }

    pub fn with_user_rating(mut self, user_rating: Option<i32>) -> Self {
        self.user_rating = user_rating;
        self
    }
}

impl Default for RatingAggregate {
    fn default() -> Self {
        Self::empty()
    }
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
