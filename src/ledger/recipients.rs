use crate::parser::percentile::Percentile;
use crate::parser::records::Amount;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::RoundingStrategy;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A recipient group: one committee, one donor zip code, one year.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RecipientId {
    pub cmte_id: String,
    pub zip_code: String,
    pub year: i32,
}

/// Running statistics after a repeat donation was added to a group.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PercentileReport {
    pub percentile: i64,
    pub total_amount: i64,
    pub total_count: usize,
}

/// All repeat donations received by one recipient group.
///
/// The amounts are split around the current nearest-rank position: `lower` holds
/// the `rank` smallest amounts (max-heap), `upper` the rest (min-heap). Every amount
/// in `lower` is `<=` every amount in `upper`, so the percentile is the top of
/// `lower`. Both insertion and lookup are logarithmic in the group size.
#[derive(Debug, Clone, Default)]
pub struct RecipientGroup {
    lower: BinaryHeap<Amount>,
    upper: BinaryHeap<Reverse<Amount>>,
    pub total_amount: Amount,
    pub total_count: usize,
}

impl RecipientGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// adds `amount` to the group and updates the totals
    pub fn add(&mut self, amount: Amount) {
        match self.lower.peek() {
            Some(&top) if amount <= top => self.lower.push(amount),
            _ => self.upper.push(Reverse(amount)),
        }
        self.total_amount = self.total_amount.saturating_add(amount);
        self.total_count += 1;
    }

    /// Value at the nearest-rank position for `percentile`, or `None` for an empty group.
    /// Moves amounts between the two halves until `lower` holds exactly `rank` of them.
    pub fn percentile_value(&mut self, percentile: Percentile) -> Option<Amount> {
        if self.total_count == 0 {
            return None;
        }
        let rank = percentile.ordinal_rank(self.total_count);
        while self.lower.len() > rank {
            let moved = self.lower.pop()?;
            self.upper.push(Reverse(moved));
        }
        while self.lower.len() < rank {
            let Reverse(moved) = self.upper.pop()?;
            self.lower.push(moved);
        }
        self.lower.peek().copied()
    }

    /// all amounts of the group in ascending order
    #[cfg(test)]
    pub fn sorted_amounts(&self) -> Vec<Amount> {
        let mut amounts = self.lower.clone().into_sorted_vec();
        let mut upper: Vec<Amount> = self.upper.iter().map(|Reverse(a)| *a).collect();
        upper.sort();
        amounts.extend(upper);
        amounts
    }
}

/// Represents every recipient group seen so far. Map from group id to its donations.
#[derive(Debug, Clone, Default)]
pub struct RecipientAggregator {
    pub state: HashMap<RecipientId, RecipientGroup>,
}

impl RecipientAggregator {
    pub fn new() -> Self {
        RecipientAggregator {
            state: HashMap::new(),
        }
    }

    /// Adds a repeat donation to its group, creating the group on first use,
    /// and reports the group's running percentile and totals.
    pub fn add_and_query(
        &mut self,
        recipient: RecipientId,
        amount: Amount,
        percentile: Percentile,
    ) -> PercentileReport {
        debug_assert!((0.0..=1.0).contains(&percentile.fraction()));
        let group = self.state.entry(recipient).or_insert_with(RecipientGroup::new);
        group.add(amount);
        // the group holds at least the amount just added
        let value = group.percentile_value(percentile).unwrap_or(amount);
        PercentileReport {
            percentile: round_half_even(value),
            total_amount: round_half_even(group.total_amount),
            total_count: group.total_count,
        }
    }

    #[cfg(test)]
    pub fn get(&self, recipient: &RecipientId) -> Option<&RecipientGroup> {
        self.state.get(recipient)
    }

    /// number of recipient groups
    pub fn len(&self) -> usize {
        self.state.len()
    }
}

/// Rounds to the nearest integer, ties to the even neighbour (2.5 -> 2, 3.5 -> 4).
/// Saturates at the bounds of `i64`.
pub fn round_half_even(x: Amount) -> i64 {
    let rounded = x.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
