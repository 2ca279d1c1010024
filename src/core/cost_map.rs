use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use itertools::Itertools;

use crate::{core::series::Series, quantity::cost::Cost};

/// Total run cost for every feasible start time.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMap {
    by_time: BTreeMap<DateTime<Local>, Cost>,

    /// Ascending cost, ties resolved by the earlier start.
    by_price: Series<DateTime<Local>, Cost>,
}

impl CostMap {
    /// Build both views from chronologically ordered start times.
    pub fn new(costs: Series<DateTime<Local>, Cost>) -> Self {
        let by_time: BTreeMap<_, _> = costs.iter().copied().collect();
        let by_price = costs.into_iter().sorted_by_key(|(_, cost)| *cost).collect_vec();
        Self { by_time, by_price }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }

    #[must_use]
    pub fn get(&self, start_time: DateTime<Local>) -> Option<Cost> {
        self.by_time.get(&start_time).copied()
    }

    /// Iterate in chronological order.
    pub fn by_time(&self) -> impl DoubleEndedIterator<Item = (DateTime<Local>, Cost)> + '_ {
        self.by_time.iter().map(|(start_time, cost)| (*start_time, *cost))
    }

    /// Iterate in chronological order starting at the specified time, inclusive.
    pub fn by_time_since(
        &self,
        since: DateTime<Local>,
    ) -> impl Iterator<Item = (DateTime<Local>, Cost)> + '_ {
        self.by_time.range(since..).map(|(start_time, cost)| (*start_time, *cost))
    }

    /// Iterate from the cheapest to the most expensive start.
    #[must_use]
    pub fn by_price(&self) -> &[(DateTime<Local>, Cost)] {
        &self.by_price
    }

    #[must_use]
    pub fn first_start_time(&self) -> Option<DateTime<Local>> {
        self.by_time.first_key_value().map(|(start_time, _)| *start_time)
    }

    #[must_use]
    pub fn last_start_time(&self) -> Option<DateTime<Local>> {
        self.by_time.last_key_value().map(|(start_time, _)| *start_time)
    }

    /// Position of the start time in the price-ordered view, zero being the cheapest.
    #[must_use]
    pub fn rank_of(&self, start_time: DateTime<Local>) -> Option<usize> {
        self.by_price.iter().position(|(time, _)| *time == start_time)
    }
}
