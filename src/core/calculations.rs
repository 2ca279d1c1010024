use chrono::{DateTime, Local};

use crate::{
    core::{CostMap, Error, Warning},
    quantity::cost::Cost,
};

/// Summary of the cost map, recomputed whenever the price series changes.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ApplianceCalculations {
    pub cost_map: CostMap,
    pub lowest_price: Cost,
    pub lowest_price_time: DateTime<Local>,
    pub highest_price: Cost,
    pub highest_price_time: DateTime<Local>,
    pub price_difference: Cost,

    /// Last start time at which the whole run still fits into the known prices.
    pub latest_start_time: DateTime<Local>,

    pub resolution_seconds: u32,
    pub warnings: Vec<Warning>,
}

impl ApplianceCalculations {
    pub fn try_new(
        cost_map: CostMap,
        resolution_seconds: u32,
        warnings: Vec<Warning>,
    ) -> Result<Self, Error> {
        let empty = || Error::InsufficientHorizon { n_buckets: 0, n_usage: 0 };

        // Chronological order, so that the earliest start wins on ties:
        let (lowest_price_time, lowest_price) = cost_map
            .by_time()
            .min_by_key(|(_, cost)| *cost)
            .ok_or_else(empty)?;
        let (highest_price_time, highest_price) = cost_map
            .by_time()
            .max_by(|(lhs_time, lhs_cost), (rhs_time, rhs_cost)| {
                lhs_cost.cmp(rhs_cost).then_with(|| rhs_time.cmp(lhs_time))
            })
            .ok_or_else(empty)?;
        let latest_start_time = cost_map.last_start_time().ok_or_else(empty)?;
        Ok(Self {
            cost_map,
            lowest_price,
            lowest_price_time,
            highest_price,
            highest_price_time,
            price_difference: highest_price - lowest_price,
            latest_start_time,
            resolution_seconds,
            warnings,
        })
    }
}
