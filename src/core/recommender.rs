use chrono::{DateTime, DurationRound, Local, TimeDelta};
use tracing::{debug, instrument};

use crate::{
    core::{ApplianceCalculations, Error},
    quantity::cost::Cost,
};

/// Snapshot of the recommendation at the bucketed current time.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LiveRecommendation {
    pub current_time: DateTime<Local>,
    pub current_price: Cost,

    /// Next known start time at or after now.
    pub next_low_price_time: DateTime<Local>,
    pub next_low_price: Cost,
    pub diff_now_and_next_low: Cost,

    /// Cheapest start time at or after now.
    pub cheapest_start_time: DateTime<Local>,
    pub cheapest_start_price: Cost,

    /// Whole hours to wait before starting.
    pub delay_hours: i64,
    pub delay_hours_price: Cost,
    pub diff_now_and_delay: Cost,
}

impl LiveRecommendation {
    #[must_use]
    pub fn delay_hours_time(&self) -> DateTime<Local> {
        self.current_time + TimeDelta::hours(self.delay_hours)
    }
}

impl ApplianceCalculations {
    /// Truncate the time to the cost map lookup key: the top of the hour for resolutions above a
    /// minute, the top of the minute otherwise.
    ///
    /// Keeps the offset of `now`, so a repeated wall-clock hour maps onto its own key.
    pub fn bucket(&self, now: DateTime<Local>) -> Result<DateTime<Local>, Error> {
        let step =
            if self.resolution_seconds > 60 { TimeDelta::hours(1) } else { TimeDelta::minutes(1) };
        now.duration_trunc(step).map_err(|_| Error::TimeNotFound(now))
    }

    #[instrument(skip_all, fields(now = %now))]
    pub fn recommend(&self, now: DateTime<Local>) -> Result<LiveRecommendation, Error> {
        let current_time = self.bucket(now)?;
        let current_price =
            self.cost_map.get(current_time).ok_or(Error::TimeNotFound(current_time))?;

        // The scan yields the first data point at or after now, which is the current one:
        let (next_low_price_time, next_low_price) = self
            .cost_map
            .by_time_since(current_time)
            .next()
            .ok_or(Error::TimeNotFound(current_time))?;

        let (cheapest_start_time, cheapest_start_price) = self
            .cost_map
            .by_price()
            .iter()
            .copied()
            .find(|(start_time, _)| *start_time >= current_time)
            .ok_or(Error::TimeNotFound(current_time))?;

        let hours_until_last_start = (self.latest_start_time - current_time).num_hours();
        if hours_until_last_start <= 0 {
            return Err(Error::NoDelayWindow {
                now: current_time,
                latest_start: self.latest_start_time,
            });
        }

        let mut best_delay: Option<(i64, Cost)> = None;
        for delay_hours in 0..hours_until_last_start {
            let start_time = current_time + TimeDelta::hours(delay_hours);
            let price = self.cost_map.get(start_time).ok_or(Error::TimeNotFound(start_time))?;
            if best_delay.is_none_or(|(_, best_price)| price < best_price) {
                best_delay = Some((delay_hours, price));
            }
        }
        let (delay_hours, delay_hours_price) = best_delay.ok_or(Error::NoDelayWindow {
            now: current_time,
            latest_start: self.latest_start_time,
        })?;

        let recommendation = LiveRecommendation {
            current_time,
            current_price,
            next_low_price_time,
            next_low_price,
            diff_now_and_next_low: (current_price - next_low_price).abs(),
            cheapest_start_time,
            cheapest_start_price,
            delay_hours,
            delay_hours_price,
            diff_now_and_delay: (current_price - delay_hours_price).abs(),
        };
        debug!(
            %current_price,
            delay_hours,
            %delay_hours_price,
            %cheapest_start_time,
            "recommended",
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{ApplianceProfile, PriceSeries, ProfileMatcher, local_midnight},
        quantity::{energy::KilowattHours, rate::KilowattHourRate},
    };

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn midnight() -> DateTime<Local> {
        local_midnight(as_of()).unwrap()
    }

    fn calculate(resolution_seconds: u32, usage: &[f64], prices: &[f64]) -> ApplianceCalculations {
        let profile = ApplianceProfile::try_new(
            resolution_seconds,
            usage.iter().copied().map(KilowattHours::from).collect(),
        )
        .unwrap();
        let prices =
            PriceSeries::try_new(prices.iter().copied().map(KilowattHourRate::from).collect(), None)
                .unwrap();
        ProfileMatcher::builder()
            .profile(&profile)
            .prices(&prices)
            .as_of(as_of())
            .build()
            .run()
            .unwrap()
    }

    #[test]
    fn test_recommend() {
        // Costs by the start hour: 5, 4, 6, 1, 3, 2.
        let calculations = calculate(3600, &[1.0], &[5.0, 4.0, 6.0, 1.0, 3.0, 2.0]);
        let now = midnight() + TimeDelta::minutes(61) + TimeDelta::seconds(13);

        let recommendation = calculations.recommend(now).unwrap();
        assert_eq!(recommendation.current_time, midnight() + TimeDelta::hours(1));
        assert_abs_diff_eq!(recommendation.current_price.0, 4.0);

        assert_eq!(recommendation.next_low_price_time, recommendation.current_time);
        assert_abs_diff_eq!(recommendation.next_low_price.0, 4.0);
        assert_abs_diff_eq!(recommendation.diff_now_and_next_low.0, 0.0);

        assert_eq!(recommendation.cheapest_start_time, midnight() + TimeDelta::hours(3));
        assert_abs_diff_eq!(recommendation.cheapest_start_price.0, 1.0);

        // Four hours until the latest start, so the delays 0..4 are considered:
        assert_eq!(recommendation.delay_hours, 2);
        assert_eq!(recommendation.delay_hours_time(), midnight() + TimeDelta::hours(3));
        assert_abs_diff_eq!(recommendation.delay_hours_price.0, 1.0);
        assert_abs_diff_eq!(recommendation.diff_now_and_delay.0, 3.0);
    }

    #[test]
    fn test_delay_excludes_latest_start() {
        // Costs by the start hour: 3, 2, 1.
        let calculations = calculate(3600, &[1.0], &[3.0, 2.0, 1.0]);
        let recommendation = calculations.recommend(midnight()).unwrap();
        assert_eq!(recommendation.delay_hours, 1);
        assert_abs_diff_eq!(recommendation.delay_hours_price.0, 2.0);
        assert_eq!(recommendation.cheapest_start_time, midnight() + TimeDelta::hours(2));
    }

    #[test]
    fn test_delay_ties_prefer_shortest() {
        let calculations = calculate(3600, &[1.0], &[2.0, 1.0, 1.0, 1.0, 5.0]);
        let recommendation = calculations.recommend(midnight()).unwrap();
        assert_eq!(recommendation.delay_hours, 1);
    }

    #[test]
    fn test_minute_bucketing() {
        let calculations = calculate(60, &[1.0, 1.0], &[1.0, 2.0, 3.0]);
        let now = midnight() + TimeDelta::minutes(59) + TimeDelta::seconds(59);
        let recommendation = calculations.recommend(now).unwrap();
        assert_eq!(recommendation.current_time, midnight() + TimeDelta::minutes(59));
        assert_abs_diff_eq!(recommendation.current_price.0, 3.0);
    }

    #[test]
    fn test_hour_bucketing() {
        let calculations = calculate(900, &[1.0], &[1.0, 2.0, 3.0]);
        let now = midnight() + TimeDelta::minutes(50);
        assert_eq!(calculations.bucket(now).unwrap(), midnight());
    }

    #[test]
    fn test_bucketing_drops_subseconds() {
        let calculations = calculate(60, &[1.0], &[1.0, 2.0]);
        let now = midnight() + TimeDelta::minutes(3) + TimeDelta::nanoseconds(1_500);
        let bucket = calculations.bucket(now).unwrap();
        assert_eq!(bucket, midnight() + TimeDelta::minutes(3));
        assert_eq!(bucket.offset(), now.offset());
    }

    #[test]
    fn test_no_delay_window_at_latest_start() {
        let calculations = calculate(3600, &[2.0, 3.0, -1.0], &[10.0, 1.0, 1.0, 10.0]);
        let result = calculations.recommend(calculations.latest_start_time);
        assert_eq!(
            result,
            Err(Error::NoDelayWindow {
                now: calculations.latest_start_time,
                latest_start: calculations.latest_start_time,
            }),
        );
    }

    #[test]
    fn test_no_delay_window_within_last_hour() {
        let calculations = calculate(900, &[1.0], &[1.0, 2.0]);
        let result = calculations.recommend(midnight() + TimeDelta::minutes(70));
        assert!(matches!(result, Err(Error::NoDelayWindow { .. })));
    }

    #[test]
    fn test_time_not_found_before_horizon() {
        let calculations = calculate(3600, &[1.0], &[1.0, 2.0, 3.0]);
        let now = midnight() - TimeDelta::hours(1);
        assert_eq!(calculations.recommend(now), Err(Error::TimeNotFound(now)));
    }

    #[test]
    fn test_time_not_found_after_horizon() {
        let calculations = calculate(3600, &[1.0], &[1.0, 2.0, 3.0]);
        let now = midnight() + TimeDelta::hours(5);
        assert_eq!(calculations.recommend(now), Err(Error::TimeNotFound(now)));
    }

    #[test]
    fn test_recommend_is_repeatable() {
        let calculations = calculate(3600, &[1.0, 0.5], &[5.0, 4.0, 6.0, 1.0, 3.0, 2.0]);
        let now = midnight() + TimeDelta::minutes(30);
        assert_eq!(calculations.recommend(now), calculations.recommend(now));
    }
}
