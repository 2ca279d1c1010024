use std::iter::successors;

use bon::Builder;
use chrono::{DateTime, Local, MappedLocalTime, NaiveDate, NaiveTime, TimeDelta};
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::{
        ApplianceCalculations,
        ApplianceProfile,
        CostMap,
        Error,
        PriceSeries,
        Warning,
        series::{Correlate, Series},
    },
    quantity::cost::Cost,
};

/// Matches the appliance energy profile against the prices for every possible start time.
#[derive(Builder)]
pub struct ProfileMatcher<'a> {
    profile: &'a ApplianceProfile,
    prices: &'a PriceSeries,

    /// Day whose local midnight corresponds to the first price.
    as_of: NaiveDate,
}

impl ProfileMatcher<'_> {
    #[instrument(
        name = "Matching the profile…",
        skip_all,
        fields(
            as_of = %self.as_of,
            resolution_seconds = self.profile.resolution_seconds(),
            n_usage = self.profile.energy_usage().len(),
            n_prices = self.prices.len(),
        ),
    )]
    pub fn run(self) -> Result<ApplianceCalculations, Error> {
        let resolution_seconds = self.profile.resolution_seconds();
        let repeat = self.profile.repeat_factor();

        let mut warnings = Vec::new();
        if !self.profile.is_hour_aligned() {
            warn!(repeat, "the resolution does not evenly divide an hour, prices are truncated");
            warnings.push(Warning::ResolutionMismatch { resolution_seconds, repeat });
        }

        let resampled = self.prices.resample(repeat);
        let usage = self.profile.energy_usage();
        if resampled.len() < usage.len() {
            return Err(Error::InsufficientHorizon {
                n_buckets: resampled.len(),
                n_usage: usage.len(),
            });
        }
        debug!(n_buckets = resampled.len(), "resampled");

        let resolution = TimeDelta::seconds(i64::from(resolution_seconds));
        let start_times =
            successors(Some(local_midnight(self.as_of)?), |time| Some(*time + resolution));
        let costs: Series<DateTime<Local>, Cost> =
            start_times.zip(resampled.correlate(usage)).collect_vec();

        let calculations =
            ApplianceCalculations::try_new(CostMap::new(costs), resolution_seconds, warnings)?;
        info!(
            n_starts = calculations.cost_map.len(),
            lowest_price = %calculations.lowest_price,
            lowest_price_time = %calculations.lowest_price_time,
            highest_price = %calculations.highest_price,
            latest_start_time = %calculations.latest_start_time,
            "matched",
        );
        Ok(calculations)
    }
}

/// Local midnight of the day, the earliest one if the clocks were turned back.
pub fn local_midnight(on: NaiveDate) -> Result<DateTime<Local>, Error> {
    let midnight = on.and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local) {
        MappedLocalTime::Single(time) | MappedLocalTime::Ambiguous(time, _) => Ok(time),
        MappedLocalTime::None => Err(Error::NonExistentLocalTime(midnight)),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::{energy::KilowattHours, rate::KilowattHourRate};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn profile(resolution_seconds: u32, usage: &[f64]) -> ApplianceProfile {
        ApplianceProfile::try_new(
            resolution_seconds,
            usage.iter().copied().map(KilowattHours::from).collect(),
        )
        .unwrap()
    }

    fn prices(values: &[f64]) -> PriceSeries {
        PriceSeries::try_new(values.iter().copied().map(KilowattHourRate::from).collect(), None)
            .unwrap()
    }

    fn run(
        profile: &ApplianceProfile,
        prices: &PriceSeries,
    ) -> Result<ApplianceCalculations, Error> {
        ProfileMatcher::builder().profile(profile).prices(prices).as_of(as_of()).build().run()
    }

    #[test]
    fn test_example() {
        let profile = profile(3600, &[2.0, 3.0, -1.0]);
        let calculations = run(&profile, &prices(&[10.0, 1.0, 1.0, 10.0])).unwrap();
        let midnight = local_midnight(as_of()).unwrap();

        let costs = calculations.cost_map.by_time().collect_vec();
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].0, midnight);
        assert_abs_diff_eq!(costs[0].1.0, 18.0);
        assert_eq!(costs[1].0, midnight + TimeDelta::hours(1));
        assert_abs_diff_eq!(costs[1].1.0, -5.0);

        assert_abs_diff_eq!(calculations.lowest_price.0, -5.0);
        assert_eq!(calculations.lowest_price_time, midnight + TimeDelta::hours(1));
        assert_abs_diff_eq!(calculations.highest_price.0, 18.0);
        assert_eq!(calculations.highest_price_time, midnight);
        assert_abs_diff_eq!(calculations.price_difference.0, 23.0);
        assert_eq!(calculations.latest_start_time, midnight + TimeDelta::hours(1));
        assert_eq!(calculations.resolution_seconds, 3600);
        assert!(calculations.warnings.is_empty());
    }

    #[test]
    fn test_number_of_starts() {
        let prices = prices(&[1.0; 24]);
        for n_usage in [1, 5, 60, 24 * 60] {
            let calculations = run(&profile(60, &vec![0.1; n_usage]), &prices).unwrap();
            assert_eq!(calculations.cost_map.len(), 24 * 60 - n_usage + 1);
        }
    }

    #[test]
    fn test_quarter_hours() {
        let calculations =
            run(&profile(900, &[1.0, 1.0, 1.0, 1.0]), &prices(&[4.0, 2.0, 3.0])).unwrap();
        let midnight = local_midnight(as_of()).unwrap();
        assert_eq!(calculations.cost_map.len(), 9);
        assert_eq!(calculations.lowest_price_time, midnight + TimeDelta::hours(1));
        assert_abs_diff_eq!(calculations.lowest_price.0, 8.0);
        assert_eq!(calculations.latest_start_time, midnight + TimeDelta::hours(2));
        assert_eq!(
            calculations.cost_map.get(midnight + TimeDelta::minutes(45)),
            Some(Cost::from(4.0 + 2.0 * 3.0)),
        );
    }

    #[test]
    fn test_price_order_is_stable() {
        let calculations = run(&profile(3600, &[1.0]), &prices(&[2.0, 1.0, 2.0, 1.0])).unwrap();
        let midnight = local_midnight(as_of()).unwrap();
        let hours = calculations
            .cost_map
            .by_price()
            .iter()
            .map(|(time, _)| (*time - midnight).num_hours())
            .collect_vec();
        assert_eq!(hours, [1, 3, 0, 2]);
        assert_eq!(calculations.highest_price_time, midnight);
    }

    #[test]
    fn test_idempotent() {
        let profile = profile(900, &[0.5, 0.7, 0.1]);
        let prices = prices(&[1.264, 1.221, 1.243, 1.234, 0.391, 0.415]);
        assert_eq!(run(&profile, &prices).unwrap(), run(&profile, &prices).unwrap());
    }

    #[test]
    fn test_insufficient_horizon() {
        let result = run(&profile(3600, &[1.0, 1.0, 1.0]), &prices(&[1.0, 1.0]));
        assert_eq!(result, Err(Error::InsufficientHorizon { n_buckets: 2, n_usage: 3 }));
    }

    #[test]
    fn test_resolution_mismatch_warning() {
        let calculations = run(&profile(7, &[1.0]), &prices(&[1.0])).unwrap();
        assert_eq!(
            calculations.warnings,
            [Warning::ResolutionMismatch { resolution_seconds: 7, repeat: 514 }],
        );
        assert_eq!(calculations.cost_map.len(), 514);
    }

    #[test]
    fn test_resolution_longer_than_hour() {
        let result = run(&profile(7200, &[1.0]), &prices(&[1.0, 2.0]));
        assert_eq!(result, Err(Error::InsufficientHorizon { n_buckets: 0, n_usage: 1 }));
    }
}
