use chrono::{DateTime, Local, TimeDelta};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use tracing::{debug, instrument};

use crate::{
    core::{ApplianceDescriptor, ApplianceRecord, Error, series::Differentiate},
    quantity::energy::KilowattHours,
};

/// Cumulative energy meter state, as recorded in a sensor history.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct MeterReading {
    #[serde(rename = "last_changed")]
    pub time: DateTime<Local>,

    /// Sensor histories usually carry the state as a string.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "state")]
    pub total: KilowattHours,
}

impl ApplianceRecord {
    /// Derive the per-bucket energy usage from a recorded appliance run.
    ///
    /// The resolution is the mean interval between the readings, truncated to whole seconds.
    #[instrument(name = "Deriving the profile…", skip_all, fields(n_readings = readings.len()))]
    pub fn from_readings(
        descriptor: ApplianceDescriptor,
        readings: &[MeterReading],
    ) -> Result<Self, Error> {
        let (Some(first), Some(last)) = (readings.first(), readings.last()) else {
            return Err(Error::InvalidProfile("no meter readings".to_owned()));
        };
        if readings.len() < 2 {
            return Err(Error::InvalidProfile("at least two meter readings are needed".to_owned()));
        }
        if !readings.is_sorted_by(|lhs, rhs| lhs.time < rhs.time) {
            return Err(Error::InvalidProfile(
                "meter readings must be in strictly ascending time order".to_owned(),
            ));
        }

        let (intervals, energy_usage): (Vec<TimeDelta>, Vec<KilowattHours>) = readings
            .iter()
            .map(|reading| (reading.time, reading.total))
            .deltas()
            .map(|(time_range, usage)| (time_range.end - time_range.start, usage))
            .unzip();
        if let Some((min, max)) = interval_spread(&intervals) {
            debug!(?min, ?max, "uneven reading intervals");
        }

        let total_duration = last.time - first.time;
        let n_intervals = i32::try_from(intervals.len())
            .map_err(|_| Error::InvalidProfile("too many meter readings".to_owned()))?;
        let resolution = total_duration / n_intervals;
        debug!(?resolution, ?total_duration, "derived");

        Ok(Self {
            appliance_type: descriptor.kind,
            appliance_manufactor: descriptor.manufacturer,
            appliance_model: descriptor.model,
            appliance_mode: descriptor.mode,
            measure_method: descriptor.measure_method,
            duration_in_minutes: total_duration.num_minutes(),
            energy_use_resolution_in_seconds: resolution.num_seconds(),
            energy_usage,
        })
    }
}

/// Shortest and longest intervals, when they differ.
fn interval_spread(intervals: &[TimeDelta]) -> Option<(TimeDelta, TimeDelta)> {
    match intervals.iter().minmax() {
        MinMaxResult::MinMax(min, max) if min != max => Some((*min, *max)),
        _ => None,
    }
}
