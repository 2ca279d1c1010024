use serde::{Deserialize, Serialize};

use crate::{core::Error, quantity::energy::KilowattHours};

pub const SECONDS_PER_HOUR: u32 = 3600;

/// Appliance record as it is stored by the profile collectors.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceRecord {
    pub appliance_type: String,

    #[serde(alias = "appliance_manufacturer")]
    pub appliance_manufactor: String,

    pub appliance_model: String,

    pub appliance_mode: String,

    pub measure_method: String,

    pub duration_in_minutes: i64,

    pub energy_use_resolution_in_seconds: i64,

    /// Energy consumed within each bucket.
    pub energy_usage: Vec<KilowattHours>,
}

impl ApplianceRecord {
    #[must_use]
    pub fn descriptor(&self) -> ApplianceDescriptor {
        ApplianceDescriptor {
            kind: self.appliance_type.clone(),
            manufacturer: self.appliance_manufactor.clone(),
            model: self.appliance_model.clone(),
            mode: self.appliance_mode.clone(),
            measure_method: self.measure_method.clone(),
        }
    }
}

/// Descriptive part of the record, never validated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplianceDescriptor {
    pub kind: String,
    pub manufacturer: String,
    pub model: String,
    pub mode: String,
    pub measure_method: String,
}

/// Validated appliance energy profile.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ApplianceProfile {
    descriptor: ApplianceDescriptor,
    duration_in_minutes: i64,
    resolution_seconds: u32,
    energy_usage: Vec<KilowattHours>,
}

impl ApplianceProfile {
    pub fn try_new(
        resolution_seconds: u32,
        energy_usage: Vec<KilowattHours>,
    ) -> Result<Self, Error> {
        if resolution_seconds == 0 {
            return Err(Error::InvalidProfile("resolution must be positive".to_owned()));
        }
        if energy_usage.is_empty() {
            return Err(Error::InvalidProfile("energy usage is empty".to_owned()));
        }
        if let Some(index) = energy_usage.iter().position(|usage| !usage.is_finite()) {
            return Err(Error::InvalidProfile(format!(
                "energy usage #{index} is not finite: {:?}",
                energy_usage[index],
            )));
        }
        #[expect(clippy::cast_possible_wrap)]
        let run_seconds = i64::from(resolution_seconds) * energy_usage.len() as i64;
        Ok(Self {
            descriptor: ApplianceDescriptor::default(),
            duration_in_minutes: run_seconds / 60,
            resolution_seconds,
            energy_usage,
        })
    }

    pub fn with_descriptor(mut self, descriptor: ApplianceDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    #[must_use]
    pub const fn descriptor(&self) -> &ApplianceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn duration_in_minutes(&self) -> i64 {
        self.duration_in_minutes
    }

    #[must_use]
    pub const fn resolution_seconds(&self) -> u32 {
        self.resolution_seconds
    }

    #[must_use]
    pub fn energy_usage(&self) -> &[KilowattHours] {
        &self.energy_usage
    }

    /// Number of times each hourly price must be repeated to match the bucket resolution.
    ///
    /// Truncated when the resolution does not evenly divide an hour.
    #[must_use]
    pub const fn repeat_factor(&self) -> usize {
        (SECONDS_PER_HOUR / self.resolution_seconds) as usize
    }

    #[must_use]
    pub const fn is_hour_aligned(&self) -> bool {
        SECONDS_PER_HOUR % self.resolution_seconds == 0
    }
}

impl TryFrom<ApplianceRecord> for ApplianceProfile {
    type Error = Error;

    fn try_from(record: ApplianceRecord) -> Result<Self, Self::Error> {
        let resolution_seconds = u32::try_from(record.energy_use_resolution_in_seconds)
            .map_err(|_| {
                Error::InvalidProfile(format!(
                    "resolution is out of range: {}",
                    record.energy_use_resolution_in_seconds,
                ))
            })?;
        let descriptor = record.descriptor();
        let mut profile =
            Self::try_new(resolution_seconds, record.energy_usage)?.with_descriptor(descriptor);
        profile.duration_in_minutes = record.duration_in_minutes;
        Ok(profile)
    }
}
