use std::{fs, path::PathBuf};

use clap::Parser;

use crate::{
    core::{ApplianceDescriptor, ApplianceRecord, MeterReading},
    prelude::*,
};

#[derive(Parser)]
pub struct DeriveArgs {
    /// JSON list of cumulative meter readings recorded during a single appliance run.
    #[clap(long = "readings-file", env = "READINGS_FILE")]
    readings_file: PathBuf,

    #[clap(long = "type", env = "APPLIANCE_TYPE")]
    kind: String,

    #[clap(long, env = "APPLIANCE_MANUFACTURER")]
    manufacturer: String,

    #[clap(long, env = "APPLIANCE_MODEL")]
    model: String,

    #[clap(long, env = "APPLIANCE_MODE")]
    mode: String,

    #[clap(long = "measure-method", env = "MEASURE_METHOD", default_value = "smart plug")]
    measure_method: String,
}

impl DeriveArgs {
    #[instrument(skip_all, fields(path = ?self.readings_file))]
    pub fn run(self) -> Result {
        let contents = fs::read_to_string(&self.readings_file)
            .with_context(|| format!("failed to read `{}`", self.readings_file.display()))?;
        let readings: Vec<MeterReading> =
            serde_json::from_str(&contents).context("failed to parse the meter readings")?;
        info!(n_readings = readings.len(), "loaded");

        let descriptor = ApplianceDescriptor {
            kind: self.kind,
            manufacturer: self.manufacturer,
            model: self.model,
            mode: self.mode,
            measure_method: self.measure_method,
        };
        let record = ApplianceRecord::from_readings(descriptor, &readings)?;
        info!(
            resolution_seconds = record.energy_use_resolution_in_seconds,
            duration_minutes = record.duration_in_minutes,
            "derived",
        );
        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }
}
