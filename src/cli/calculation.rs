use std::{fs, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    core::{ApplianceCalculations, ApplianceProfile, ApplianceRecord, PriceSeries, ProfileMatcher},
    prelude::*,
    quantity::rate::KilowattHourRate,
};

#[derive(Parser)]
pub struct CalculationArgs {
    /// Appliance record in JSON.
    #[clap(long = "appliance-file", env = "APPLIANCE_FILE")]
    pub appliance_file: PathBuf,

    /// Today's hourly prices per kilowatt-hour, starting at midnight.
    #[clap(long = "prices", env = "PRICES", value_delimiter = ',', num_args = 1..)]
    pub prices: Vec<KilowattHourRate>,

    /// Tomorrow's hourly prices, if already published.
    #[clap(
        long = "tomorrow-prices",
        env = "TOMORROW_PRICES",
        value_delimiter = ',',
        num_args = 1..
    )]
    pub tomorrow_prices: Option<Vec<KilowattHourRate>>,

    /// Day of the first price, today by default.
    #[clap(long = "as-of", env = "AS_OF")]
    pub as_of: Option<NaiveDate>,
}

impl CalculationArgs {
    #[instrument(skip_all, fields(path = ?self.appliance_file))]
    pub fn load_profile(&self) -> Result<ApplianceProfile> {
        let contents = fs::read_to_string(&self.appliance_file)
            .with_context(|| format!("failed to read `{}`", self.appliance_file.display()))?;
        let record: ApplianceRecord =
            serde_json::from_str(&contents).context("failed to parse the appliance record")?;
        info!(
            manufacturer = %record.appliance_manufactor,
            model = %record.appliance_model,
            mode = %record.appliance_mode,
            "loaded",
        );
        Ok(ApplianceProfile::try_from(record)?)
    }

    pub fn calculate(&self) -> Result<ApplianceCalculations> {
        let profile = self.load_profile()?;
        let prices = PriceSeries::try_new(self.prices.clone(), self.tomorrow_prices.clone())?;
        let as_of = self.as_of.unwrap_or_else(|| Local::now().date_naive());
        Ok(ProfileMatcher::builder().profile(&profile).prices(&prices).as_of(as_of).build().run()?)
    }
}
