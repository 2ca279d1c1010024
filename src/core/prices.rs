use itertools::Itertools;

use crate::{
    core::{Error, series::Resample},
    quantity::rate::KilowattHourRate,
};

/// Hourly unit prices starting at local midnight of the calculation day.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries(Vec<KilowattHourRate>);

impl PriceSeries {
    /// Build the series from today's prices and, when already published, tomorrow's prices.
    pub fn try_new(
        today: Vec<KilowattHourRate>,
        tomorrow: Option<Vec<KilowattHourRate>>,
    ) -> Result<Self, Error> {
        let mut rates = today;
        if let Some(tomorrow) = tomorrow {
            rates.extend(tomorrow);
        }
        if rates.is_empty() {
            return Err(Error::InvalidPriceSeries("no prices".to_owned()));
        }
        if let Some(index) = rates.iter().position(|rate| !rate.is_finite()) {
            return Err(Error::InvalidPriceSeries(format!(
                "price #{index} is not finite: {:?}",
                rates[index],
            )));
        }
        Ok(Self(rates))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn hourly(&self) -> &[KilowattHourRate] {
        &self.0
    }

    /// Repeat every hourly price to match the bucket resolution.
    #[must_use]
    pub fn resample(&self, repeat_factor: usize) -> Vec<KilowattHourRate> {
        self.0.iter().copied().repeat_each(repeat_factor).collect_vec()
    }
}
