mod calculations;
mod cost_map;
mod error;
mod matcher;
mod prices;
mod profile;
mod readings;
mod recommender;
pub mod series;

pub use self::{
    calculations::ApplianceCalculations,
    cost_map::CostMap,
    error::{Error, Warning},
    matcher::{ProfileMatcher, local_midnight},
    prices::PriceSeries,
    profile::{ApplianceDescriptor, ApplianceProfile, ApplianceRecord, SECONDS_PER_HOUR},
    readings::MeterReading,
    recommender::LiveRecommendation,
};
