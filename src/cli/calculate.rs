use chrono::{DateTime, Local};
use clap::Parser;

use crate::{
    cli::calculation::CalculationArgs,
    core,
    prelude::*,
    tables::{build_cost_table, build_recommendation_table, build_summary_table},
};

#[derive(Parser)]
pub struct CalculateArgs {
    #[clap(flatten)]
    calculation: CalculationArgs,

    /// Moment to recommend for, the current time by default.
    #[clap(long, env = "NOW")]
    now: Option<DateTime<Local>>,

    /// Number of the cheapest start times to show.
    #[clap(long, env = "LIMIT", default_value = "10")]
    limit: usize,
}

impl CalculateArgs {
    #[instrument(name = "Calculating…", skip_all)]
    pub fn run(self) -> Result {
        let calculations = self.calculation.calculate()?;
        println!("{}", build_summary_table(&calculations));
        println!("{}", build_cost_table(&calculations, self.limit));

        let now = self.now.unwrap_or_else(Local::now);
        match calculations.recommend(now) {
            Ok(recommendation) => {
                println!("{}", build_recommendation_table(&recommendation));
            }
            Err(error @ (core::Error::TimeNotFound(_) | core::Error::NoDelayWindow { .. })) => {
                warn!(%now, "no recommendation: {error}");
            }
            Err(error) => return Err(error.into()),
        }
        Ok(())
    }
}
