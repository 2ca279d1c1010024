use std::{sync::Arc, time::Duration};

use bon::Builder;
use chrono::{DateTime, Local};
use clap::Parser;
use tokio::{
    join,
    sync::watch,
    time::{MissedTickBehavior, interval},
};

use crate::{
    cli::calculation::CalculationArgs,
    core::{ApplianceCalculations, LiveRecommendation},
    prelude::*,
    tables::{build_recommendation_table, build_summary_table},
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    calculation: CalculationArgs,

    #[clap(long = "interval", env = "REFRESH_INTERVAL", default_value = "1min")]
    interval: humantime::Duration,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let calculations = Arc::new(self.calculation.calculate()?);
        println!("{}", build_summary_table(&calculations));

        let (sender, mut receiver) = watch::channel(None);
        let refresher = Refresher::builder()
            .calculations(calculations)
            .sender(sender)
            .interval(self.interval)
            .build();
        let printer = async move {
            while receiver.changed().await.is_ok() {
                if let Some(recommendation) = *receiver.borrow_and_update() {
                    println!("{}", build_recommendation_table(&recommendation));
                }
            }
        };
        join!(refresher.run(), printer);
        Ok(())
    }
}

/// Periodically re-derives the recommendation and publishes it when it changes.
#[derive(Builder)]
struct Refresher {
    calculations: Arc<ApplianceCalculations>,
    sender: watch::Sender<Option<LiveRecommendation>>,

    #[builder(into)]
    interval: Duration,
}

impl Refresher {
    /// Runs until the latest start time has passed, then drops the sender.
    async fn run(self) {
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let now = Local::now();
            if now > self.calculations.latest_start_time {
                info!(latest_start_time = %self.calculations.latest_start_time, "horizon passed");
                break;
            }
            self.refresh(now);
        }
    }

    /// Returns whether a new recommendation got published.
    fn refresh(&self, now: DateTime<Local>) -> bool {
        match self.calculations.recommend(now) {
            Ok(recommendation) => self.sender.send_if_modified(|current| {
                if *current == Some(recommendation) {
                    false
                } else {
                    *current = Some(recommendation);
                    true
                }
            }),
            Err(error) => {
                warn!(%now, "keeping the previous recommendation: {error}");
                false
            }
        }
    }
}
