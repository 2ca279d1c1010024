mod calculate;
mod calculation;
mod derive;
mod watch;

use clap::{Parser, Subcommand};

use crate::{
    cli::{calculate::CalculateArgs, derive::DeriveArgs, watch::WatchArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.command {
            Command::Calculate(args) => args.run(),
            Command::Watch(args) => args.run().await,
            Command::Derive(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: calculate the costs of every start time and recommend the best one.
    #[clap(name = "calculate")]
    Calculate(Box<CalculateArgs>),

    /// Keep refreshing the recommendation as the time goes on.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Derive an appliance record from a recorded meter history.
    #[clap(name = "derive")]
    Derive(Box<DeriveArgs>),
}
