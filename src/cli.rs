use std::{
    io::{Read, stdin},
    path::PathBuf,
    time::Duration,
};

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{api::payload::ProductionPlanRequest, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(long, global = true, default_value = "info", env = "POWERPLANT_LOG_LEVEL")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the production plan over HTTP.
    Serve(ServeArgs),

    /// Plan a single payload and print the result.
    Plan(PlanArgs),
}

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long, default_value = "0.0.0.0:8888", env = "POWERPLANT_BIND_ADDRESS")]
    pub bind_address: String,

    /// Request timeout in seconds.
    #[clap(long = "timeout", default_value = "10", env = "POWERPLANT_REQUEST_TIMEOUT")]
    pub timeout_secs: u64,
}

impl ServeArgs {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Payload file, or `-` to read it from the standard input.
    pub payload: PathBuf,

    /// Print the response JSON instead of the table.
    #[clap(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn read_request(&self) -> Result<ProductionPlanRequest> {
        let payload = if self.payload.as_os_str() == "-" {
            let mut payload = String::new();
            stdin().read_to_string(&mut payload).context("failed to read the standard input")?;
            payload
        } else {
            std::fs::read_to_string(&self.payload)
                .with_context(|| format!("failed to read `{}`", self.payload.display()))?
        };
        serde_json::from_str(&payload).context("failed to parse the payload")
    }
}
