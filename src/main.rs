#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    api::{response::PowerDispatch, server},
    cli::{Args, Command, PlanArgs},
    prelude::*,
    tables::build_plan_table,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    tracing_subscriber::fmt().without_time().compact().with_max_level(args.log_level).init();
    info!(version = crate_version!(), "Starting…");

    match args.command {
        Command::Serve(args) => server::serve(&args.bind_address, args.timeout()).await,
        Command::Plan(args) => plan(&args),
    }
}

fn plan(args: &PlanArgs) -> Result {
    let request = args.read_request()?;
    info!(load = %request.load, n_power_plants = request.powerplants.len(), "Planning…");
    let plan = request.plan()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Vec::<PowerDispatch>::from(&plan))?);
    } else {
        println!("{}", build_plan_table(&plan));
        println!(
            "Total: {}, cost: {}, committed units: {}",
            plan.summary.total_power, plan.summary.hourly_cost, plan.summary.n_committed,
        );
    }
    Ok(())
}
