mod clock;
mod config;
mod dashboard;
mod display;
mod error;
mod form;
mod ledger;
mod mock;
mod parser;
mod schedule;
mod table;
mod web;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use clock::format_long_date;
use config::{Cli, Commands, ServeArgs};
use display::{print_schedule, write_schedule_to_file};
use form::{export_bookings_to_csv, SimulatedSubmitter};
use ledger::{BookingLedger, BookingSource};
use parser::load_bookings;
use schedule::{layout_grid, SlotConfig};

fn booking_source(csv: Option<&Path>) -> Result<BookingSource> {
    match csv {
        Some(path) => {
            let bookings = load_bookings(path)
                .with_context(|| format!("Failed to load bookings from {}", path.display()))?;
            Ok(BookingSource::Loaded(bookings))
        }
        None => Ok(BookingSource::Mock),
    }
}

async fn serve(args: ServeArgs, slot_config: SlotConfig) -> Result<()> {
    let source = booking_source(args.csv.as_deref())?;
    let submitter = Arc::new(SimulatedSubmitter::new(args.submit_delay(), args.failure_rate));

    info!("Starting web server on {}:{}...", args.bind, args.port);
    info!("Access the site at http://localhost:{}", args.port);

    web::start_server(&args.bind, args.port, BookingLedger::new(source), submitter, slot_config)
        .await
        .context("Web server failed")?;
    Ok(())
}

fn schedule(date: Option<NaiveDate>, csv: Option<&Path>, output: Option<&Path>, slot_config: SlotConfig) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let bookings = booking_source(csv)?.for_date(date);
    let grid = layout_grid(&slot_config.slots(), &bookings, slot_config.granularity_minutes);
    let title = format!("Raspored: {}", format_long_date(date));

    match output {
        Some(path) => {
            write_schedule_to_file(&title, &grid, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Schedule saved to: {}", path.display());
        }
        None => print_schedule(&title, &grid),
    }
    Ok(())
}

fn export(output: &Path, date: Option<NaiveDate>) -> Result<()> {
    let source = BookingSource::Mock;
    let bookings = match date {
        Some(date) => source.for_date(date),
        None => source.all(),
    };
    export_bookings_to_csv(&bookings, output)
        .with_context(|| format!("Failed to export to {}", output.display()))?;
    println!("Exported {} bookings to {}", bookings.len(), output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let slot_config = cli.slot_config().context("Invalid opening hours")?;

    match cli.command {
        Commands::Serve(args) => serve(args, slot_config).await?,
        Commands::Schedule { date, csv, output } => {
            schedule(date, csv.as_deref(), output.as_deref(), slot_config)?
        }
        Commands::Export { output, date } => export(&output, date)?,
    }

    Ok(())
}
