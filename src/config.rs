use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::schedule::SlotConfig;

#[derive(Parser, Debug)]
#[command(name = "court-admin")]
#[command(about = "Booking admin for court rentals: schedule grid, bookings list and quick booking")]
#[command(version)]
pub struct Cli {
    /// First bookable hour of the day
    #[arg(long, global = true, default_value_t = 8, env = "COURT_ADMIN_OPENING_HOUR",
        value_parser = clap::value_parser!(u32).range(0..=23))]
    pub opening_hour: u32,

    /// Closing hour; the last grid column starts here
    #[arg(long, global = true, default_value_t = 22, env = "COURT_ADMIN_CLOSING_HOUR",
        value_parser = clap::value_parser!(u32).range(0..=23))]
    pub closing_hour: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the web admin
    Serve(ServeArgs),

    /// Print (or write) the schedule grid for one day
    Schedule {
        /// Day to show, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Read bookings from a CSV file instead of the demo data
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the grid to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the bookings list to CSV
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Only export bookings on this day
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "COURT_ADMIN_BIND")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080, env = "COURT_ADMIN_PORT")]
    pub port: u16,

    /// Simulated round trip of the booking backend, in milliseconds
    #[arg(long, default_value_t = 1000, env = "COURT_ADMIN_SUBMIT_DELAY_MS")]
    pub submit_delay_ms: u64,

    /// Share of submissions the simulated backend rejects (0.0 - 1.0)
    #[arg(long, default_value_t = 0.0, env = "COURT_ADMIN_FAILURE_RATE")]
    pub failure_rate: f64,

    /// Read bookings from a CSV file instead of the demo data
    #[arg(long, env = "COURT_ADMIN_BOOKINGS_CSV")]
    pub csv: Option<PathBuf>,
}

impl ServeArgs {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

impl Cli {
    pub fn slot_config(&self) -> Result<SlotConfig> {
        let config = SlotConfig {
            opening_hour: self.opening_hour,
            closing_hour: self.closing_hour,
            ..SlotConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["court-admin", "serve"]).unwrap();
        assert_eq!(cli.slot_config().unwrap(), SlotConfig::default());
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8080);
                assert_eq!(args.submit_delay(), Duration::from_millis(1000));
                assert_eq!(args.failure_rate, 0.0);
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_with_date() {
        let cli = Cli::try_parse_from(["court-admin", "schedule", "--date", "2024-12-24", "--closing-hour", "20"])
            .unwrap();
        assert_eq!(cli.slot_config().unwrap().slot_count(), 25);
        match cli.command {
            Commands::Schedule { date, csv, output } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 24));
                assert!(csv.is_none());
                assert!(output.is_none());
            }
            other => panic!("expected schedule, got {:?}", other),
        }
    }

    #[test]
    fn test_hours_out_of_range_are_rejected() {
        assert!(Cli::try_parse_from(["court-admin", "--closing-hour", "24", "serve"]).is_err());
        assert!(Cli::try_parse_from(["court-admin", "--opening-hour", "4294967295", "serve"]).is_err());
    }

    #[test]
    fn test_closing_before_opening_is_rejected() {
        let cli = Cli::try_parse_from(["court-admin", "--opening-hour", "20", "--closing-hour", "10", "serve"])
            .unwrap();
        assert!(matches!(
            cli.slot_config(),
            Err(crate::error::AdminError::InvalidHours { opening: 20, closing: 10 })
        ));
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
