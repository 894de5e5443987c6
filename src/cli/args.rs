use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::{Element, Season};
use crate::utils::constants::DEFAULT_RADIUS_KM;

#[derive(Parser)]
#[command(name = "ghcn-daily")]
#[command(about = "Nearby stations and yearly, seasonal, monthly and daily GHCN-Daily aggregates")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Data directory, overrides the configuration")]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stations within a radius of a point, nearest first
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        #[arg(short, long, default_value_t = DEFAULT_RADIUS_KM)]
        radius: f64,
    },

    /// Yearly averages of an element
    Yearly {
        #[arg(short, long)]
        station_id: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },

    /// Averages over a month range for each year (ranges may wrap past December)
    Range {
        #[arg(short, long)]
        station_id: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        start_month: u32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        end_month: u32,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },

    /// Averages for a meteorological season for each year
    Season {
        #[arg(short, long)]
        station_id: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(long)]
        season: Season,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },

    /// Monthly averages within one year
    Monthly {
        #[arg(short, long)]
        station_id: String,

        #[arg(short, long)]
        year: i32,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },

    /// Daily values within one month
    Daily {
        #[arg(short, long)]
        station_id: String,

        #[arg(short, long)]
        year: i32,

        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },

    /// Check the inventory for an element's coverage of a year range
    Coverage {
        #[arg(short, long)]
        station_id: String,

        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(short, long, default_value = "tmax")]
        element: Element,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_season_command() {
        let cli = Cli::try_parse_from([
            "ghcn-daily",
            "season",
            "--station-id",
            "GME00102380",
            "--start-year",
            "1960",
            "--end-year",
            "2000",
            "--season",
            "winter",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Season {
                station_id,
                season,
                element,
                ..
            } => {
                assert_eq!(station_id, "GME00102380");
                assert_eq!(season, Season::Winter);
                assert_eq!(element, Element::Tmax);
            }
            _ => panic!("expected season command"),
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "ghcn-daily",
            "nearest",
            "--latitude",
            "-33.87",
            "--longitude",
            "-151.21",
        ])
        .unwrap();

        match cli.command {
            Commands::Nearest {
                latitude,
                longitude,
                radius,
            } => {
                assert_eq!(latitude, -33.87);
                assert_eq!(longitude, -151.21);
                assert_eq!(radius, DEFAULT_RADIUS_KM);
            }
            _ => panic!("expected nearest command"),
        }
    }

    #[test]
    fn test_rejects_invalid_month_and_element() {
        assert!(Cli::try_parse_from([
            "ghcn-daily", "daily", "-s", "GME00102380", "-y", "2000", "-m", "13",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "ghcn-daily", "monthly", "-s", "GME00102380", "-y", "2000", "-e", "wsfg",
        ])
        .is_err());
    }
}
