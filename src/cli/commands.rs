use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::config::ProviderConfig;
use crate::models::Element;
use crate::provider::DataProvider;
use crate::utils::progress::ProgressReporter;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    setup_logging(cli.verbose);

    let mut config = ProviderConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let format = cli.format;
    let mut provider = DataProvider::new(config);
    debug!(
        "Using data directory {}",
        provider.config().data_dir.display()
    );
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Nearest {
            latitude,
            longitude,
            radius,
        } => {
            let progress =
                ProgressReporter::new_spinner("Loading stations...", format != OutputFormat::Table);
            let directory = provider
                .load_stations()
                .context("Failed to load the station directory")?;
            progress.set_message(&format!("Searching {} stations...", directory.len()));
            let nearest = provider.get_nearest_stations(latitude, longitude, radius);
            progress.finish_and_clear();

            let rows: Vec<NearbyRow> = nearest
                .into_iter()
                .map(|(station_id, distance_km)| {
                    let name = provider
                        .get_station(&station_id)
                        .map(|s| s.name)
                        .unwrap_or_default();
                    NearbyRow {
                        station_id,
                        name,
                        distance_km,
                    }
                })
                .collect();
            write_nearby(&mut out, &rows, format)?;
        }
        Commands::Yearly {
            station_id,
            start_year,
            end_year,
            element,
        } => {
            let values = provider.get_yearly_averages(&station_id, start_year, end_year, element);
            write_series(&mut out, "year", element, &values, format)?;
        }
        Commands::Range {
            station_id,
            start_year,
            end_year,
            start_month,
            end_month,
            element,
        } => {
            let values = provider.get_averages_for_month_range(
                &station_id,
                start_year,
                end_year,
                start_month,
                end_month,
                element,
            );
            write_series(&mut out, "year", element, &values, format)?;
        }
        Commands::Season {
            station_id,
            start_year,
            end_year,
            season,
            element,
        } => {
            let values =
                provider.get_season_averages(&station_id, start_year, end_year, season, element);
            write_series(&mut out, "year", element, &values, format)?;
        }
        Commands::Monthly {
            station_id,
            year,
            element,
        } => {
            let values = provider.get_monthly_averages(&station_id, year, element);
            write_series(&mut out, "month", element, &values, format)?;
        }
        Commands::Daily {
            station_id,
            year,
            month,
            element,
        } => {
            let values = provider.get_daily_values(&station_id, year, month, element);
            write_series(&mut out, "day", element, &values, format)?;
        }
        Commands::Coverage {
            station_id,
            start_year,
            end_year,
            element,
        } => {
            let covered = provider.has_measurements_for_year_range(
                &station_id,
                start_year,
                end_year,
                element,
            );
            writeln!(
                out,
                "{} {} {}-{}: {}",
                station_id,
                element,
                start_year,
                end_year,
                if covered { "covered" } else { "not covered" }
            )?;
        }
    }

    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcn_daily={}", log_level)));

    // Ignore a second initialisation attempt
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(io::stderr)
                .compact(),
        )
        .try_init();
}

#[derive(Debug, Serialize)]
struct NearbyRow {
    station_id: String,
    name: String,
    distance_km: f64,
}

fn write_nearby<W: Write>(
    out: &mut W,
    rows: &[NearbyRow],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            for row in rows {
                writeln!(
                    out,
                    "{}  {:<30} {:>7.1} km",
                    row.station_id, row.name, row.distance_km
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_series<W, K>(
    out: &mut W,
    key_name: &str,
    element: Element,
    values: &BTreeMap<K, f64>,
    format: OutputFormat,
) -> anyhow::Result<()>
where
    W: Write,
    K: Serialize + std::fmt::Display + Ord,
{
    match format {
        OutputFormat::Table => {
            for (key, value) in values {
                writeln!(out, "{:>5}  {:>+7.1} {}", key, value, element.units())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, values)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record([key_name, element.code()])?;
            for (key, value) in values {
                writer.write_record([key.to_string(), format!("{:.1}", value)])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<K: Serialize + std::fmt::Display + Ord>(
        values: &BTreeMap<K, f64>,
        format: OutputFormat,
    ) -> String {
        let mut buffer = Vec::new();
        write_series(&mut buffer, "year", Element::Tmax, values, format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_series_formats() {
        let values = BTreeMap::from([(1960, 13.5), (2000, 14.7)]);

        assert_eq!(
            render(&values, OutputFormat::Csv),
            "year,TMAX\n1960,13.5\n2000,14.7\n"
        );
        assert_eq!(
            render(&values, OutputFormat::Table),
            " 1960    +13.5 °C\n 2000    +14.7 °C\n"
        );

        let json: serde_json::Value =
            serde_json::from_str(&render(&values, OutputFormat::Json)).unwrap();
        assert_eq!(json["1960"], 13.5);
    }

    #[test]
    fn test_nearby_csv() {
        let rows = vec![NearbyRow {
            station_id: "GME00122614".to_string(),
            name: "FUERTH".to_string(),
            distance_km: 2.5,
        }];
        let mut buffer = Vec::new();
        write_nearby(&mut buffer, &rows, OutputFormat::Csv).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "station_id,name,distance_km\nGME00122614,FUERTH,2.5\n"
        );
    }
}
