//! Field report command line

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use field_report::acquire::{AccuracyPolicy, AcquisitionState, PositionAcquirer};
use field_report::acquire::{ScriptedSensor, SensorScript};
use field_report::compose::FieldForm;
use field_report::geodesy::{self, CardinalDirection, Coordinate};
use field_report::proximity::{self, AttachedReport, MemoryReportStore, ReportStore};
use field_report::report;
use field_report::*;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "field-report", about = "Compose field observation reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Distance and bearing between two `lat,lon` points.
    Distance {
        #[arg(allow_hyphen_values = true)]
        from: Coordinate,
        #[arg(allow_hyphen_values = true)]
        to: Coordinate,
    },

    /// Where `origin` lies relative to `target`.
    Relative {
        #[arg(allow_hyphen_values = true)]
        origin: Coordinate,
        #[arg(allow_hyphen_values = true)]
        target: Coordinate,

        /// Name of the target in the sentence.
        #[arg(long, default_value = report::INCIDENT_SITE_LABEL)]
        label: String,
    },

    /// Where `position` lies relative to the incident site and the wind.
    Wind {
        #[arg(allow_hyphen_values = true)]
        site: Coordinate,
        #[arg(allow_hyphen_values = true)]
        position: Coordinate,

        /// Direction the wind blows from, e.g. `NW`.
        wind_from: CardinalDirection,
    },

    /// Build both report strings from a JSON form.
    Compose {
        form: PathBuf,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run an acquisition against a scripted sensor session.
    Acquire {
        script: PathBuf,

        /// Sampling window in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Desired accuracy in meters.
        #[arg(long)]
        accuracy: Option<f64>,

        /// `advisory` or `accept_when_met`.
        #[arg(long, value_parser = parse_policy)]
        policy: Option<AccuracyPolicy>,
    },

    /// Find the attached report nearest to a position.
    Retrieve {
        /// JSON list of attached reports.
        reports: PathBuf,

        #[arg(allow_hyphen_values = true)]
        position: Coordinate,

        /// Search radius in meters.
        #[arg(long)]
        radius: Option<f64>,
    },
}

fn parse_policy(value: &str) -> Result<AccuracyPolicy, String> {
    match value.trim().to_lowercase().replace('-', "_").as_str() {
        "advisory" => Ok(AccuracyPolicy::Advisory),
        "accept_when_met" => Ok(AccuracyPolicy::AcceptWhenMet),
        other => Err(format!("unknown accuracy policy: {}", other)),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("could not parse {}", path.display()))
}

async fn run_acquire(
    config: Config,
    script: &Path,
    timeout_ms: Option<u64>,
    accuracy: Option<f64>,
    policy: Option<AccuracyPolicy>,
) -> anyhow::Result<()> {
    let script: SensorScript = read_json(script)?;
    let mut acquirer = PositionAcquirer::from_config(ScriptedSensor::from_script(script), &config);
    if let Some(policy) = policy {
        acquirer = acquirer.with_policy(policy);
    }

    let timeout = Duration::from_millis(timeout_ms.unwrap_or(config.acquire_timeout_ms));
    let accuracy = accuracy.unwrap_or(config.desired_accuracy_meters);

    let mut state = acquirer.watch();
    let countdown = tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = state.borrow_and_update().clone();
            match current {
                AcquisitionState::Sampling {
                    remaining,
                    best_accuracy: Some(best),
                    ..
                } => println!("{}s left, best ±{:.0} m", remaining.as_secs(), best),
                AcquisitionState::Sampling { remaining, .. } => {
                    println!("{}s left, no fix yet", remaining.as_secs())
                }
                AcquisitionState::Fallback { timeout } => {
                    println!("No fix yet, asking for a single fix ({}s).", timeout.as_secs())
                }
                _ => {}
            }
        }
    });

    let result = acquirer.acquire(timeout, accuracy).await;
    countdown.abort();

    let coordinate = result.map_err(|e| anyhow!("{} ({})", e, e.reason()))?;
    println!("{}", coordinate);
    Ok(())
}

async fn run_retrieve(
    config: Config,
    reports: &Path,
    position: Coordinate,
    radius: Option<f64>,
) -> anyhow::Result<()> {
    let reports: Vec<AttachedReport> = read_json(reports)?;
    let store = MemoryReportStore::new();
    for attached in reports {
        store.attach(attached).await?;
    }

    let radius = radius.unwrap_or(config.retrieve_radius_meters);
    match proximity::retrieve_nearest(&store, &position, radius).await? {
        Some(found) => println!("{}", serde_json::to_string_pretty(&found.report())?),
        None => println!("No report within {} m.", radius),
    }
    Ok(())
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Will use default config settings if no environment vars are found.
    let config = Config::try_from_env()
        .map_err(|e| anyhow!("Failed to load configuration from environment: {}", e))?;

    // Try to load log configuration from the provided log file.
    // Will default to stdout debug logging if the file can not be loaded.
    if let Err(e) = load_logger_config_from_file(config.log_config.as_str()).await {
        log::error!("(main) {}", e);
    }

    info!("(main) Running {:?}.", cli.command);

    match cli.command {
        Command::Distance { from, to } => {
            let meters = geodesy::distance_meters(&from, &to);
            let bearing = geodesy::initial_bearing_degrees(&from, &to);
            println!(
                "{:.1} m (~{}), bearing {:.1} deg {}",
                meters,
                geodesy::format_distance(meters),
                bearing,
                geodesy::compass_label(bearing)
            );
        }
        Command::Relative {
            origin,
            target,
            label,
        } => println!("{}", report::relative_report(&origin, &target, &label)),
        Command::Wind {
            site,
            position,
            wind_from,
        } => println!(
            "{}",
            report::wind_relative_report(&site, &position, wind_from)
        ),
        Command::Compose { form, json } => {
            let form: FieldForm = read_json(&form)?;
            let report = form.report();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}\n\n{}", report.location_text, report.comments_text);
            }
        }
        Command::Acquire {
            script,
            timeout_ms,
            accuracy,
            policy,
        } => run_acquire(config, &script, timeout_ms, accuracy, policy).await?,
        Command::Retrieve {
            reports,
            position,
            radius,
        } => run_retrieve(config, &reports, position, radius).await?,
    }

    // Make sure all log message are written/ displayed before shutdown
    log::logger().flush();

    Ok(())
}
