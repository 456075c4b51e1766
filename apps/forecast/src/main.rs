mod render;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use urania::chart::{parse_birth_date, parse_birth_time, parse_timezone, BirthProfile};
use urania::ephemeris::{AnalyticEphemeris, EphemerisSource, GeoLocation};
use urania::ForecastEngine;
use urania_config::{EphemerisKind, ForecastConfig, LocationOrigin};

/// Zone used when --timezone is not given
const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal daily forecast: natal chart, transits, biorhythms and numerology")]
struct Cli {
    /// Path to forecast.toml (default: configs/forecast.toml or ../../configs/forecast.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Natal chart: positions, houses, aspects and element balance.
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Transits to the natal chart on a date.
    Transits {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Biorhythm cycles on a date, or a multi-day forecast with --days.
    Biorhythm {
        /// Birth date (YYYY-MM-DD or DD.MM.YYYY).
        #[arg(long)]
        birth_date: String,
        #[command(flatten)]
        target: TargetArgs,
        /// Forecast this many days starting at the target date.
        #[arg(long)]
        days: Option<u32>,
    },
    /// Pythagorean numerology matrix of a birth date.
    Matrix {
        /// Birth date (YYYY-MM-DD or DD.MM.YYYY).
        #[arg(long)]
        birth_date: String,
    },
    /// Combined daily report.
    Report {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Compact machine-readable summary of a day.
    Summary {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug)]
struct BirthArgs {
    /// Birth date (YYYY-MM-DD or DD.MM.YYYY).
    #[arg(long)]
    birth_date: String,

    /// Local birth time (HH:MM).
    #[arg(long, default_value = "12:00")]
    birth_time: String,

    /// Time zone of the birth clock: an IANA name (Europe/Moscow) or a fixed
    /// offset (+03:00). Named zones apply historical summer time.
    #[arg(
        long,
        visible_alias = "utc-offset",
        default_value = DEFAULT_TIMEZONE,
        allow_hyphen_values = true
    )]
    timezone: String,

    /// Birth city; resolved through the known-city table.
    #[arg(long)]
    city: Option<String>,

    /// Explicit latitude; overrides --city together with --lon.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Explicit longitude.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Elevation in meters for explicit coordinates.
    #[arg(long, default_value_t = 0.0)]
    elevation: f64,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Target date (default: today).
    #[arg(long)]
    date: Option<String>,
}

impl TargetArgs {
    fn resolve(&self) -> anyhow::Result<NaiveDate> {
        match &self.date {
            Some(text) => Ok(parse_birth_date(text)?),
            None => Ok(Local::now().date_naive()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ForecastConfig::load(cli.config.as_deref())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let engine = ForecastEngine::new(build_source(&config)?, config.engine_settings()?);

    match &cli.command {
        Command::Chart { birth } => {
            let profile = birth_profile(&config, birth)?;
            let chart = engine.natal_chart(&profile)?;
            output(cli.json, &chart, |out, v| render::natal_chart(out, v))
        }
        Command::Transits { birth, target } => {
            let chart = engine.natal_chart(&birth_profile(&config, birth)?)?;
            let report = engine.transits(&chart, target.resolve()?);
            output(cli.json, &report, |out, v| render::transit_report(out, v))
        }
        Command::Biorhythm {
            birth_date,
            target,
            days,
        } => {
            let birth = parse_birth_date(birth_date)?;
            let start = target.resolve()?;
            match days {
                Some(days) => {
                    let forecast = engine.biorhythm_forecast(birth, start, Some(*days))?;
                    output(cli.json, &forecast, |out, v| render::biorhythm_forecast(out, v))
                }
                None => {
                    let profile = engine.biorhythms(birth, start)?;
                    output(cli.json, &profile, |out, v| render::biorhythm(out, v))
                }
            }
        }
        Command::Matrix { birth_date } => {
            let matrix = engine.numerology(parse_birth_date(birth_date)?);
            output(cli.json, &matrix, |out, v| render::numerology(out, v))
        }
        Command::Report { birth, target } => {
            let chart = engine.natal_chart(&birth_profile(&config, birth)?)?;
            let report = engine.daily_report(&chart, target.resolve()?)?;
            output(cli.json, &report, |out, v| render::daily_report(out, v))
        }
        Command::Summary { birth, target } => {
            let chart = engine.natal_chart(&birth_profile(&config, birth)?)?;
            let summary = engine.summary(&chart, target.resolve()?)?;
            output(cli.json, &summary, |out, v| render::summary(out, v))
        }
    }
}

fn output<T: Serialize>(
    json: bool,
    value: &T,
    text: impl Fn(&mut String, &T) -> fmt::Result,
) -> anyhow::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{rendered}");
    } else {
        let mut rendered = String::new();
        text(&mut rendered, value).context("Failed to render output")?;
        print!("{rendered}");
    }
    Ok(())
}

fn build_source(config: &ForecastConfig) -> anyhow::Result<Box<dyn EphemerisSource>> {
    match config.ephemeris.source {
        EphemerisKind::Analytic => Ok(Box::new(AnalyticEphemeris::new())),
        EphemerisKind::Swiss => swiss_source(config),
    }
}

#[cfg(feature = "swiss")]
fn swiss_source(config: &ForecastConfig) -> anyhow::Result<Box<dyn EphemerisSource>> {
    let source = urania::ephemeris::SwissEphemeris::new(config.ephemeris_path())?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "swiss"))]
fn swiss_source(_config: &ForecastConfig) -> anyhow::Result<Box<dyn EphemerisSource>> {
    anyhow::bail!(
        "[ephemeris] source = \"swiss\" needs a build with `--features swiss`; use source = \"analytic\""
    )
}

fn birth_profile(config: &ForecastConfig, args: &BirthArgs) -> anyhow::Result<BirthProfile> {
    let date = parse_birth_date(&args.birth_date)?;
    let time = parse_birth_time(&args.birth_time)?;
    let timezone = parse_timezone(&args.timezone)?;

    let (location, place) = match (args.lat, args.lon, &args.city) {
        (Some(lat), Some(lon), city) => (GeoLocation::new(lat, lon, args.elevation), city.clone()),
        (_, _, Some(city)) => {
            let resolved = config.location_resolver().resolve(city);
            if resolved.origin == LocationOrigin::Default {
                log::warn!("Unknown city '{}', using the default location", city);
            }
            (resolved.location, Some(city.clone()))
        }
        _ => (config.default_location.to_location(), None),
    };

    let profile = BirthProfile::with_timezone(date, time, location, timezone)
        .with_context(|| format!("Invalid birth data for {}", args.birth_date))?;
    Ok(match place {
        Some(name) => profile.with_place_name(name),
        None => profile,
    })
}
