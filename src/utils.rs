use crate::error::PositionError;
use crate::session::GeolocationProvider;
use crate::types::{Coords, Workout};
use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,workout_map={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

pub fn google_maps_link(at: Coords) -> String {
    format!("https://www.google.com/maps/@{},{},15z", at.lat, at.lng)
}

/// Parses `"LAT,LNG"` in degrees.
pub fn parse_coords(s: &str) -> Result<Coords> {
    let Some((lat, lng)) = s.split_once(',') else {
        bail!("expected LAT,LNG, got {s:?}");
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("latitude in {s:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .with_context(|| format!("longitude in {s:?}"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        bail!("coordinates out of range: {s:?}");
    }
    Ok(Coords::new(lat, lng))
}

/// Geolocation provider backed by a position known up front.
/// `None` behaves like a host without geolocation support.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<Coords>);

impl GeolocationProvider for FixedPosition {
    fn request_position(&mut self) -> Result<Coords, PositionError> {
        self.0.ok_or(PositionError::Unsupported)
    }
}

pub fn workouts_to_json(workouts: &[Workout]) -> JsonValue {
    JsonValue::Array(workouts.iter().map(Workout::to_json).collect())
}

pub fn write_export(path: &Path, workouts: &[Workout]) -> Result<()> {
    let body = serde_json::to_string_pretty(&workouts_to_json(workouts))
        .context("serializing workouts")?;
    fs::write(path, body).with_context(|| format!("writing export: {}", path.display()))?;
    tracing::info!(path = %path.display(), workouts = workouts.len(), "export written");
    Ok(())
}
