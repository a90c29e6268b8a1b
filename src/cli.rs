use crate::form::ElevationCheck;
use crate::render::PopupContent;
use crate::session::{DEFAULT_ZOOM, SessionOptions};
use crate::types::Coords;
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "workout-map",
    about = "Log running and cycling workouts on a map from an event script"
)]
pub struct Cli {
    /// Current position as LAT,LNG. Without it the session cannot locate you.
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_coords, allow_hyphen_values = true)]
    pub position: Option<Coords>,

    /// Event script to run (click/type/distance/duration/cadence/elevation/submit/list).
    ///
    /// Default: read from stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Map zoom level on creation.
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// How strictly the cycling elevation gain is validated.
    #[arg(long, value_enum, default_value_t = ElevationArg::Any)]
    pub elevation_check: ElevationArg,

    /// What marker popups show.
    #[arg(long, value_enum, default_value_t = PopupArg::Placeholder)]
    pub popup: PopupArg,

    /// Write the logged workouts as JSON to this file when the script ends.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ElevationArg {
    Any,
    NonNegative,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PopupArg {
    Placeholder,
    Description,
}

impl Cli {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            zoom: Some(self.zoom),
            elevation_check: match self.elevation_check {
                ElevationArg::Any => ElevationCheck::AnyFinite,
                ElevationArg::NonNegative => ElevationCheck::NonNegative,
                ElevationArg::Positive => ElevationCheck::Positive,
            },
            popup_content: match self.popup {
                PopupArg::Placeholder => PopupContent::Placeholder,
                PopupArg::Description => PopupContent::Description,
            },
            ..SessionOptions::default()
        }
    }
}
