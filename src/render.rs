use crate::session::{MapHandle, MapProvider, Notifier};
use crate::types::{Coords, Workout, WorkoutDetails, WorkoutKind};

pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Text shown in every popup when no real content is requested.
pub const PLACEHOLDER_POPUP: &str = "workout";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupOptions {
    /// Popups stay open and are styled per workout type.
    pub fn for_kind(kind: WorkoutKind) -> Self {
        Self {
            max_width: 300,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            class_name: format!("{kind}-popup"),
        }
    }
}

/// What goes inside a marker's popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupContent {
    /// The fixed [`PLACEHOLDER_POPUP`] label.
    #[default]
    Placeholder,
    /// The workout's [`Workout::description`].
    Description,
}

impl PopupContent {
    pub fn text_for(self, workout: &Workout) -> String {
        match self {
            Self::Placeholder => PLACEHOLDER_POPUP.to_string(),
            Self::Description => workout.description(),
        }
    }
}

/// One line of the workout list.
pub fn format_workout_entry(w: &Workout) -> String {
    let base = format!(
        "{}  {} km  {} min",
        w.description(),
        w.distance_km(),
        w.duration_min()
    );
    match w.details() {
        WorkoutDetails::Running {
            cadence_spm,
            pace_min_per_km,
        } => format!("{base}  {pace_min_per_km:.1} min/km  {cadence_spm} spm"),
        WorkoutDetails::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => format!("{base}  {speed_km_per_h:.1} km/h  {elevation_gain_m} m"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: Coords,
    pub text: String,
    pub popup: PopupOptions,
}

/// Map host that renders to the terminal.
#[derive(Debug, Default)]
pub struct TerminalMap;

#[derive(Debug)]
pub struct TerminalMapHandle {
    pub center: Coords,
    pub zoom: u8,
    pub listening: bool,
    pub markers: Vec<Marker>,
}

impl MapProvider for TerminalMap {
    type Handle = TerminalMapHandle;

    fn create_map(&mut self, center: Coords, zoom: u8, tiles: &TileLayer) -> TerminalMapHandle {
        tracing::debug!(
            tiles = %tiles.url_template,
            attribution = %tiles.attribution,
            "tile layer"
        );
        println!("map\t{center}\tzoom={zoom}");
        TerminalMapHandle {
            center,
            zoom,
            listening: false,
            markers: Vec::new(),
        }
    }
}

impl MapHandle for TerminalMapHandle {
    fn subscribe_clicks(&mut self) {
        self.listening = true;
    }

    fn add_marker(&mut self, at: Coords, popup_text: &str, popup: &PopupOptions) {
        println!("marker\t{at}\t[{}]\t{popup_text}", popup.class_name);
        self.markers.push(Marker {
            at,
            text: popup_text.to_string(),
            popup: popup.clone(),
        });
    }
}

/// Prints notices to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}
