use chrono::{DateTime, Utc};
use serde_json::{Value as JsonValue, json};
use std::fmt;
use uuid::Uuid;

/// A `(latitude, longitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// Parses the value of the form's type selector.
    pub fn from_selector(value: &str) -> Option<Self> {
        match value.trim() {
            "running" => Some(Self::Running),
            "cycling" => Some(Self::Cycling),
            _ => None,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated values for one workout, before it is placed on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
    Running {
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    },
    Cycling {
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

/// Variant payload. The derived metric is computed once, in [`Workout::with_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

/// One logged exercise session. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: Uuid,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    details: WorkoutDetails,
}

pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

impl Workout {
    pub fn new(coords: Coords, input: WorkoutInput) -> Self {
        Self::with_timestamp(coords, input, Utc::now())
    }

    pub fn with_timestamp(coords: Coords, input: WorkoutInput, created_at: DateTime<Utc>) -> Self {
        let (distance_km, duration_min, details) = match input {
            WorkoutInput::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => (
                distance_km,
                duration_min,
                WorkoutDetails::Running {
                    cadence_spm,
                    pace_min_per_km: pace_min_per_km(distance_km, duration_min),
                },
            ),
            WorkoutInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => (
                distance_km,
                duration_min,
                WorkoutDetails::Cycling {
                    elevation_gain_m,
                    speed_km_per_h: speed_km_per_h(distance_km, duration_min),
                },
            ),
        };

        Self {
            id: Uuid::new_v4(),
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        }
    }

    pub fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::new(
            coords,
            WorkoutInput::Running {
                distance_km,
                duration_min,
                cadence_spm,
            },
        )
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::new(
            coords,
            WorkoutInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            },
        )
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub const fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.details {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub const fn speed_km_per_h(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            WorkoutDetails::Running { .. } => None,
        }
    }

    /// e.g. "Running on October 16"
    pub fn description(&self) -> String {
        format!(
            "{} on {}",
            self.kind().label(),
            self.created_at.format("%B %-d")
        )
    }

    pub fn to_json(&self) -> JsonValue {
        let mut v = json!({
            "id": self.id.to_string(),
            "createdAt": self.created_at.to_rfc3339(),
            "coords": [self.coords.lat, self.coords.lng],
            "type": self.kind().as_str(),
            "distance": self.distance_km,
            "duration": self.duration_min,
        });

        match self.details {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                v["cadence"] = json!(cadence_spm);
                v["pace"] = json!(pace_min_per_km);
            }
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                v["elevationGain"] = json!(elevation_gain_m);
                v["speed"] = json!(speed_km_per_h);
            }
        }

        v
    }
}
