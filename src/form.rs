use crate::error::InputError;
use crate::types::{WorkoutInput, WorkoutKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Type,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "type",
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        })
    }
}

/// The five input controls, read as raw text at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// How strictly the cycling elevation field is checked.
///
/// `AnyFinite` only rejects NaN/infinite values, so zero and negative gains
/// pass. It is the default because it is the long-standing accepted input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElevationCheck {
    #[default]
    AnyFinite,
    NonNegative,
    Positive,
}

/// Reads a raw field as a number. Surrounding whitespace is ignored and
/// blank text reads as zero; anything unparsable reads as NaN.
///
/// Unsigned `0x`/`0o`/`0b` integer literals are accepted, as number inputs
/// in the browser accept them.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(v) = radix_literal(s) {
        return v;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_precision_loss)]
fn radix_literal(s: &str) -> Option<f64> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Some(f64::NAN);
    }
    Some(u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64))
}

fn finite(field: FormField, raw: &str) -> Result<f64, InputError> {
    let v = coerce_number(raw);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(InputError::NotFinite { field })
    }
}

fn positive(field: FormField, v: f64) -> Result<f64, InputError> {
    if v > 0.0 {
        Ok(v)
    } else {
        Err(InputError::NotPositive { field })
    }
}

/// Parse and validate the raw form into typed workout values.
///
/// All numeric fields are checked for finiteness before any positivity
/// check, so a NaN cadence is reported even when the distance is negative.
pub fn validate(raw: &RawForm, elevation: ElevationCheck) -> Result<WorkoutInput, InputError> {
    let kind = WorkoutKind::from_selector(&raw.kind)
        .ok_or_else(|| InputError::UnknownType(raw.kind.clone()))?;

    let distance_km = finite(FormField::Distance, &raw.distance)?;
    let duration_min = finite(FormField::Duration, &raw.duration)?;

    match kind {
        WorkoutKind::Running => {
            let cadence_spm = finite(FormField::Cadence, &raw.cadence)?;
            Ok(WorkoutInput::Running {
                distance_km: positive(FormField::Distance, distance_km)?,
                duration_min: positive(FormField::Duration, duration_min)?,
                cadence_spm: positive(FormField::Cadence, cadence_spm)?,
            })
        }
        WorkoutKind::Cycling => {
            let elevation_gain_m = finite(FormField::Elevation, &raw.elevation)?;
            let distance_km = positive(FormField::Distance, distance_km)?;
            let duration_min = positive(FormField::Duration, duration_min)?;
            let elevation_gain_m = match elevation {
                ElevationCheck::AnyFinite => elevation_gain_m,
                ElevationCheck::NonNegative if elevation_gain_m >= 0.0 => elevation_gain_m,
                ElevationCheck::NonNegative => {
                    return Err(InputError::NotPositive {
                        field: FormField::Elevation,
                    });
                }
                ElevationCheck::Positive => positive(FormField::Elevation, elevation_gain_m)?,
            };
            Ok(WorkoutInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            })
        }
    }
}

/// The workout input form as the session sees it.
pub trait FormView {
    /// Unhide the form and focus the distance input.
    fn reveal(&mut self);
    fn read(&self) -> RawForm;
    /// Empty the four numeric inputs; the type selector keeps its value.
    fn clear_inputs(&mut self);
    /// Flip the visibility of the cadence row and the elevation row.
    fn toggle_type_rows(&mut self);
}

/// In-memory form used by the terminal host and by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub fields: RawForm,
    pub hidden: bool,
    pub focused: Option<FormField>,
    pub cadence_row_hidden: bool,
    pub elevation_row_hidden: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: RawForm {
                kind: WorkoutKind::Running.as_str().to_string(),
                ..RawForm::default()
            },
            hidden: true,
            focused: None,
            cadence_row_hidden: false,
            elevation_row_hidden: true,
        }
    }
}

impl FormState {
    pub fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::Type => &mut self.fields.kind,
            FormField::Distance => &mut self.fields.distance,
            FormField::Duration => &mut self.fields.duration,
            FormField::Cadence => &mut self.fields.cadence,
            FormField::Elevation => &mut self.fields.elevation,
        };
        value.clone_into(slot);
    }
}

impl FormView for FormState {
    fn reveal(&mut self) {
        self.hidden = false;
        self.focused = Some(FormField::Distance);
    }

    fn read(&self) -> RawForm {
        self.fields.clone()
    }

    fn clear_inputs(&mut self) {
        self.fields.distance.clear();
        self.fields.duration.clear();
        self.fields.cadence.clear();
        self.fields.elevation.clear();
    }

    fn toggle_type_rows(&mut self) {
        self.cadence_row_hidden = !self.cadence_row_hidden;
        self.elevation_row_hidden = !self.elevation_row_hidden;
    }
}
