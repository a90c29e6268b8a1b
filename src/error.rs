use crate::form::FormField;
use thiserror::Error;

/// Why the geolocation provider could not supply a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("permission to read the position was denied")]
    Denied,
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("position is unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} is not a finite number")]
    NotFinite { field: FormField },
    #[error("{field} must be positive")]
    NotPositive { field: FormField },
    #[error("unknown workout type {0:?}")]
    UnknownType(String),
    #[error("no location selected on the map")]
    NoPendingLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("position unavailable: {0}")]
    PositionUnavailable(#[source] PositionError),
    #[error("invalid workout input: {0}")]
    InvalidWorkoutInput(#[from] InputError),
}

impl SessionError {
    /// Text of the blocking notice shown to the user.
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::PositionUnavailable(_) => "Could not get your position",
            Self::InvalidWorkoutInput(InputError::NoPendingLocation) => {
                "Click on the map to choose a location first!"
            }
            Self::InvalidWorkoutInput(_) => "Inputs have to be positive numbers!",
        }
    }
}

impl From<PositionError> for SessionError {
    fn from(e: PositionError) -> Self {
        Self::PositionUnavailable(e)
    }
}
