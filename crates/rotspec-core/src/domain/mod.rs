pub mod errors;

pub use errors::{CoreResult, ExitPlaceholder, RotspecError, RotspecErrorCategory};

use std::fmt::{Display, Formatter};

/// The engine is synchronous and CPU-bound; a serial mode is the only one
/// defined, and per-temperature synthesis stays independent should a
/// parallel mode ever be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    #[default]
    Serial,
}

/// Rotational branch of a transition, classified by ΔJ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    P,
    Q,
    R,
}

impl Branch {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
        }
    }

    /// J of the upper level for a transition whose lower level has the
    /// given J. P: J-1, Q: J, R: J+1.
    pub const fn upper_j(self, j: u32) -> Option<u32> {
        match self {
            Self::P => j.checked_sub(1),
            Self::Q => Some(j),
            Self::R => Some(j + 1),
        }
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// One rovibronic emission line: identity tag plus derived observables.
/// Wavelengths are vacuum meters, intensities are partition-normalized
/// Boltzmann weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub branch: Branch,
    pub omega: u8,
    pub j: u32,
    pub wavelength: f64,
    pub intensity: f64,
}

/// Outcome of one temperature fit. Non-fitted outcomes carry enough
/// context for the batch layer to log a reason before substituting its
/// zero sentinels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureEstimate {
    Fitted { kelvin: f64, squared_error: f64 },
    Ambiguous { root_count: usize },
    LowSignal { peak: f64 },
}

impl TemperatureEstimate {
    pub fn kelvin_or_zero(&self) -> f64 {
        match self {
            Self::Fitted { kelvin, .. } => *kelvin,
            Self::Ambiguous { .. } | Self::LowSignal { .. } => 0.0,
        }
    }

    pub fn error_or_zero(&self) -> f64 {
        match self {
            Self::Fitted { squared_error, .. } => *squared_error,
            Self::Ambiguous { .. } | Self::LowSignal { .. } => 0.0,
        }
    }

    pub const fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted { .. })
    }
}
