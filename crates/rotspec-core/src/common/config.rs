//! Settled analysis configuration.
//!
//! Everything the core needs from the surrounding harness arrives here as
//! one deserialized object before any computation begins: reduction
//! geometry, instrument profile, temperature grid, band selection, and
//! the batch bookkeeping values.

use crate::domain::RotspecError;
use crate::molecules::ConstantSet;
use crate::solver::temperature::FitSettings;
use crate::spectra::image::{ImageError, Region, SpectralImage, WaveAxis};
use crate::spectra::lineshape::LineShape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read analysis config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse analysis config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("eta is required for the pseudo-Voigt profile")]
    MissingEta,
    #[error("instrument fwhm must be finite and > 0, got {value}")]
    InvalidFwhm { value: f64 },
    #[error("noise floor must be finite and >= 0, got {value}")]
    InvalidNoiseFloor { value: f64 },
    #[error("time step must be finite and > 0, got {value}")]
    InvalidTimeStep { value: f64 },
    #[error("maximum rotational quantum number must be at least 1")]
    InvalidJMax,
    #[error(
        "temperature grid [{start}, {end}] with step {step} must be finite, increasing and positive-stepped"
    )]
    InvalidTemperatureGrid { start: f64, end: f64, step: f64 },
    #[error("wavelength bounds must satisfy start < end, got [{start}, {end}]")]
    InvalidWavelengthBounds { start: f64, end: f64 },
}

impl From<ConfigError> for RotspecError {
    fn from(error: ConfigError) -> Self {
        match &error {
            ConfigError::Read { .. } => RotspecError::io_system("IO.CONFIG_READ", error.to_string()),
            ConfigError::Parse { .. } => {
                RotspecError::input_validation("INPUT.CONFIG_PARSE", error.to_string())
            }
            _ => RotspecError::input_validation("INPUT.CONFIG", error.to_string()),
        }
    }
}

/// Instrument slit profile selection; eta is only meaningful (and then
/// mandatory) for the pseudo-Voigt profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    Gaussian,
    Lorentzian,
    PseudoVoigt,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentConfig {
    pub fwhm: f64,
    pub profile: ProfileKind,
    #[serde(default)]
    pub eta: Option<f64>,
}

impl InstrumentConfig {
    pub fn line_shape(&self) -> Result<LineShape, ConfigError> {
        match self.profile {
            ProfileKind::Gaussian => Ok(LineShape::Gaussian),
            ProfileKind::Lorentzian => Ok(LineShape::Lorentzian),
            ProfileKind::PseudoVoigt => {
                let eta = self.eta.ok_or(ConfigError::MissingEta)?;
                Ok(LineShape::PseudoVoigt { eta })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureGridConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandConfig {
    pub constants: ConstantSet,
    pub initial_v: u32,
    pub final_v: u32,
    pub j_max: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub wave_axis: WaveAxis,
    pub regions: Vec<Region>,
    pub start_wavelength: Option<f64>,
    pub end_wavelength: Option<f64>,
    /// Rigid calibration offset added to every collapsed wavelength,
    /// meters.
    #[serde(default)]
    pub wavelength_shift: f64,
    pub instrument: InstrumentConfig,
    pub temperatures: TemperatureGridConfig,
    pub band: BandConfig,
    /// Frames whose raw peak falls below this are reported as zero
    /// without fitting.
    #[serde(default)]
    pub noise_floor: f64,
    /// Seconds between consecutive frames of a sequence.
    pub time_step: f64,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.instrument.fwhm.is_finite() || self.instrument.fwhm <= 0.0 {
            return Err(ConfigError::InvalidFwhm {
                value: self.instrument.fwhm,
            });
        }
        self.instrument.line_shape()?;

        let grid = self.temperatures;
        if !grid.start.is_finite()
            || !grid.end.is_finite()
            || !grid.step.is_finite()
            || grid.step <= 0.0
            || grid.end <= grid.start
        {
            return Err(ConfigError::InvalidTemperatureGrid {
                start: grid.start,
                end: grid.end,
                step: grid.step,
            });
        }

        if self.band.j_max < 1 {
            return Err(ConfigError::InvalidJMax);
        }
        if !self.noise_floor.is_finite() || self.noise_floor < 0.0 {
            return Err(ConfigError::InvalidNoiseFloor {
                value: self.noise_floor,
            });
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::InvalidTimeStep {
                value: self.time_step,
            });
        }
        if let (Some(start), Some(end)) = (self.start_wavelength, self.end_wavelength) {
            if !start.is_finite() || !end.is_finite() || end <= start {
                return Err(ConfigError::InvalidWavelengthBounds { start, end });
            }
        }

        Ok(())
    }

    pub fn fit_settings(&self) -> Result<FitSettings, ConfigError> {
        self.validate()?;
        Ok(FitSettings {
            constants: self.band.constants,
            initial_v: self.band.initial_v,
            final_v: self.band.final_v,
            j_max: self.band.j_max,
            temperature_start: self.temperatures.start,
            temperature_end: self.temperatures.end,
            temperature_step: self.temperatures.step,
            fwhm: self.instrument.fwhm,
            line_shape: self.instrument.line_shape()?,
            noise_floor: self.noise_floor,
        })
    }

    /// Attach this configuration's reduction geometry to a decoded
    /// intensity grid.
    pub fn configured_image(&self, grid: Vec<Vec<f64>>) -> Result<SpectralImage, ImageError> {
        let mut image = SpectralImage::from_grid(grid, self.wave_axis)?;
        if let (Some(start), Some(end)) = (self.start_wavelength, self.end_wavelength) {
            image.set_wavelength_bounds(start, end)?;
        }
        for region in &self.regions {
            image.add_region(*region)?;
        }
        Ok(image)
    }
}

pub fn load_analysis_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
