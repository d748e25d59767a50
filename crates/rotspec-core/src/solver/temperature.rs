//! Temperature solver: builds a temperature-indexed library of synthetic
//! spectra, scores each against the measured spectrum, and extracts the
//! temperature at the error-curve minimum.

use crate::domain::{ExecutionMode, RotspecError, TemperatureEstimate};
use crate::molecules::ConstantSet;
use crate::solver::spline::{CubicSpline, SplineError};
use crate::spectra::lineshape::{LineShape, LineShapeError};
use crate::spectra::spectrum::{Spectrum, SpectrumError};
use crate::synth::lines::{lines, LineListError, LineListInput};

/// Settled fit parameters, assembled from the analysis configuration
/// before any computation begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSettings {
    pub constants: ConstantSet,
    pub initial_v: u32,
    pub final_v: u32,
    pub j_max: u32,
    pub temperature_start: f64,
    pub temperature_end: f64,
    pub temperature_step: f64,
    pub fwhm: f64,
    pub line_shape: LineShape,
    pub noise_floor: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("temperature grid [{start}, {end}] with step {step} is not walkable")]
    InvalidTemperatureGrid { start: f64, end: f64, step: f64 },
    #[error("temperature grid needs at least 3 candidates, got {count}")]
    TemperatureGridTooSmall { count: usize },
    #[error("experimental spectrum is empty")]
    EmptyExperimental,
    #[error(
        "experimental grid has {experimental} points but the cached library was built for {library}"
    )]
    GridMismatch {
        experimental: usize,
        library: usize,
    },
    #[error(transparent)]
    LineList(#[from] LineListError),
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
    #[error(transparent)]
    LineShape(#[from] LineShapeError),
    #[error(transparent)]
    Spline(#[from] SplineError),
}

impl From<SolverError> for RotspecError {
    fn from(error: SolverError) -> Self {
        match &error {
            SolverError::LineList(inner) => inner.clone().into(),
            SolverError::Spectrum(inner) => inner.clone().into(),
            SolverError::LineShape(inner) => inner.clone().into(),
            SolverError::Spline(inner) => inner.clone().into(),
            _ => RotspecError::input_validation("INPUT.SOLVER", error.to_string()),
        }
    }
}

/// One fitted frame of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencePoint {
    pub time: f64,
    pub kelvin: f64,
    pub squared_error: f64,
    pub peak_signal: f64,
}

struct SyntheticLibrary {
    grid: Vec<f64>,
    temperatures: Vec<f64>,
    candidates: Vec<Spectrum>,
}

/// Owns the settled fit parameters and the per-temperature synthetic
/// library. The library depends only on the temperature grid and the
/// molecular states, so it is built once against the first experimental
/// grid and reused for the rest of the sequence; frame-to-frame grid
/// consistency is the caller's contract.
pub struct TemperatureSolver {
    settings: FitSettings,
    execution_mode: ExecutionMode,
    library: Option<SyntheticLibrary>,
}

impl TemperatureSolver {
    pub fn new(settings: FitSettings) -> Result<Self, SolverError> {
        let candidates = candidate_temperatures(&settings)?;
        if candidates.len() < 3 {
            return Err(SolverError::TemperatureGridTooSmall {
                count: candidates.len(),
            });
        }

        Ok(Self {
            settings,
            execution_mode: ExecutionMode::Serial,
            library: None,
        })
    }

    pub fn settings(&self) -> &FitSettings {
        &self.settings
    }

    pub const fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Synthesize one candidate through the full pipeline: line list at
    /// the requested temperature, redistribution onto the experimental
    /// grid, instrument broadening, peak normalization.
    fn synthesize(&self, temperature: f64, grid: &[f64]) -> Result<Spectrum, SolverError> {
        let set = self.settings.constants;
        let input = LineListInput::new(
            set.upper_state(),
            self.settings.initial_v,
            set.lower_state(),
            self.settings.final_v,
            self.settings.j_max,
            temperature,
        );
        let spectrum = lines(input)?
            .resample_onto(grid)?
            .broaden(self.settings.fwhm, self.settings.line_shape)?
            .normalize(1.0)?;
        Ok(spectrum)
    }

    fn library_for(&mut self, grid: &[f64]) -> Result<&SyntheticLibrary, SolverError> {
        if self.library.is_none() {
            let temperatures = candidate_temperatures(&self.settings)?;
            let mut candidates = Vec::with_capacity(temperatures.len());
            for &temperature in &temperatures {
                candidates.push(self.synthesize(temperature, grid)?);
            }
            self.library = Some(SyntheticLibrary {
                grid: grid.to_vec(),
                temperatures,
                candidates,
            });
        }

        let library = self.library.as_ref().expect("library was just populated");
        if library.grid.len() != grid.len() {
            return Err(SolverError::GridMismatch {
                experimental: grid.len(),
                library: library.grid.len(),
            });
        }
        Ok(library)
    }

    /// Fit one experimental spectrum. Degenerate measurement conditions
    /// come back as non-fitted estimates rather than errors so a batch
    /// run keeps its per-frame independence.
    pub fn fit(&mut self, experimental: &Spectrum) -> Result<TemperatureEstimate, SolverError> {
        if experimental.is_empty() {
            return Err(SolverError::EmptyExperimental);
        }

        let peak = experimental.peak_intensity();
        if peak == 0.0 || peak < self.settings.noise_floor {
            return Ok(TemperatureEstimate::LowSignal { peak });
        }

        let normalized = experimental.normalize(1.0)?;
        let library = self.library_for(normalized.wavelengths())?;

        let errors: Vec<f64> = library
            .candidates
            .iter()
            .map(|candidate| l1_distance(normalized.intensities(), candidate.intensities()))
            .collect();
        let temperatures = library.temperatures.clone();

        let error_curve = CubicSpline::new(temperatures.clone(), errors)?;
        let slopes: Vec<f64> = temperatures
            .iter()
            .map(|&t| error_curve.derivative(t))
            .collect();
        let slope_curve = CubicSpline::new(temperatures, slopes)?;
        let roots = slope_curve.roots();

        if roots.len() != 1 {
            return Ok(TemperatureEstimate::Ambiguous {
                root_count: roots.len(),
            });
        }

        let kelvin = roots[0];
        let matched = self.synthesize(kelvin, normalized.wavelengths())?;
        let squared_error = normalized
            .intensities()
            .iter()
            .zip(matched.intensities())
            .map(|(measured, synthetic)| (measured - synthetic).powi(2))
            .sum();

        Ok(TemperatureEstimate::Fitted {
            kelvin,
            squared_error,
        })
    }

    /// Fit an ordered frame sequence: apply the calibration shift, gate
    /// on the noise floor, fit, and tabulate one point per frame with
    /// zero sentinels for the non-fitted outcomes.
    pub fn fit_sequence(
        &mut self,
        frames: Vec<Spectrum>,
        wavelength_shift: f64,
        time_step: f64,
    ) -> Result<Vec<SequencePoint>, SolverError> {
        let mut points = Vec::with_capacity(frames.len());
        for (index, mut frame) in frames.into_iter().enumerate() {
            frame.shift_wavelengths(wavelength_shift);
            let estimate = self.fit(&frame)?;
            points.push(SequencePoint {
                time: index as f64 * time_step,
                kelvin: estimate.kelvin_or_zero(),
                squared_error: estimate.error_or_zero(),
                peak_signal: frame.peak_intensity(),
            });
        }
        Ok(points)
    }
}

fn candidate_temperatures(settings: &FitSettings) -> Result<Vec<f64>, SolverError> {
    let FitSettings {
        temperature_start: start,
        temperature_end: end,
        temperature_step: step,
        ..
    } = *settings;

    if !start.is_finite() || !end.is_finite() || !step.is_finite() || step <= 0.0 || end <= start {
        return Err(SolverError::InvalidTemperatureGrid { start, end, step });
    }

    let count = ((end - start) / step).round() as usize + 1;
    Ok((0..count).map(|i| start + step * i as f64).collect())
}

fn l1_distance(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter()
        .zip(rhs)
        .map(|(a, b)| (a - b).abs())
        .sum()
}
