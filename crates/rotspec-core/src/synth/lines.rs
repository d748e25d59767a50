//! Line list generation: P/Q/R branch enumeration with Boltzmann
//! population weighting at a rotational temperature.

use crate::common::constants::{HC_OVER_K_CM_K, POPULATION_B_CM, WAVENUMBER_TO_METERS};
use crate::domain::{Branch, RotspecError, Transition};
use crate::molecules::MolecularState;
use crate::numerics::stable_sum;
use crate::spectra::spectrum::Spectrum;
use crate::synth::terms::{rotational_term, TermError};

#[derive(Clone, Copy)]
pub struct LineListInput<'a> {
    pub initial_state: &'a dyn MolecularState,
    pub initial_v: u32,
    pub final_state: &'a dyn MolecularState,
    pub final_v: u32,
    pub j_max: u32,
    pub rotational_temperature: f64,
}

impl<'a> LineListInput<'a> {
    pub fn new(
        initial_state: &'a dyn MolecularState,
        initial_v: u32,
        final_state: &'a dyn MolecularState,
        final_v: u32,
        j_max: u32,
        rotational_temperature: f64,
    ) -> Self {
        Self {
            initial_state,
            initial_v,
            final_state,
            final_v,
            j_max,
            rotational_temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineListError {
    #[error("rotational temperature must be finite and > 0, got {value}")]
    InvalidTemperature { value: f64 },
    #[error("maximum rotational quantum number must be at least 1, got {value}")]
    InvalidJMax { value: u32 },
    #[error(transparent)]
    Term(#[from] TermError),
}

impl From<LineListError> for RotspecError {
    fn from(error: LineListError) -> Self {
        RotspecError::input_validation("INPUT.LINELIST", error.to_string())
    }
}

/// Partition-function normalization: sum over j in [0, j_max) of
/// (2j+1) exp(-j(j+1) hc Bx / k Tr).
pub fn partition_normalization(j_max: u32, rotational_temperature: f64) -> f64 {
    let scale = HC_OVER_K_CM_K * POPULATION_B_CM / rotational_temperature;
    let terms: Vec<f64> = (0..j_max)
        .map(|j| {
            let j = f64::from(j);
            (2.0 * j + 1.0) * (-j * (j + 1.0) * scale).exp()
        })
        .collect();
    stable_sum(&terms)
}

/// Enumerate every valid branch/component/J transition up to J_max as a
/// flat record list. Records carry vacuum wavelengths in meters and
/// partition-normalized intensities.
pub fn transitions(input: LineListInput<'_>) -> Result<Vec<Transition>, LineListError> {
    if !input.rotational_temperature.is_finite() || input.rotational_temperature <= 0.0 {
        return Err(LineListError::InvalidTemperature {
            value: input.rotational_temperature,
        });
    }
    if input.j_max < 1 {
        return Err(LineListError::InvalidJMax { value: input.j_max });
    }

    let origin = input.initial_state.vibrational_term(input.initial_v)
        - input.final_state.vibrational_term(input.final_v);
    let q_norm = partition_normalization(input.j_max, input.rotational_temperature);
    let population_scale =
        HC_OVER_K_CM_K * POPULATION_B_CM / input.rotational_temperature;

    let mut records = Vec::new();
    for j in 0..=input.j_max {
        for branch in [Branch::P, Branch::Q, Branch::R] {
            for omega in component_range(branch) {
                if !is_valid(branch, omega, j) {
                    continue;
                }
                let upper_j = match branch.upper_j(j) {
                    Some(upper_j) => upper_j,
                    None => continue,
                };

                let shift = rotational_term(input.initial_state, input.initial_v, upper_j, omega)?
                    - rotational_term(input.final_state, input.final_v, j, omega)?;
                let wavenumber = origin + shift;
                let wavelength = WAVENUMBER_TO_METERS / wavenumber;

                let jf = f64::from(j);
                let of = f64::from(omega);
                let strength = match branch {
                    Branch::P | Branch::R => (jf + of) * (jf - of) / jf,
                    Branch::Q => (2.0 * jf + 1.0) * of * of / jf,
                };
                let population_exponent = match branch {
                    Branch::P => -jf * (jf - 1.0) * population_scale,
                    Branch::Q | Branch::R => -jf * (jf + 1.0) * population_scale,
                };
                let intensity = strength / q_norm * population_exponent.exp();

                records.push(Transition {
                    branch,
                    omega,
                    j,
                    wavelength,
                    intensity,
                });
            }
        }
    }

    Ok(records)
}

/// Synthesize the sparse line spectrum. Transitions that land on the same
/// wavelength accumulate, which is the physical behavior for coincident
/// lines.
pub fn lines(input: LineListInput<'_>) -> Result<Spectrum, LineListError> {
    let mut spectrum = Spectrum::new();
    for transition in transitions(input)? {
        spectrum.add_intensity_at(transition.wavelength, transition.intensity);
    }
    Ok(spectrum)
}

const fn component_range(branch: Branch) -> std::ops::Range<u8> {
    match branch {
        Branch::P | Branch::R => 0..3,
        // The omega = 0 Q component carries no line strength.
        Branch::Q => 1..3,
    }
}

fn is_valid(branch: Branch, omega: u8, j: u32) -> bool {
    let omega = u32::from(omega);
    match branch {
        Branch::P => j >= 1 && j - 1 >= omega && j >= omega,
        Branch::Q => j >= omega && j >= 1,
        Branch::R => j >= 1 && j + 1 >= omega && j >= omega,
    }
}
