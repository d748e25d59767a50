//! Rotational term energies for triplet Pi states, split across the three
//! spin components.

use crate::domain::RotspecError;
use crate::molecules::MolecularState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TermError {
    #[error("omega was {omega} but can only be 0, 1 or 2")]
    InvalidSpinComponent { omega: u8 },
}

impl From<TermError> for RotspecError {
    fn from(error: TermError) -> Self {
        RotspecError::input_validation("INPUT.OMEGA_RANGE", error.to_string())
    }
}

/// Auxiliary spin-splitting quantities shared by the three component
/// formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplittingTerms {
    pub z1: f64,
    pub z2: f64,
}

/// Z1 and Z2 for a state at (v, J). Z2 divides by Z1; J=0 with certain
/// components can drive that denominator toward zero, so callers keep
/// their loop bounds inside the valid branch/component combinations.
pub fn splitting_terms(state: &dyn MolecularState, v: u32, j: u32) -> SplittingTerms {
    let y = state.spin_splitting_ratio(v);
    let jj1 = f64::from(j) * f64::from(j + 1);
    let z1 = y * (y - 4.0) + 4.0 / 3.0 + 4.0 * jj1;
    let z2 = (y * (y - 1.0) - 4.0 / 9.0 - 2.0 * jj1) / (3.0 * z1);
    SplittingTerms { z1, z2 }
}

/// Rotational term energy F(v, J, omega) in cm^-1.
pub fn rotational_term(
    state: &dyn MolecularState,
    v: u32,
    j: u32,
    omega: u8,
) -> Result<f64, TermError> {
    let b = state.rotational_constant(v);
    let d = state.centrifugal_distortion(v);
    let SplittingTerms { z1, z2 } = splitting_terms(state, v, j);
    let jj1 = f64::from(j) * f64::from(j + 1);
    let j = f64::from(j);

    match omega {
        0 => Ok(b * (jj1 - z1.sqrt() - 2.0 * z2) - d * (j - 0.5).powi(4)),
        1 => Ok(b * (jj1 + 4.0 * z2) - d * (j + 0.5).powi(4)),
        2 => Ok(b * (jj1 + z1.sqrt() - 2.0 * z2) - d * (j + 1.5).powi(4)),
        omega => Err(TermError::InvalidSpinComponent { omega }),
    }
}
