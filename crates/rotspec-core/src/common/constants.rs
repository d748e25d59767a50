//! Physical constants shared across the synthesis kernels.
//!
//! Values are in CGS units to match the wavenumber (cm^-1) molecular
//! constant tables; the shared table avoids ad hoc per-module literals.

/// Planck constant, erg s.
pub const PLANCK_ERG_S: f64 = 6.626_069_57e-27;
/// Speed of light, cm/s.
pub const LIGHT_SPEED_CM_S: f64 = 2.997_924_58e10;
/// Boltzmann constant, erg/K.
pub const BOLTZMANN_ERG_K: f64 = 1.380_648_8e-16;

/// Fixed rotational constant used by the Boltzmann population factors and
/// the partition sum, cm^-1. A single global approximation, distinct from
/// any electronic state's own B(v).
pub const POPULATION_B_CM: f64 = 1.9898;

/// hc/k in cm K; multiplying by a wavenumber gives the temperature scale
/// of one rotational quantum.
pub const HC_OVER_K_CM_K: f64 = PLANCK_ERG_S * LIGHT_SPEED_CM_S / BOLTZMANN_ERG_K;

/// 1 / (100 * wavenumber_cm) converts cm^-1 to a vacuum wavelength in
/// meters.
pub const WAVENUMBER_TO_METERS: f64 = 1.0 / 100.0;

/// Edlen-style dispersion-of-air coefficients, applied to wavelengths
/// expressed in Angstrom.
pub const AIR_DISPERSION_CONSTANT: f64 = 2.735_182e-4;
pub const AIR_DISPERSION_QUADRATIC: f64 = 131.4182;
pub const AIR_DISPERSION_QUARTIC: f64 = 2.762_49e8;

/// Meters per Angstrom.
pub const ANGSTROM_M: f64 = 1.0e-10;

#[cfg(test)]
mod tests {
    use super::{
        BOLTZMANN_ERG_K, HC_OVER_K_CM_K, LIGHT_SPEED_CM_S, PLANCK_ERG_S, POPULATION_B_CM,
    };

    #[test]
    fn constants_remain_finite_and_positive() {
        for value in [
            PLANCK_ERG_S,
            LIGHT_SPEED_CM_S,
            BOLTZMANN_ERG_K,
            POPULATION_B_CM,
            HC_OVER_K_CM_K,
        ] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }

    #[test]
    fn rotational_quantum_scale_matches_expected_magnitude() {
        // hc/k ~ 1.4388 cm K; one 2 cm^-1 quantum is a few kelvin.
        assert!((HC_OVER_K_CM_K - 1.4388).abs() < 1.0e-3);
        let quantum_kelvin = HC_OVER_K_CM_K * POPULATION_B_CM;
        assert!(quantum_kelvin > 2.0 && quantum_kelvin < 3.5);
    }
}
