//! Instrument line-shape kernels and the same-length discrete convolution
//! used by spectral broadening.

use crate::domain::RotspecError;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineShape {
    Gaussian,
    Lorentzian,
    /// eta is the Lorentzian fraction of the mixture.
    PseudoVoigt {
        eta: f64,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineShapeError {
    #[error("line width must be finite and > 0, got {value}")]
    InvalidWidth { value: f64 },
    #[error("pseudo-Voigt mixing fraction must be finite and within [0, 1], got {value}")]
    InvalidMixing { value: f64 },
    #[error("broadening requires at least 2 grid points, got {actual}")]
    InsufficientPoints { actual: usize },
}

impl From<LineShapeError> for RotspecError {
    fn from(error: LineShapeError) -> Self {
        RotspecError::input_validation("INPUT.LINESHAPE", error.to_string())
    }
}

/// Sample the kernel on the spectrum's own grid, centered at the grid
/// midpoint. The Gaussian slit is unit-peak; the Lorentzian and the
/// pseudo-Voigt components are area-normalized densities. Downstream
/// normalization makes the amplitude conventions interchangeable.
pub fn sample_kernel(
    grid: &[f64],
    fwhm: f64,
    shape: LineShape,
) -> Result<Vec<f64>, LineShapeError> {
    if !fwhm.is_finite() || fwhm <= 0.0 {
        return Err(LineShapeError::InvalidWidth { value: fwhm });
    }
    if grid.len() < 2 {
        return Err(LineShapeError::InsufficientPoints { actual: grid.len() });
    }
    if let LineShape::PseudoVoigt { eta } = shape {
        if !eta.is_finite() || !(0.0..=1.0).contains(&eta) {
            return Err(LineShapeError::InvalidMixing { value: eta });
        }
    }

    let first = grid[0];
    let last = grid[grid.len() - 1];
    let center = last - (last - first) / 2.0;

    let kernel = grid
        .iter()
        .map(|&wavelength| {
            let delta = wavelength - center;
            match shape {
                LineShape::Gaussian => gaussian_slit(delta, fwhm),
                LineShape::Lorentzian => lorentzian_density(delta, fwhm),
                LineShape::PseudoVoigt { eta } => {
                    eta * lorentzian_density(delta, fwhm)
                        + (1.0 - eta) * gaussian_density(delta, fwhm)
                }
            }
        })
        .collect();

    Ok(kernel)
}

fn gaussian_sigma(fwhm: f64) -> f64 {
    fwhm / (2.0 * std::f64::consts::LN_2).sqrt()
}

fn gaussian_slit(delta: f64, fwhm: f64) -> f64 {
    let sigma = gaussian_sigma(fwhm);
    (-delta.powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn gaussian_density(delta: f64, fwhm: f64) -> f64 {
    let sigma = gaussian_sigma(fwhm);
    gaussian_slit(delta, fwhm) / (sigma * (2.0 * PI).sqrt())
}

fn lorentzian_density(delta: f64, fwhm: f64) -> f64 {
    0.5 * fwhm / PI / (delta.powi(2) + 0.25 * fwhm.powi(2))
}

/// Discrete convolution truncated to the length of the longer operand
/// and centered on the full result (the "same" convolution convention).
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let mut full = vec![0.0; signal.len() + kernel.len() - 1];
    for (i, &sample) in signal.iter().enumerate() {
        if sample == 0.0 {
            continue;
        }
        for (j, &weight) in kernel.iter().enumerate() {
            full[i + j] += sample * weight;
        }
    }

    let output_len = signal.len().max(kernel.len());
    let offset = (signal.len().min(kernel.len()) - 1) / 2;
    full[offset..offset + output_len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::{convolve_same, sample_kernel, LineShape, LineShapeError};

    fn uniform_grid(count: usize, step: f64) -> Vec<f64> {
        (0..count).map(|i| i as f64 * step).collect()
    }

    #[test]
    fn kernel_sampling_rejects_bad_width_mixing_and_grids() {
        let grid = uniform_grid(16, 0.5);
        assert_eq!(
            sample_kernel(&grid, 0.0, LineShape::Gaussian),
            Err(LineShapeError::InvalidWidth { value: 0.0 })
        );
        assert_eq!(
            sample_kernel(&grid, 1.0, LineShape::PseudoVoigt { eta: 1.5 }),
            Err(LineShapeError::InvalidMixing { value: 1.5 })
        );
        assert_eq!(
            sample_kernel(&[1.0], 1.0, LineShape::Lorentzian),
            Err(LineShapeError::InsufficientPoints { actual: 1 })
        );
    }

    #[test]
    fn gaussian_kernel_is_symmetric_with_unit_peak_at_center() {
        let grid = uniform_grid(33, 0.25);
        let kernel = sample_kernel(&grid, 1.0, LineShape::Gaussian).expect("kernel");

        let peak_index = 16;
        assert!((kernel[peak_index] - 1.0).abs() < 1.0e-12);
        for offset in 1..16 {
            let lhs = kernel[peak_index - offset];
            let rhs = kernel[peak_index + offset];
            assert!(
                (lhs - rhs).abs() < 1.0e-12,
                "asymmetric at offset {offset}: {lhs} vs {rhs}"
            );
        }
    }

    #[test]
    fn pseudo_voigt_endpoints_reduce_to_pure_components() {
        let grid = uniform_grid(21, 0.3);
        let lorentzian = sample_kernel(&grid, 0.9, LineShape::Lorentzian).expect("lorentzian");
        let pure_l =
            sample_kernel(&grid, 0.9, LineShape::PseudoVoigt { eta: 1.0 }).expect("eta=1");
        for (a, b) in lorentzian.iter().zip(&pure_l) {
            assert!((a - b).abs() < 1.0e-14);
        }

        let pure_g =
            sample_kernel(&grid, 0.9, LineShape::PseudoVoigt { eta: 0.0 }).expect("eta=0");
        let gaussian = sample_kernel(&grid, 0.9, LineShape::Gaussian).expect("gaussian");
        // Unit-peak slit vs. area-normalized density differ by a constant.
        let ratio = pure_g[10] / gaussian[10];
        for (a, b) in pure_g.iter().zip(&gaussian) {
            if *b > 1.0e-300 {
                assert!((a / b - ratio).abs() < 1.0e-9);
            }
        }
    }

    #[test]
    fn same_mode_convolution_matches_reference_semantics() {
        let out = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(out, vec![1.0, 2.5, 4.0]);
    }

    #[test]
    fn delta_kernel_preserves_the_signal() {
        let signal = [0.0, 4.0, 1.0, 0.0, 2.0];
        let out = convolve_same(&signal, &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(out, signal.to_vec());
    }
}
