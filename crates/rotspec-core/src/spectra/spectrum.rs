use crate::common::constants::{
    AIR_DISPERSION_CONSTANT, AIR_DISPERSION_QUADRATIC, AIR_DISPERSION_QUARTIC, ANGSTROM_M,
};
use crate::domain::RotspecError;
use crate::numerics::stable_sum;
use crate::spectra::lineshape::{convolve_same, sample_kernel, LineShape, LineShapeError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    #[error("wavelengths and intensities must have equal length: {wavelengths} vs {intensities}")]
    LengthMismatch {
        wavelengths: usize,
        intensities: usize,
    },
    #[error("wavelength must be finite at index {index}, got {value}")]
    NonFiniteWavelength { index: usize, value: f64 },
    #[error(
        "wavelength grid must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingWavelength {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("cannot normalize an empty spectrum")]
    EmptyNormalization,
    #[error("cannot normalize an all-zero spectrum")]
    ZeroNormalization,
    #[error("resampling target grid must not be empty")]
    EmptyTargetGrid,
}

impl From<SpectrumError> for RotspecError {
    fn from(error: SpectrumError) -> Self {
        match error {
            SpectrumError::EmptyNormalization | SpectrumError::ZeroNormalization => {
                RotspecError::computation("RUN.SPECTRUM_DEGENERATE", error.to_string())
            }
            _ => RotspecError::input_validation("INPUT.SPECTRUM", error.to_string()),
        }
    }
}

/// An ordered, unique-keyed mapping from vacuum wavelength (meters) to
/// intensity. The two arrays always have matching length and the
/// wavelengths stay strictly increasing; point writes insert at the
/// position the value dictates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl Spectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spectrum over the given grid with all intensities zero.
    pub fn from_wavelengths(wavelengths: Vec<f64>) -> Result<Self, SpectrumError> {
        validate_grid(&wavelengths)?;
        let intensities = vec![0.0; wavelengths.len()];
        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    pub fn from_pairs(
        wavelengths: Vec<f64>,
        intensities: Vec<f64>,
    ) -> Result<Self, SpectrumError> {
        if wavelengths.len() != intensities.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelengths: wavelengths.len(),
                intensities: intensities.len(),
            });
        }
        validate_grid(&wavelengths)?;
        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    fn position(&self, wavelength: f64) -> Result<usize, usize> {
        self.wavelengths
            .binary_search_by(|probe| probe.total_cmp(&wavelength))
    }

    /// Intensity at an exact wavelength key, if present.
    pub fn intensity_at(&self, wavelength: f64) -> Option<f64> {
        self.position(wavelength)
            .ok()
            .map(|index| self.intensities[index])
    }

    /// Overwrite the intensity at a key, inserting the key in sorted
    /// position if it is new.
    pub fn set_intensity_at(&mut self, wavelength: f64, intensity: f64) {
        match self.position(wavelength) {
            Ok(index) => self.intensities[index] = intensity,
            Err(index) => {
                self.wavelengths.insert(index, wavelength);
                self.intensities.insert(index, intensity);
            }
        }
    }

    /// Accumulate intensity at a key; coincident lines add.
    pub fn add_intensity_at(&mut self, wavelength: f64, intensity: f64) {
        match self.position(wavelength) {
            Ok(index) => self.intensities[index] += intensity,
            Err(index) => {
                self.wavelengths.insert(index, wavelength);
                self.intensities.insert(index, intensity);
            }
        }
    }

    /// Union of two spectra; intensities at exactly matching wavelengths
    /// add.
    pub fn merge(&self, other: &Self) -> Self {
        let mut output = self.clone();
        for (wavelength, intensity) in other.points() {
            output.add_intensity_at(wavelength, intensity);
        }
        output
    }

    /// As merge, subtracting; keys present only in `other` appear with
    /// negated intensity.
    pub fn subtract(&self, other: &Self) -> Self {
        let mut output = self.clone();
        for (wavelength, intensity) in other.points() {
            match output.position(wavelength) {
                Ok(index) => output.intensities[index] -= intensity,
                Err(index) => {
                    output.wavelengths.insert(index, wavelength);
                    output.intensities.insert(index, -intensity);
                }
            }
        }
        output
    }

    pub fn total_intensity(&self) -> f64 {
        stable_sum(&self.intensities)
    }

    /// Largest absolute intensity; zero for an empty spectrum.
    pub fn peak_intensity(&self) -> f64 {
        self.intensities
            .iter()
            .fold(0.0_f64, |peak, value| peak.max(value.abs()))
    }

    /// Scale all intensities so the peak magnitude equals `reference`.
    pub fn normalize(&self, reference: f64) -> Result<Self, SpectrumError> {
        if self.is_empty() {
            return Err(SpectrumError::EmptyNormalization);
        }
        let maximum = self.peak_intensity();
        if maximum == 0.0 {
            return Err(SpectrumError::ZeroNormalization);
        }

        // Applied per element so the peak maps to reference exactly.
        let intensities = self
            .intensities
            .iter()
            .map(|i| reference * i / maximum)
            .collect();
        Ok(Self {
            wavelengths: self.wavelengths.clone(),
            intensities,
        })
    }

    /// Redistribute this spectrum onto an arbitrary strictly increasing
    /// target grid. Each source point splits between its two bracketing
    /// target points in proportion to inverse distance, so total intensity
    /// is conserved; points outside the target range fold into the nearest
    /// edge bin.
    pub fn resample_onto(&self, target: &[f64]) -> Result<Self, SpectrumError> {
        if target.is_empty() {
            return Err(SpectrumError::EmptyTargetGrid);
        }
        validate_grid(target)?;

        let last = target.len() - 1;
        let mut intensities = vec![0.0; target.len()];
        for (wavelength, intensity) in self.points() {
            if wavelength <= target[0] {
                intensities[0] += intensity;
            } else if wavelength >= target[last] {
                intensities[last] += intensity;
            } else {
                let upper = target.partition_point(|edge| *edge < wavelength);
                let lower = upper - 1;
                let width = target[upper] - target[lower];
                let lower_share = intensity * (target[upper] - wavelength) / width;
                intensities[lower] += lower_share;
                intensities[upper] += intensity - lower_share;
            }
        }

        Ok(Self {
            wavelengths: target.to_vec(),
            intensities,
        })
    }

    /// Convolve with an instrument line shape sampled on this spectrum's
    /// own grid, preserving length. The grid is assumed regularly sampled,
    /// which holds for collapsed and resampled spectra.
    pub fn broaden(&self, fwhm: f64, shape: LineShape) -> Result<Self, LineShapeError> {
        let kernel = sample_kernel(&self.wavelengths, fwhm, shape)?;
        let intensities = convolve_same(&self.intensities, &kernel);
        Ok(Self {
            wavelengths: self.wavelengths.clone(),
            intensities,
        })
    }

    /// Rigid wavelength calibration shift; a uniform offset preserves the
    /// ordering invariant.
    pub fn shift_wavelengths(&mut self, delta: f64) {
        for wavelength in &mut self.wavelengths {
            *wavelength += delta;
        }
    }

    /// In-place vacuum to air wavelength conversion via the empirical
    /// dispersion-of-air correction, evaluated in Angstrom.
    pub fn convert_to_air(&mut self) {
        for wavelength in &mut self.wavelengths {
            let w = *wavelength / ANGSTROM_M;
            let corrected = w
                / (1.0
                    + AIR_DISPERSION_CONSTANT
                    + AIR_DISPERSION_QUADRATIC / w.powi(2)
                    + AIR_DISPERSION_QUARTIC / w.powi(4));
            *wavelength = corrected * ANGSTROM_M;
        }
    }

    /// One `wavelength, intensity` line per point, no header.
    pub fn render_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.len());
        for (wavelength, intensity) in self.points() {
            lines.push(format!("{:e}, {:e}", wavelength, intensity));
        }
        let mut output = lines.join("\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

fn validate_grid(wavelengths: &[f64]) -> Result<(), SpectrumError> {
    for (index, value) in wavelengths.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(SpectrumError::NonFiniteWavelength { index, value });
        }
        if index > 0 {
            let previous = wavelengths[index - 1];
            if value <= previous {
                return Err(SpectrumError::NonIncreasingWavelength {
                    index,
                    previous,
                    current: value,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Spectrum, SpectrumError};
    use crate::spectra::lineshape::LineShape;

    #[test]
    fn construction_rejects_mismatched_and_disordered_inputs() {
        let error = Spectrum::from_pairs(vec![1.0, 2.0], vec![1.0]).expect_err("length mismatch");
        assert_eq!(
            error,
            SpectrumError::LengthMismatch {
                wavelengths: 2,
                intensities: 1,
            }
        );

        let error =
            Spectrum::from_pairs(vec![2.0, 1.0], vec![0.0, 0.0]).expect_err("disordered grid");
        assert_eq!(
            error,
            SpectrumError::NonIncreasingWavelength {
                index: 1,
                previous: 2.0,
                current: 1.0,
            }
        );
    }

    #[test]
    fn point_writes_keep_sorted_order_and_distinguish_set_from_add() {
        let mut spectrum = Spectrum::new();
        spectrum.add_intensity_at(2.0, 1.0);
        spectrum.add_intensity_at(1.0, 0.5);
        spectrum.add_intensity_at(3.0, 0.25);
        assert_eq!(spectrum.wavelengths(), &[1.0, 2.0, 3.0]);

        spectrum.add_intensity_at(2.0, 1.0);
        assert_eq!(spectrum.intensity_at(2.0), Some(2.0));

        spectrum.set_intensity_at(2.0, 7.0);
        assert_eq!(spectrum.intensity_at(2.0), Some(7.0));
        assert_eq!(spectrum.len(), 3);
    }

    #[test]
    fn merge_adds_matching_keys_and_inserts_the_rest() {
        let a = Spectrum::from_pairs(vec![1.0, 2.0], vec![1.0, 1.0]).expect("a");
        let b = Spectrum::from_pairs(vec![2.0, 3.0], vec![0.5, 0.25]).expect("b");
        let merged = a.merge(&b);
        assert_eq!(merged.wavelengths(), &[1.0, 2.0, 3.0]);
        assert_eq!(merged.intensities(), &[1.0, 1.5, 0.25]);
    }

    #[test]
    fn subtract_negates_keys_missing_from_the_left_operand() {
        let a = Spectrum::from_pairs(vec![1.0, 2.0], vec![1.0, 1.0]).expect("a");
        let b = Spectrum::from_pairs(vec![2.0, 3.0], vec![0.5, 0.25]).expect("b");
        let difference = a.subtract(&b);
        assert_eq!(difference.wavelengths(), &[1.0, 2.0, 3.0]);
        assert_eq!(difference.intensities(), &[1.0, 0.5, -0.25]);
    }

    #[test]
    fn normalize_scales_peak_magnitude_to_reference() {
        let spectrum = Spectrum::from_pairs(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 1.0]).expect("s");
        let normalized = spectrum.normalize(2.0).expect("normalize");
        assert_eq!(normalized.intensities(), &[2.0, 2.0, 2.0]);

        let signed =
            Spectrum::from_pairs(vec![1.0, 2.0], vec![-4.0, 2.0]).expect("signed spectrum");
        let normalized = signed.normalize(1.0).expect("normalize");
        assert_eq!(normalized.intensities(), &[-1.0, 0.5]);
        assert_eq!(normalized.peak_intensity(), 1.0);
    }

    #[test]
    fn normalize_rejects_empty_and_all_zero_spectra() {
        assert_eq!(
            Spectrum::new().normalize(1.0),
            Err(SpectrumError::EmptyNormalization)
        );
        let zero = Spectrum::from_wavelengths(vec![1.0, 2.0]).expect("zero spectrum");
        assert_eq!(zero.normalize(1.0), Err(SpectrumError::ZeroNormalization));
    }

    #[test]
    fn resample_conserves_total_intensity_on_a_covering_grid() {
        let source = Spectrum::from_pairs(
            vec![1.05, 1.5, 2.31, 2.9, 3.55],
            vec![0.4, 1.2, 0.8, 2.0, 0.6],
        )
        .expect("source");
        let target: Vec<f64> = (0..9).map(|i| 1.0 + 0.375 * i as f64).collect();
        let resampled = source.resample_onto(&target).expect("resample");

        assert_eq!(resampled.len(), target.len());
        assert!(
            (resampled.total_intensity() - source.total_intensity()).abs() < 1.0e-12,
            "total intensity drifted: {} vs {}",
            resampled.total_intensity(),
            source.total_intensity()
        );
    }

    #[test]
    fn resample_folds_out_of_range_points_into_edge_bins() {
        let source =
            Spectrum::from_pairs(vec![0.5, 2.0, 9.0], vec![1.0, 1.0, 3.0]).expect("source");
        let resampled = source.resample_onto(&[1.0, 2.0, 3.0]).expect("resample");
        assert_eq!(resampled.intensities(), &[1.0, 1.0, 3.0]);
    }

    #[test]
    fn broaden_then_normalize_is_scale_invariant() {
        let grid: Vec<f64> = (0..64).map(|i| i as f64 * 0.1).collect();
        let mut small = Spectrum::from_wavelengths(grid.clone()).expect("small");
        small.set_intensity_at(3.2, 1.0);
        let mut large = Spectrum::from_wavelengths(grid).expect("large");
        large.set_intensity_at(3.2, 250.0);

        let small = small
            .broaden(0.4, LineShape::Gaussian)
            .expect("broaden small")
            .normalize(1.0)
            .expect("normalize small");
        let large = large
            .broaden(0.4, LineShape::Gaussian)
            .expect("broaden large")
            .normalize(1.0)
            .expect("normalize large");

        assert_eq!(small.peak_intensity(), 1.0);
        for (a, b) in small.intensities().iter().zip(large.intensities()) {
            assert!((a - b).abs() < 1.0e-12);
        }
    }

    #[test]
    fn air_conversion_pulls_uv_wavelengths_down_by_the_refractive_index() {
        let mut spectrum =
            Spectrum::from_pairs(vec![337.1e-9], vec![1.0]).expect("single line");
        spectrum.convert_to_air();
        let air = spectrum.wavelengths()[0];
        assert!(air < 337.1e-9);
        assert!(337.1e-9 - air < 0.2e-9, "air shift too large: {}", air);
    }

    #[test]
    fn csv_rendering_is_one_pair_per_line_without_header() {
        let spectrum =
            Spectrum::from_pairs(vec![1.0, 2.5], vec![0.5, 0.25]).expect("spectrum");
        let csv = spectrum.render_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1e0, 5e-1");
        assert_eq!(lines[1], "2.5e0, 2.5e-1");
    }
}
