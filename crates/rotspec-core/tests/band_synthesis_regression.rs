use rotspec_core::molecules::{ConstantSet, MolecularState};
use rotspec_core::numerics::linear_grid;
use rotspec_core::spectra::{LineShape, Spectrum};
use rotspec_core::synth::{lines, rotational_term, transitions, LineListInput};

fn second_positive_input(j_max: u32, temperature: f64) -> LineListInput<'static> {
    let set = ConstantSet::LaherGilmore;
    LineListInput::new(
        set.upper_state(),
        0,
        set.lower_state(),
        0,
        j_max,
        temperature,
    )
}

#[test]
fn term_energies_stay_finite_across_the_working_quantum_range() {
    for set in [ConstantSet::LaherGilmore, ConstantSet::Roux] {
        for state in [set.upper_state(), set.lower_state()] {
            for v in 0..4 {
                assert!(state.vibrational_term(v).is_finite());
                for j in 1..=60u32 {
                    for omega in 0..=2u8 {
                        if u32::from(omega) > j {
                            continue;
                        }
                        let term = rotational_term(state, v, j, omega)
                            .expect("component within range");
                        assert!(
                            term.is_finite(),
                            "non-finite term at v={} J={} omega={}",
                            v,
                            j,
                            omega
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn synthesized_band_is_normalizable_for_any_realistic_temperature() {
    for temperature in [150.0, 450.0, 1200.0, 4000.0] {
        let spectrum = lines(second_positive_input(50, temperature)).expect("line spectrum");
        let magnitude: f64 = spectrum.intensities().iter().map(|i| i.abs()).sum();
        assert!(
            magnitude > 0.0,
            "no intensity synthesized at {} K",
            temperature
        );
        spectrum.normalize(1.0).expect("normalizable");
    }
}

#[test]
fn zero_zero_band_head_lands_near_337_nm() {
    let spectrum = lines(second_positive_input(50, 450.0)).expect("line spectrum");
    assert!(!spectrum.is_empty());

    let head_nm = spectrum.wavelengths().last().copied().unwrap_or(0.0) * 1.0e9;
    assert!(
        (head_nm - 337.1).abs() < 0.5,
        "band head at {} nm, expected close to 337.1 nm",
        head_nm
    );

    // Intensity should concentrate close to the head at moderate
    // rotational temperature.
    let peak_index = spectrum
        .intensities()
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(index, _)| index)
        .expect("non-empty");
    let peak_nm = spectrum.wavelengths()[peak_index] * 1.0e9;
    assert!(
        head_nm - peak_nm < 2.0,
        "strongest line at {} nm sits too far from the {} nm head",
        peak_nm,
        head_nm
    );
}

#[test]
fn every_record_satisfies_the_branch_validity_constraints() {
    let records = transitions(second_positive_input(30, 450.0)).expect("records");
    for record in &records {
        let omega = u32::from(record.omega);
        assert!(record.j >= omega, "omega must not exceed J: {:?}", record);
        if let Some(upper_j) = record.branch.upper_j(record.j) {
            assert!(upper_j >= omega, "upper level out of range: {:?}", record);
        } else {
            panic!("record with no upper level: {:?}", record);
        }
        assert!(record.intensity >= 0.0);
        assert!(record.wavelength > 0.0);
    }
}

#[test]
fn resampling_the_band_onto_an_instrument_grid_conserves_intensity() {
    let spectrum = lines(second_positive_input(50, 450.0)).expect("line spectrum");
    let grid = linear_grid(325.0e-9, 341.0e-9, 1024).expect("grid");
    let resampled = spectrum.resample_onto(&grid).expect("resample");

    let before = spectrum.total_intensity();
    let after = resampled.total_intensity();
    assert!(
        (before - after).abs() <= 1.0e-12 * before.abs().max(1.0),
        "intensity drifted from {} to {}",
        before,
        after
    );
}

#[test]
fn full_synthesis_pipeline_yields_a_unit_peak_profile() {
    let spectrum = lines(second_positive_input(50, 450.0)).expect("line spectrum");
    let grid = linear_grid(325.0e-9, 341.0e-9, 1024).expect("grid");
    let profile = spectrum
        .resample_onto(&grid)
        .expect("resample")
        .broaden(1.30e-10, LineShape::Gaussian)
        .expect("broaden")
        .normalize(1.0)
        .expect("normalize");

    assert_eq!(profile.len(), grid.len());
    assert!((profile.peak_intensity() - 1.0).abs() < 1.0e-12);
}

#[test]
fn unit_intensity_spectrum_normalizes_to_the_requested_reference() {
    let spectrum =
        Spectrum::from_pairs(vec![1.0, 2.0, 3.0], vec![1.0, 1.0, 1.0]).expect("spectrum");
    let normalized = spectrum.normalize(2.0).expect("normalize");
    assert_eq!(normalized.intensities(), &[2.0, 2.0, 2.0]);
}
