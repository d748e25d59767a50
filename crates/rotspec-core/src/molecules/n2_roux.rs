//! N2 second-positive-system constants from Roux, Michaud and Vervloet.
//!
//! The C-state distortion alpha is kept exactly as published in the source
//! table even though the B(v) polynomial uses a different linear
//! coefficient; the tables are data, not derived quantities.

use super::ElectronicStateConstants;

pub static B3PIG: ElectronicStateConstants = ElectronicStateConstants {
    label: "N2 B3Pig (Roux)",
    electronic_origin: 59_306.8,
    omega: 1_734.022,
    omega_x: 14.410,
    omega_y: -0.0045,
    omega_z: -0.000_43,
    rotational: &[1.637_69, -0.1786, -0.000_14, 0.000_010, -0.000_004],
    spin_orbit_coupling: 42.256,
    distortion_alpha: 0.1786,
};

pub static C3PIU: ElectronicStateConstants = ElectronicStateConstants {
    label: "N2 C3Piu (Roux)",
    electronic_origin: 88_977.9,
    omega: 2_047.7928,
    omega_x: 28.9421,
    omega_y: 2.245_37,
    omega_z: -5.511_96e-1,
    rotational: &[1.8268, -0.024, 0.0019, -0.0006],
    spin_orbit_coupling: 39.5,
    distortion_alpha: 0.24,
};
