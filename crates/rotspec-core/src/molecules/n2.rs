//! N2 second-positive-system constants from Laher and Gilmore's 1990
//! improved fits.

use super::ElectronicStateConstants;

pub static B3PIG: ElectronicStateConstants = ElectronicStateConstants {
    label: "N2 B3Pig (Laher-Gilmore)",
    electronic_origin: 59_306.8,
    omega: 1_734.38,
    omega_x: 14.558,
    omega_y: 1.397e-2,
    omega_z: -1.127e-3,
    rotational: &[1.638_02, -1.8302e-2, -8.36e-6, -3.39e-6],
    spin_orbit_coupling: 42.24,
    distortion_alpha: 1.8302e-2,
};

pub static C3PIU: ElectronicStateConstants = ElectronicStateConstants {
    label: "N2 C3Piu (Laher-Gilmore)",
    electronic_origin: 88_977.9,
    omega: 2_047.17,
    omega_x: 28.445,
    omega_y: 2.0883,
    omega_z: -5.350e-1,
    rotational: &[1.8247, -1.868e-2, -2.28e-3, 7.33e-4, -1.5e-4],
    spin_orbit_coupling: 39.2,
    distortion_alpha: 1.868e-2,
};
