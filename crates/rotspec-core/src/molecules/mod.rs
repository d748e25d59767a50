//! Molecular constants provider.
//!
//! Each electronic state is one immutable table of literature constants;
//! the four capability functions E/B/Y/D are polynomial expansions in
//! (v + 1/2). Consumers depend on the [`MolecularState`] trait so the
//! synthesis kernels stay independent of which constant set is loaded.

pub mod n2;
pub mod n2_roux;

use serde::{Deserialize, Serialize};

/// Capability interface of one electronic state: the four per-v functions
/// the term-energy and line-list kernels require. All four must be finite
/// for any v a caller uses.
pub trait MolecularState {
    /// Vibrational term energy E(v), cm^-1, including the electronic term.
    fn vibrational_term(&self, v: u32) -> f64;
    /// Rotational constant B(v), cm^-1.
    fn rotational_constant(&self, v: u32) -> f64;
    /// Spin-splitting ratio Y(v) = A / B(v), dimensionless.
    fn spin_splitting_ratio(&self, v: u32) -> f64;
    /// Centrifugal distortion constant D(v), cm^-1.
    fn centrifugal_distortion(&self, v: u32) -> f64;
}

/// One electronic state's constant table. The rotational polynomial
/// carries its signs in the coefficients; the distortion expansion keeps
/// its own alpha because published tables occasionally use a different
/// value there than in B(v).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectronicStateConstants {
    pub label: &'static str,
    /// Electronic origin T0, cm^-1. Equals E(0) by construction of Te.
    pub electronic_origin: f64,
    pub omega: f64,
    pub omega_x: f64,
    pub omega_y: f64,
    pub omega_z: f64,
    /// B(v) = sum over k of rotational[k] * (v + 1/2)^k.
    pub rotational: &'static [f64],
    /// Spin-orbit coupling A, cm^-1.
    pub spin_orbit_coupling: f64,
    /// Alpha used by the centrifugal distortion expansion.
    pub distortion_alpha: f64,
}

impl ElectronicStateConstants {
    fn half_quantum(v: u32) -> f64 {
        f64::from(v) + 0.5
    }
}

impl MolecularState for ElectronicStateConstants {
    fn vibrational_term(&self, v: u32) -> f64 {
        let x = Self::half_quantum(v);
        let te = self.electronic_origin - self.omega / 2.0 + self.omega_x / 4.0
            - self.omega_y / 8.0
            - self.omega_z / 16.0;
        te + self.omega * x - self.omega_x * x.powi(2)
            + self.omega_y * x.powi(3)
            + self.omega_z * x.powi(4)
    }

    fn rotational_constant(&self, v: u32) -> f64 {
        let x = Self::half_quantum(v);
        self.rotational
            .iter()
            .rev()
            .fold(0.0, |acc, coefficient| acc * x + coefficient)
    }

    fn spin_splitting_ratio(&self, v: u32) -> f64 {
        self.spin_orbit_coupling / self.rotational_constant(v)
    }

    fn centrifugal_distortion(&self, v: u32) -> f64 {
        let b_e = self.rotational[0];
        let alpha = self.distortion_alpha;
        let d_e = 4.0 * b_e.powi(3) / self.omega.powi(2);
        let beta = d_e
            * (8.0 * self.omega_x / self.omega
                - 5.0 * alpha / b_e
                - alpha.powi(2) * self.omega / (24.0 * b_e.powi(3)));
        d_e + beta * Self::half_quantum(v)
    }
}

/// Which literature constant set drives a synthesis run. Selected by
/// configuration, not by type machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstantSet {
    LaherGilmore,
    Roux,
}

impl ConstantSet {
    /// Upper state of the N2 second positive system, C3Piu.
    pub const fn upper_state(self) -> &'static ElectronicStateConstants {
        match self {
            Self::LaherGilmore => &n2::C3PIU,
            Self::Roux => &n2_roux::C3PIU,
        }
    }

    /// Lower state, B3Pig.
    pub const fn lower_state(self) -> &'static ElectronicStateConstants {
        match self {
            Self::LaherGilmore => &n2::B3PIG,
            Self::Roux => &n2_roux::B3PIG,
        }
    }
}
