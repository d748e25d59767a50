//! Rovibrational temperature estimation for diatomic emission spectra.
//!
//! The crate synthesizes candidate N2 second-positive-system spectra
//! across a temperature grid, reduces measured spectrograph images to 1D
//! spectra, and locates the rotational temperature whose synthetic
//! spectrum best matches the measurement.

pub mod common;
pub mod domain;
pub mod molecules;
pub mod numerics;
pub mod solver;
pub mod spectra;
pub mod synth;
