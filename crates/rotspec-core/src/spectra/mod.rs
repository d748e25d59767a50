pub mod image;
pub mod lineshape;
pub mod spectrum;

pub use image::{ImageError, Region, RegionGroup, SpectralImage, WaveAxis};
pub use lineshape::{convolve_same, sample_kernel, LineShape, LineShapeError};
pub use spectrum::{Spectrum, SpectrumError};
