pub mod spline;
pub mod temperature;

pub use spline::{CubicSpline, SplineError};
pub use temperature::{FitSettings, SequencePoint, SolverError, TemperatureSolver};
