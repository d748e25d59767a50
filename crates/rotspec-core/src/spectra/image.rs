//! Reduction of a 2D spectral image (a slit image from a CCD) to a 1D
//! spectrum via background-subtracted line averaging.

use crate::domain::RotspecError;
use crate::numerics::linear_grid;
use crate::spectra::spectrum::Spectrum;
use serde::{Deserialize, Serialize};

/// Which image direction wavelength runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaveAxis {
    Columns,
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionGroup {
    Background,
    Data,
}

impl RegionGroup {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Data => "data",
        }
    }
}

/// A band of pixel lines across the non-wavelength axis, inclusive on
/// both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Region {
    pub min: usize,
    pub max: usize,
    pub group: RegionGroup,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageError {
    #[error("image must contain at least one pixel")]
    EmptyImage,
    #[error("image rows must have uniform length: row {row} has {actual}, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("region [{min}, {max}] exceeds the cross-axis extent {extent}")]
    RegionOutOfBounds {
        min: usize,
        max: usize,
        extent: usize,
    },
    #[error("wavelength bounds must satisfy start < end, got [{start}, {end}]")]
    InvalidBounds { start: f64, end: f64 },
    #[error("the starting and ending wavelengths must be specified before collapsing")]
    MissingBounds,
    #[error("wavelength axis needs at least 2 pixels, got {extent}")]
    DegenerateAxis { extent: usize },
    #[error("no pixel lines accumulated for the {} region group", group.as_str())]
    ZeroRegionLines { group: RegionGroup },
}

impl From<ImageError> for RotspecError {
    fn from(error: ImageError) -> Self {
        match error {
            ImageError::MissingBounds => {
                RotspecError::io_system("IO.WAVELENGTH_BOUNDS", error.to_string())
            }
            ImageError::ZeroRegionLines { .. } => {
                RotspecError::computation("RUN.REGION_DEGENERATE", error.to_string())
            }
            _ => RotspecError::input_validation("INPUT.IMAGE", error.to_string()),
        }
    }
}

/// A single-channel intensity grid plus the reduction geometry: wave
/// axis, wavelength bounds, and non-overlapping background/data regions.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralImage {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    wave_axis: WaveAxis,
    start: Option<f64>,
    end: Option<f64>,
    regions: Vec<Region>,
}

impl SpectralImage {
    pub fn from_grid(grid: Vec<Vec<f64>>, wave_axis: WaveAxis) -> Result<Self, ImageError> {
        let rows = grid.len();
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(ImageError::EmptyImage);
        }
        let mut data = Vec::with_capacity(rows * cols);
        for (row, values) in grid.into_iter().enumerate() {
            if values.len() != cols {
                return Err(ImageError::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }

        Ok(Self {
            rows,
            cols,
            data,
            wave_axis,
            start: None,
            end: None,
            regions: Vec::new(),
        })
    }

    pub fn set_wavelength_bounds(&mut self, start: f64, end: f64) -> Result<(), ImageError> {
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(ImageError::InvalidBounds { start, end });
        }
        self.start = Some(start);
        self.end = Some(end);
        Ok(())
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Pixels along the wavelength direction.
    pub fn wavelength_extent(&self) -> usize {
        match self.wave_axis {
            WaveAxis::Columns => self.cols,
            WaveAxis::Rows => self.rows,
        }
    }

    /// Pixel lines across the wavelength direction; regions index these.
    pub fn cross_extent(&self) -> usize {
        match self.wave_axis {
            WaveAxis::Columns => self.rows,
            WaveAxis::Rows => self.cols,
        }
    }

    /// Add a region, resolving conflicts with the existing set: a
    /// candidate contained inside an existing region is redundant and
    /// dropped, a candidate that swallows an existing region replaces it,
    /// and partial overlaps are clipped to the free gap. Returns the
    /// region actually stored, if any.
    pub fn add_region(&mut self, region: Region) -> Result<Option<Region>, ImageError> {
        let (mut lo, mut hi) = if region.min <= region.max {
            (region.min, region.max)
        } else {
            (region.max, region.min)
        };
        if hi >= self.cross_extent() {
            return Err(ImageError::RegionOutOfBounds {
                min: lo,
                max: hi,
                extent: self.cross_extent(),
            });
        }

        let mut index = 0;
        while index < self.regions.len() {
            let existing = self.regions[index];
            if existing.min <= lo && existing.max >= hi {
                return Ok(None);
            }
            if existing.min >= lo && existing.max <= hi {
                self.regions.remove(index);
                continue;
            }
            if existing.min <= lo && lo <= existing.max {
                lo = existing.max + 1;
            } else if existing.min <= hi && hi <= existing.max {
                hi = existing.min - 1;
            }
            index += 1;
        }

        if lo > hi {
            return Ok(None);
        }

        let stored = Region {
            min: lo,
            max: hi,
            group: region.group,
        };
        self.regions.push(stored);
        Ok(Some(stored))
    }

    fn pixel(&self, line: usize, along_wave: usize) -> f64 {
        match self.wave_axis {
            WaveAxis::Columns => self.data[line * self.cols + along_wave],
            WaveAxis::Rows => self.data[along_wave * self.cols + line],
        }
    }

    /// Reduce the image to a spectrum: average the background lines,
    /// average the data lines, subtract, and attach the linear wavelength
    /// grid spanned by the configured bounds.
    pub fn collapse(&self) -> Result<Spectrum, ImageError> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(ImageError::MissingBounds);
        };
        let extent = self.wavelength_extent();
        let wavelengths =
            linear_grid(start, end, extent).ok_or(ImageError::DegenerateAxis { extent })?;

        let mut background = vec![0.0; extent];
        let mut background_lines = 0usize;
        let mut data = vec![0.0; extent];
        let mut data_lines = 0usize;

        for region in &self.regions {
            let (profile, lines) = match region.group {
                RegionGroup::Background => (&mut background, &mut background_lines),
                RegionGroup::Data => (&mut data, &mut data_lines),
            };
            for line in region.min..=region.max {
                for (along_wave, slot) in profile.iter_mut().enumerate() {
                    *slot += self.pixel(line, along_wave);
                }
            }
            *lines += region.max - region.min + 1;
        }

        if background_lines == 0 {
            return Err(ImageError::ZeroRegionLines {
                group: RegionGroup::Background,
            });
        }
        if data_lines == 0 {
            return Err(ImageError::ZeroRegionLines {
                group: RegionGroup::Data,
            });
        }

        let intensities: Vec<f64> = data
            .iter()
            .zip(&background)
            .map(|(d, b)| d / data_lines as f64 - b / background_lines as f64)
            .collect();

        Spectrum::from_pairs(wavelengths, intensities)
            .map_err(|_| ImageError::DegenerateAxis { extent })
    }
}
