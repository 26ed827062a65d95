//! 2D FFT engine for image channels
//!
//! Rows are transformed with realfft (the input is real-valued), the missing
//! half of each row is filled from Hermitian symmetry, and columns go through
//! a complex rustfft plan. Spectra are stored centred (see [`super::shift`]).

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

use super::shift::{dc_position, fftshift, ifftshift};
use crate::error::FilterError;

/// Centred complex spectrum of one image channel
///
/// The zero-frequency bin sits at `(height / 2, width / 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    data: Array2<Complex64>,
}

impl Spectrum {
    /// Wrap an already centred spectrum
    pub fn from_centered(data: Array2<Complex64>) -> Result<Self, FilterError> {
        let (height, width) = data.dim();
        if height == 0 || width == 0 {
            return Err(FilterError::EmptyBuffer);
        }
        Ok(Self { data })
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> ArrayView2<'_, Complex64> {
        self.data.view()
    }

    /// Complex value at the zero-frequency bin
    pub fn dc(&self) -> Complex64 {
        let (height, width) = self.dim();
        let (row, col) = dc_position(height, width);
        self.data[[row, col]]
    }

    /// Scale every bin by a real gain, returning a new spectrum
    ///
    /// Real and imaginary parts are scaled identically. `self` is left as is.
    pub fn attenuate(&self, gains: ArrayView2<f64>) -> Result<Spectrum, FilterError> {
        if gains.dim() != self.dim() {
            return Err(FilterError::dimension("mask", self.dim(), gains.dim()));
        }

        let mut data = self.data.clone();
        data.zip_mut_with(&gains, |bin, &gain| *bin *= gain);
        Ok(Spectrum { data })
    }
}

/// Forward/inverse 2D DFT planned for one image size
#[derive(Clone)]
pub struct FftEngine2d {
    height: usize,
    width: usize,

    /// Real-to-complex row transform (width)
    row_r2c: Arc<dyn RealToComplex<f64>>,

    /// Complex inverse row transform (width)
    row_inverse: Arc<dyn Fft<f64>>,

    /// Complex column transforms (height)
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for FftEngine2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftEngine2d")
            .field("height", &self.height)
            .field("width", &self.width)
            .finish()
    }
}

impl FftEngine2d {
    /// Plan transforms for a `height × width` grid
    ///
    /// # Arguments
    /// * `height` - Number of rows (column transform length)
    /// * `width` - Number of columns (row transform length)
    pub fn new(height: usize, width: usize) -> Result<Self, FilterError> {
        if height == 0 || width == 0 {
            return Err(FilterError::EmptyBuffer);
        }

        let mut real_planner = RealFftPlanner::<f64>::new();
        let mut planner = FftPlanner::<f64>::new();

        Ok(Self {
            height,
            width,
            row_r2c: real_planner.plan_fft_forward(width),
            row_inverse: planner.plan_fft_inverse(width),
            col_forward: planner.plan_fft_forward(height),
            col_inverse: planner.plan_fft_inverse(height),
        })
    }

    /// `(height, width)` this engine was planned for
    pub fn dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Forward 2D DFT of a real channel, centred
    ///
    /// # Arguments
    /// * `channel` - Real samples, shaped like the engine
    ///
    /// # Returns
    /// Spectrum with zero frequency at `(height / 2, width / 2)`
    pub fn forward(&self, channel: ArrayView2<f64>) -> Result<Spectrum, FilterError> {
        self.check_dim("forward transform", channel.dim())?;
        let width = self.width;

        let mut data = Array2::<Complex64>::zeros((self.height, width));
        let mut row_in = self.row_r2c.make_input_vec();
        let mut row_out = self.row_r2c.make_output_vec();
        let bins = row_out.len();

        for (src, mut dst) in channel.rows().into_iter().zip(data.rows_mut()) {
            for (slot, &sample) in row_in.iter_mut().zip(src.iter()) {
                *slot = sample;
            }

            self.row_r2c
                .process(&mut row_in, &mut row_out)
                .map_err(|_| FilterError::dimension("row transform", (1, width), (1, src.len())))?;

            // X[w - k] = conj(X[k]) for a real row
            for k in 0..width {
                dst[k] = if k < bins {
                    row_out[k]
                } else {
                    row_out[width - k].conj()
                };
            }
        }

        process_columns(&mut data, self.col_forward.as_ref());

        Ok(Spectrum {
            data: fftshift(data.view()),
        })
    }

    /// Inverse 2D DFT of a centred spectrum, scaled by `1 / (height * width)`
    ///
    /// # Arguments
    /// * `spectrum` - Centred spectrum, shaped like the engine
    ///
    /// # Returns
    /// Real part of the reconstruction. No clamping is applied.
    pub fn inverse(&self, spectrum: &Spectrum) -> Result<Array2<f64>, FilterError> {
        self.check_dim("inverse transform", spectrum.dim())?;

        let mut data = ifftshift(spectrum.data.view());

        let mut row = vec![Complex64::new(0.0, 0.0); self.width];
        for mut lane in data.rows_mut() {
            for (slot, v) in row.iter_mut().zip(lane.iter()) {
                *slot = *v;
            }
            self.row_inverse.process(&mut row);
            for (v, out) in lane.iter_mut().zip(row.iter()) {
                *v = *out;
            }
        }

        process_columns(&mut data, self.col_inverse.as_ref());

        let scale = 1.0 / (self.height * self.width) as f64;
        Ok(data.mapv(|c| c.re * scale))
    }

    fn check_dim(&self, context: &'static str, found: (usize, usize)) -> Result<(), FilterError> {
        if found.0 == 0 || found.1 == 0 {
            return Err(FilterError::EmptyBuffer);
        }
        if found != self.dim() {
            return Err(FilterError::dimension(context, self.dim(), found));
        }
        Ok(())
    }
}

fn process_columns(data: &mut Array2<Complex64>, fft: &dyn Fft<f64>) {
    let mut column = vec![Complex64::new(0.0, 0.0); data.nrows()];
    for mut lane in data.columns_mut() {
        for (slot, v) in column.iter_mut().zip(lane.iter()) {
            *slot = *v;
        }
        fft.process(&mut column);
        for (v, out) in lane.iter_mut().zip(column.iter()) {
            *v = *out;
        }
    }
}

/// Plan and run a forward transform for a single channel
pub fn forward(channel: ArrayView2<f64>) -> Result<Spectrum, FilterError> {
    let (height, width) = channel.dim();
    FftEngine2d::new(height, width)?.forward(channel)
}

/// Plan and run an inverse transform for a single spectrum
pub fn inverse(spectrum: &Spectrum) -> Result<Array2<f64>, FilterError> {
    let (height, width) = spectrum.dim();
    FftEngine2d::new(height, width)?.inverse(spectrum)
}
