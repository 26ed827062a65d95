//! Spectral transforms for image channels

pub mod fft;
pub mod shift;
pub mod magnitude;

pub use fft::{FftEngine2d, Spectrum};
pub use shift::dc_position;
pub use magnitude::{magnitude_spectrum, to_display_u8, ZERO_MAGNITUDE};
