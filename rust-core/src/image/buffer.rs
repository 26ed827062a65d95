//! Decoded pixel buffers
//!
//! Layout is `(height, width, channels)` with 1 (grayscale) or 3 (R, G, B)
//! channels. Samples are kept as f64 so filtered output can go negative or
//! past 255 until it is converted back for display.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::FilterError;

/// ITU-R BT.601 luma weights, as used by common image decoders
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Array3<f64>,
}

impl PixelBuffer {
    /// Wrap a `(height, width, channels)` array
    pub fn new(data: Array3<f64>) -> Result<Self, FilterError> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(FilterError::EmptyBuffer);
        }
        if channels != 1 && channels != 3 {
            return Err(FilterError::ChannelCount(channels));
        }
        Ok(Self { data })
    }

    /// Single-channel buffer from a 2D plane
    pub fn from_gray(plane: Array2<f64>) -> Result<Self, FilterError> {
        Self::new(plane.insert_axis(Axis(2)))
    }

    /// Convert 8-bit samples
    pub fn from_u8(data: ArrayView3<u8>) -> Result<Self, FilterError> {
        Self::new(data.mapv(f64::from))
    }

    /// Convert an 8-bit grayscale plane
    pub fn from_gray_u8(plane: ArrayView2<u8>) -> Result<Self, FilterError> {
        Self::from_gray(plane.mapv(f64::from))
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// One channel as a 2D plane
    pub fn channel(&self, index: usize) -> Result<ArrayView2<'_, f64>, FilterError> {
        self.check_channel(index)?;
        Ok(self.data.index_axis(Axis(2), index))
    }

    /// Overwrite one channel
    pub fn set_channel(&mut self, index: usize, plane: ArrayView2<f64>) -> Result<(), FilterError> {
        self.check_channel(index)?;
        if plane.dim() != self.dim() {
            return Err(FilterError::dimension("channel plane", self.dim(), plane.dim()));
        }
        self.data.index_axis_mut(Axis(2), index).assign(&plane);
        Ok(())
    }

    /// Grayscale plane: the only channel, or BT.601 luma of R, G, B
    pub fn luma(&self) -> Array2<f64> {
        if self.channels() == 1 {
            return self.data.index_axis(Axis(2), 0).to_owned();
        }

        let r = self.data.index_axis(Axis(2), 0);
        let g = self.data.index_axis(Axis(2), 1);
        let b = self.data.index_axis(Axis(2), 2);
        Array2::from_shape_fn(self.dim(), |idx| {
            LUMA_R * r[idx] + LUMA_G * g[idx] + LUMA_B * b[idx]
        })
    }

    /// Clamp to `[0, 255]` and round to 8-bit samples
    pub fn to_u8(&self) -> Array3<u8> {
        self.data.mapv(clamp_u8)
    }

    fn check_channel(&self, index: usize) -> Result<(), FilterError> {
        if index >= self.channels() {
            return Err(FilterError::InvalidChannel {
                index,
                channels: self.channels(),
            });
        }
        Ok(())
    }
}

/// Round and saturate one sample to 8 bits
pub fn clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

/// 8-bit copy of a single plane
pub fn plane_to_u8(plane: ArrayView2<f64>) -> Array2<u8> {
    plane.mapv(clamp_u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_channel_count_validation() {
        assert!(PixelBuffer::new(Array3::zeros((4, 4, 3))).is_ok());
        assert!(PixelBuffer::new(Array3::zeros((4, 4, 1))).is_ok());
        assert_eq!(
            PixelBuffer::new(Array3::zeros((4, 4, 4))).unwrap_err(),
            FilterError::ChannelCount(4)
        );
        assert_eq!(
            PixelBuffer::new(Array3::zeros((0, 4, 3))).unwrap_err(),
            FilterError::EmptyBuffer
        );
    }

    #[test]
    fn test_channel_access() {
        let mut buf = PixelBuffer::new(Array3::from_shape_fn((2, 3, 3), |(_, _, c)| c as f64)).unwrap();
        assert_eq!(buf.channel(2).unwrap()[[1, 1]], 2.0);
        assert!(matches!(
            buf.channel(3),
            Err(FilterError::InvalidChannel { index: 3, channels: 3 })
        ));

        buf.set_channel(0, Array2::from_elem((2, 3), 9.0).view()).unwrap();
        assert_eq!(buf.channel(0).unwrap()[[0, 2]], 9.0);
        assert!(buf.set_channel(0, Array2::zeros((3, 2)).view()).is_err());
    }

    #[test]
    fn test_luma() {
        let rgb = array![[[255u8, 0, 0], [0, 255, 0], [0, 0, 255]]];
        let buf = PixelBuffer::from_u8(rgb.view()).unwrap();
        let luma = buf.luma();
        assert!((luma[[0, 0]] - 76.245).abs() < 1e-9);
        assert!((luma[[0, 1]] - 149.685).abs() < 1e-9);
        assert!((luma[[0, 2]] - 29.07).abs() < 1e-9);

        let gray = PixelBuffer::from_gray_u8(array![[7u8, 8]].view()).unwrap();
        assert_eq!(gray.luma(), array![[7.0, 8.0]]);
    }

    #[test]
    fn test_to_u8_clamps() {
        let buf = PixelBuffer::from_gray(array![[-3.0, 12.4, 12.6, 300.0]]).unwrap();
        assert_eq!(buf.to_u8().index_axis(Axis(2), 0), array![0u8, 12, 13, 255].insert_axis(Axis(0)));
    }
}
