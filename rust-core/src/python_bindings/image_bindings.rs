//! Python bindings for the image filter pipeline

use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;

use super::filter_bindings::{to_py_err, PyFilterPreset, PyPassDirection};
use crate::filters::{FilterConfig, FilterPreset, ImageMode, PassDirection};
use crate::image::buffer::plane_to_u8;
use crate::image::{ChannelImage, ChannelSlot, PixelBuffer};
use crate::spectrum::to_display_u8;

/// Loaded image with its spectra, exposed to Python
#[pyclass(name = "ChannelImage")]
pub struct PyChannelImage {
    image: ChannelImage,
}

impl PyChannelImage {
    fn run_preset(&mut self, preset: FilterPreset, channels: Option<Vec<usize>>) -> PyResult<()> {
        let mode = channel_mode(channels);
        self.image.apply_preset(preset, &mode).map_err(to_py_err)?;
        Ok(())
    }
}

/// `None` selects every colour channel of the image
fn channel_mode(channels: Option<Vec<usize>>) -> ImageMode {
    match channels {
        Some(list) => ImageMode::from_channel_list(&list),
        None => ImageMode::AllColor,
    }
}

/// `None` selects the grayscale plane
fn slot(channel: Option<usize>) -> ChannelSlot {
    match channel {
        Some(c) => ChannelSlot::Color(c),
        None => ChannelSlot::Grayscale,
    }
}

#[pymethods]
impl PyChannelImage {
    /// Create from a uint8 array shaped `(h, w)` or `(h, w, 3)`
    ///
    /// Spectra for every channel and for grayscale are computed here.
    #[new]
    fn new(pixels: &PyAny) -> PyResult<Self> {
        let buffer = if let Ok(rgb) = pixels.extract::<PyReadonlyArray3<u8>>() {
            PixelBuffer::from_u8(rgb.as_array()).map_err(to_py_err)?
        } else if let Ok(gray) = pixels.extract::<PyReadonlyArray2<u8>>() {
            PixelBuffer::from_gray_u8(gray.as_array()).map_err(to_py_err)?
        } else {
            return Err(PyErr::new::<PyTypeError, _>(
                "expected a uint8 array of shape (h, w) or (h, w, 3)",
            ));
        };

        Ok(Self {
            image: ChannelImage::new(buffer).map_err(to_py_err)?,
        })
    }

    #[getter]
    fn height(&self) -> usize {
        self.image.height()
    }

    #[getter]
    fn width(&self) -> usize {
        self.image.width()
    }

    #[getter]
    fn channels(&self) -> usize {
        self.image.channels()
    }

    /// Percentage-driven filter
    ///
    /// Args:
    ///     channels: Channel indices; an empty list filters the grayscale plane
    ///     radius: Radius as a percentage of half the width
    ///     intensity: Dampening strength in percent
    ///     direction: 0 for high-pass, 1 for low-pass
    #[pyo3(signature = (channels, radius, intensity, direction=0))]
    fn custom_filter(
        &mut self,
        channels: Vec<usize>,
        radius: f64,
        intensity: f64,
        direction: u8,
    ) -> PyResult<()> {
        let direction = PassDirection::try_from(direction).map_err(to_py_err)?;
        let config = FilterConfig::new(
            ImageMode::from_channel_list(&channels),
            radius,
            intensity,
            direction,
        );
        self.image.custom_filter(&config).map_err(to_py_err)?;
        Ok(())
    }

    /// Same as `custom_filter` with a `PassDirection` value
    fn filter(
        &mut self,
        channels: Vec<usize>,
        radius: f64,
        intensity: f64,
        direction: PyPassDirection,
    ) -> PyResult<()> {
        let config = FilterConfig::new(
            ImageMode::from_channel_list(&channels),
            radius,
            intensity,
            direction.into(),
        );
        self.image.custom_filter(&config).map_err(to_py_err)?;
        Ok(())
    }

    #[pyo3(signature = (preset, channels=None))]
    fn apply_preset(&mut self, preset: PyFilterPreset, channels: Option<Vec<usize>>) -> PyResult<()> {
        self.run_preset(preset.into(), channels)
    }

    #[pyo3(signature = (channels=None))]
    fn sharpening(&mut self, channels: Option<Vec<usize>>) -> PyResult<()> {
        self.run_preset(FilterPreset::Sharpen, channels)
    }

    #[pyo3(signature = (channels=None))]
    fn blurring(&mut self, channels: Option<Vec<usize>>) -> PyResult<()> {
        self.run_preset(FilterPreset::Blur, channels)
    }

    #[pyo3(signature = (channels=None))]
    fn edge_detection(&mut self, channels: Option<Vec<usize>>) -> PyResult<()> {
        self.run_preset(FilterPreset::EdgeDetect, channels)
    }

    #[pyo3(signature = (channels=None))]
    fn noise_filtering(&mut self, channels: Option<Vec<usize>>) -> PyResult<()> {
        self.run_preset(FilterPreset::Denoise, channels)
    }

    /// Discard filtered results
    fn reset(&mut self) {
        self.image.reset_filtered();
    }

    /// Source image as uint8
    fn image<'py>(&self, py: Python<'py>) -> &'py PyArray3<u8> {
        self.image.source().to_u8().into_pyarray(py)
    }

    fn image_gray<'py>(&self, py: Python<'py>) -> &'py PyArray2<u8> {
        plane_to_u8(self.image.grayscale()).into_pyarray(py)
    }

    /// Filtered image, clamped to uint8
    fn filtered_image<'py>(&self, py: Python<'py>) -> &'py PyArray3<u8> {
        self.image.filtered_pixels().to_u8().into_pyarray(py)
    }

    fn filtered_image_gray<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray2<u8>> {
        let plane = self
            .image
            .filtered_plane(ChannelSlot::Grayscale)
            .map_err(to_py_err)?;
        Ok(plane_to_u8(plane).into_pyarray(py))
    }

    /// Log-magnitude of the stored spectrum; `None` for grayscale
    #[pyo3(signature = (channel=None))]
    fn magnitude_spectrum<'py>(
        &self,
        py: Python<'py>,
        channel: Option<usize>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let magnitude = self.image.magnitude(slot(channel)).map_err(to_py_err)?;
        Ok(magnitude.to_owned().into_pyarray(py))
    }

    /// Log-magnitude of the last masked spectrum; `None` for grayscale
    #[pyo3(signature = (channel=None))]
    fn filtered_magnitude_spectrum<'py>(
        &self,
        py: Python<'py>,
        channel: Option<usize>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let magnitude = self
            .image
            .filtered_magnitude(slot(channel))
            .map_err(to_py_err)?;
        Ok(magnitude.to_owned().into_pyarray(py))
    }

    /// Magnitude scaled to uint8 for display
    #[pyo3(signature = (channel=None, filtered=false))]
    fn magnitude_display<'py>(
        &self,
        py: Python<'py>,
        channel: Option<usize>,
        filtered: bool,
    ) -> PyResult<&'py PyArray2<u8>> {
        let magnitude = if filtered {
            self.image.filtered_magnitude(slot(channel))
        } else {
            self.image.magnitude(slot(channel))
        }
        .map_err(to_py_err)?;
        Ok(to_display_u8(magnitude).into_pyarray(py))
    }

    fn __repr__(&self) -> String {
        format!(
            "ChannelImage(height={}, width={}, channels={})",
            self.image.height(),
            self.image.width(),
            self.image.channels()
        )
    }
}
