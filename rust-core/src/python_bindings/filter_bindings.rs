//! Python-facing filter enums and error conversion

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use crate::error::FilterError;
use crate::filters::{FilterPreset, PassDirection};

/// Pass direction enum exposed to Python
#[pyclass(name = "PassDirection")]
#[derive(Clone)]
pub enum PyPassDirection {
    HighPass,
    LowPass,
}

impl From<PyPassDirection> for PassDirection {
    fn from(py_dir: PyPassDirection) -> Self {
        match py_dir {
            PyPassDirection::HighPass => PassDirection::HighPass,
            PyPassDirection::LowPass => PassDirection::LowPass,
        }
    }
}

/// Filter preset enum exposed to Python
#[pyclass(name = "FilterPreset")]
#[derive(Clone)]
pub enum PyFilterPreset {
    Sharpen,
    Blur,
    EdgeDetect,
    Denoise,
}

impl From<PyFilterPreset> for FilterPreset {
    fn from(py_preset: PyFilterPreset) -> Self {
        match py_preset {
            PyFilterPreset::Sharpen => FilterPreset::Sharpen,
            PyFilterPreset::Blur => FilterPreset::Blur,
            PyFilterPreset::EdgeDetect => FilterPreset::EdgeDetect,
            PyFilterPreset::Denoise => FilterPreset::Denoise,
        }
    }
}

/// Map a pipeline error to the closest Python exception
pub fn to_py_err(err: FilterError) -> PyErr {
    match err {
        FilterError::InvalidChannel { .. } => PyErr::new::<PyIndexError, _>(err.to_string()),
        _ => PyErr::new::<PyValueError, _>(err.to_string()),
    }
}
