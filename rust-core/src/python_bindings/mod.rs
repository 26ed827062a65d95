//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod filter_bindings;
mod image_bindings;

/// Python module definition
#[pymodule]
fn spectral_image(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<image_bindings::PyChannelImage>()?;

    // Enums
    m.add_class::<filter_bindings::PyPassDirection>()?;
    m.add_class::<filter_bindings::PyFilterPreset>()?;

    Ok(())
}
