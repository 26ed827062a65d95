//! Quadrant shifts for centred spectra
//!
//! `fftshift` moves the zero-frequency bin from `(0, 0)` to
//! `(height / 2, width / 2)`; `ifftshift` undoes it. The two differ when a
//! dimension has odd length, so both are implemented as cyclic rolls.
//!
//! ```text
//!   1 | 2        4 | 3
//!  -------  ->  -------
//!   3 | 4        2 | 1
//! ```

use ndarray::{Array2, ArrayView2};

/// Cell holding zero frequency after [`fftshift`]: `(height / 2, width / 2)`
pub fn dc_position(height: usize, width: usize) -> (usize, usize) {
    (height / 2, width / 2)
}

/// Shift the four quadrants so zero frequency sits at the centre
pub fn fftshift<T: Copy>(matrix: ArrayView2<T>) -> Array2<T> {
    let (height, width) = matrix.dim();
    let (row_shift, col_shift) = dc_position(height, width);
    roll(matrix, row_shift, col_shift)
}

/// Inverse of [`fftshift`], also for odd dimensions
pub fn ifftshift<T: Copy>(matrix: ArrayView2<T>) -> Array2<T> {
    let (height, width) = matrix.dim();
    roll(matrix, height - height / 2, width - width / 2)
}

/// Cyclic roll: element at `(r, c)` lands at `((r + dr) % h, (c + dc) % w)`
fn roll<T: Copy>(matrix: ArrayView2<T>, row_shift: usize, col_shift: usize) -> Array2<T> {
    let (height, width) = matrix.dim();
    if height == 0 || width == 0 {
        return matrix.to_owned();
    }

    Array2::from_shape_fn((height, width), |(r, c)| {
        let src_r = (r + height - row_shift % height) % height;
        let src_c = (c + width - col_shift % width) % width;
        matrix[[src_r, src_c]]
    })
}
