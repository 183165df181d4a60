// src/algorithms/occlusion.rs
//! Small numeric helpers shared by the leave-one-out interpreters.

use crate::core::{ComponentError, Result};
use ndarray::{Array2, Zip};

/// `num` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Splits `0..total` into `segments` contiguous windows of (nearly) equal length.
///
/// Boundaries sit on an even linear partition of `total`, rounded half-to-even, so
/// the same `(total, segments)` always yields the same windows.
pub fn window_boundaries(total: usize, segments: usize) -> Vec<(usize, usize)> {
    let bounds: Vec<usize> = linspace(0.0, total as f64, segments + 1)
        .into_iter()
        .map(|b| b.round_ties_even() as usize)
        .collect();
    bounds.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Sums `score * mask` over all (score, mask) pairs into a `(rows, cols)` grid.
pub fn accumulate_masks(
    (rows, cols): (usize, usize),
    scores: &[f64],
    masks: &[Array2<bool>],
) -> Result<Array2<f64>> {
    let mut grid = Array2::<f64>::zeros((rows, cols));
    for (&score, mask) in scores.iter().zip(masks) {
        if mask.dim() != (rows, cols) {
            return Err(ComponentError::InvalidInput(format!(
                "segment mask has shape {:?}, image has shape {:?}",
                mask.dim(),
                (rows, cols)
            )));
        }
        Zip::from(&mut grid).and(mask).for_each(|g, &m| {
            if m {
                *g += score;
            }
        });
    }
    Ok(grid)
}

/// Min-max rescales the grid into `[0, 1]`, but only when its maximum is positive.
/// Grids whose values are all `<= 0` come back unchanged. A positive grid with no
/// spread is mapped to all ones.
pub fn rescale_positive(mut grid: Array2<f64>) -> Array2<f64> {
    let max = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = grid.iter().copied().fold(f64::INFINITY, f64::min);
    if max > 0.0 {
        let range = max - min;
        if range > 0.0 {
            grid.mapv_inplace(|v| (v - min) / range);
        } else {
            grid.fill(1.0);
        }
    }
    grid
}

/// Converts a 2D array into nested rows.
pub fn grid_to_rows(grid: &Array2<f64>) -> Vec<Vec<f64>> {
    grid.outer_iter().map(|row| row.to_vec()).collect()
}
