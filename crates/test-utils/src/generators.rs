//! Synthetic grid generators.
//!
//! Grids are row-major `Vec<f32>` with row 0 first.

/// A grid holding `0, 1, 2, ...` in row-major order.
///
/// ```
/// use test_utils::ramp_grid;
///
/// let grid = ramp_grid(10, 10);
/// assert_eq!(grid.len(), 100);
/// assert_eq!(grid[0], 0.0);
/// assert_eq!(grid[99], 99.0);
/// ```
pub fn ramp_grid(width: usize, height: usize) -> Vec<f32> {
    (0..width * height).map(|i| i as f32).collect()
}

/// A grid where every cell holds `value`.
pub fn constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// A ramp grid with `sentinel` written into every `every`-th cell.
///
/// Returns the grid and the indices that were overwritten.
pub fn ramp_with_sentinel(
    width: usize,
    height: usize,
    sentinel: f32,
    every: usize,
) -> (Vec<f32>, Vec<usize>) {
    let mut grid = ramp_grid(width, height);
    let mut masked = Vec::new();
    for (i, cell) in grid.iter_mut().enumerate() {
        if every > 0 && i % every == 0 {
            *cell = sentinel;
            masked.push(i);
        }
    }
    (grid, masked)
}
