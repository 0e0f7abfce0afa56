use std::f64::consts::PI;

use rayon::prelude::*;

use crate::PointCloud;
use crate::config::Params;
use crate::grid::Grid;

/// Phase offset for spiral `i` of `n`: evenly distributed over the full
/// circle, so a single spiral starts at angle 0.
#[inline]
pub fn phase_offset(i: usize, n: usize) -> f64 {
    2.0 * PI * i as f64 / n as f64
}

/// Build one spiral surface over the (radius, latitude) grid.
///
/// The winding angle grows linearly with radius above the smallest radius
/// actually present in the grid, at rate `omega / v`, and is capped at
/// `2π * spiral_revolutions` so the spiral stops accruing turns past that
/// count. `phi` bends the spiral out of its flat plane via a spherical
/// embedding; `phi = ±π/2` collapses onto the poles `z = ±r`.
pub fn spiral_surface(r: &Grid<f64>, phi: &Grid<f64>, theta0: f64, params: &Params) -> PointCloud {
    let w = r.w;
    let h = r.h;
    // Smallest realized radius, not the r_min parameter: the grid is
    // already in au-scaled units.
    let r_floor = r.data.iter().copied().fold(f64::INFINITY, f64::min);
    let max_theta = 2.0 * PI * params.spiral_revolutions;
    let omega = params.omega;
    let v = params.v;

    let mut x = Grid::new(w, h);
    let mut y = Grid::new(w, h);
    let mut z = Grid::new(w, h);

    x.data
        .par_chunks_mut(w)
        .zip(y.data.par_chunks_mut(w).zip(z.data.par_chunks_mut(w)))
        .enumerate()
        .for_each(|(row, (xs, (ys, zs)))| {
            for col in 0..w {
                let rv = r.get(col, row);
                let pv = phi.get(col, row);
                let theta = theta0 + (omega * (rv - r_floor) / v).min(max_theta);
                xs[col] = rv * theta.cos() * pv.cos();
                ys[col] = rv * theta.sin() * pv.cos();
                zs[col] = rv * pv.sin();
            }
        });

    PointCloud { x, y, z }
}
