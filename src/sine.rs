use rayon::prelude::*;

use crate::PointCloud;
use crate::config::Params;
use crate::grid::Grid;

/// Evaluate the reference height field over the x/y grid:
/// `z = amp * au * (sin(f*x/au) + sin(f*y/au))`.
///
/// Pure height field: x and y are the grid axes themselves, and the shape
/// has no dependency on any spiral parameter.
pub fn sinusoidal_surface(x: &Grid<f64>, y: &Grid<f64>, params: &Params) -> PointCloud {
    let w = x.w;
    let h = x.h;
    let amp = params.sin_amplitude * params.au;
    let freq = params.sin_frequency;
    let au = params.au;

    let mut z = Grid::new(w, h);
    z.data.par_chunks_mut(w).enumerate().for_each(|(row, zs)| {
        for col in 0..w {
            let xv = x.get(col, row);
            let yv = y.get(col, row);
            zs[col] = amp * ((freq * xv / au).sin() + (freq * yv / au).sin());
        }
    });

    PointCloud {
        x: x.clone(),
        y: y.clone(),
        z,
    }
}
