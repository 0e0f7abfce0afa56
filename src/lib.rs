pub mod config;
pub mod error;
pub mod grid;
pub mod intersect;
pub mod render;
pub mod sine;
pub mod spiral;

use std::f64::consts::PI;
use std::time::Instant;

use config::Params;
use error::ComputeError;
use grid::{Grid, linspace, meshgrid};

pub use intersect::detect_intersections;

/// A single matched sample from the intersection search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Three equal-shaped coordinate grids forming one sampled surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    pub x: Grid<f64>,
    pub y: Grid<f64>,
    pub z: Grid<f64>,
}

impl PointCloud {
    /// (rows, cols) of the sample grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.z.h, self.z.w)
    }

    fn is_finite(&self) -> bool {
        self.x.data.iter().all(|v| v.is_finite())
            && self.y.data.iter().all(|v| v.is_finite())
            && self.z.data.iter().all(|v| v.is_finite())
    }
}

/// Output of the surface stage: one cloud per spiral plus the reference
/// height field.
#[derive(Clone, Debug, PartialEq)]
pub struct Surfaces {
    pub spirals: Vec<PointCloud>,
    pub reference: PointCloud,
}

/// Everything one recomputation produces.
pub struct Scene {
    pub surfaces: Surfaces,
    pub intersections: Vec<Point3>,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Build all spiral clouds and the reference height field from the
/// parameter set. Pure: identical parameters give bit-identical clouds.
///
/// Spiral clouds have shape `(n_phi, n_r)`; the reference has
/// `(n_xy, n_xy)`. A collapsed sampling range is not an error, it just
/// produces a degenerate grid.
pub fn compute_surfaces(params: &Params) -> Result<Surfaces, ComputeError> {
    params.validate()?;

    let r_axis = linspace(params.r_min * params.au, params.r_max * params.au, params.n_r);
    let phi_axis = linspace(-PI / 2.0, PI / 2.0, params.n_phi);
    let (r, phi) = meshgrid(&r_axis, &phi_axis);

    let x_axis = linspace(params.x_min * params.au, params.x_max * params.au, params.n_xy);
    let y_axis = linspace(params.y_min * params.au, params.y_max * params.au, params.n_xy);
    let (x, y) = meshgrid(&x_axis, &y_axis);

    let spirals: Vec<PointCloud> = (0..params.n_spirals)
        .map(|i| {
            let theta0 = spiral::phase_offset(i, params.n_spirals);
            spiral::spiral_surface(&r, &phi, theta0, params)
        })
        .collect();
    if !spirals.iter().all(PointCloud::is_finite) {
        return Err(ComputeError::NonFinite {
            stage: "spiral surfaces",
        });
    }

    let reference = sine::sinusoidal_surface(&x, &y, params);
    if !reference.is_finite() {
        return Err(ComputeError::NonFinite {
            stage: "reference surface",
        });
    }

    Ok(Surfaces { spirals, reference })
}

/// Run the full generate-then-detect pipeline once, timing each stage.
/// Synchronous and independent per call; on error nothing is returned, so
/// the caller's previous scene stays intact.
pub fn generate(params: &Params) -> Result<(Scene, Vec<Timing>), ComputeError> {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let t = Instant::now();
    let surfaces = compute_surfaces(params)?;
    timings.push(Timing {
        name: "surfaces",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    let threshold = params.intersection_threshold * params.au;
    let intersections = detect_intersections(&surfaces.spirals, &surfaces.reference, threshold);
    timings.push(Timing {
        name: "intersections",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    Ok((
        Scene {
            surfaces,
            intersections,
        },
        timings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_shapes_follow_counts() {
        let params = Params {
            n_r: 13,
            n_phi: 7,
            n_xy: 21,
            n_spirals: 4,
            ..Params::default()
        };
        let surfaces = compute_surfaces(&params).unwrap();
        assert_eq!(surfaces.spirals.len(), 4);
        for cloud in &surfaces.spirals {
            assert_eq!(cloud.shape(), (7, 13));
        }
        assert_eq!(surfaces.reference.shape(), (21, 21));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let params = Params {
            n_r: 16,
            n_phi: 12,
            n_xy: 10,
            n_spirals: 3,
            ..Params::default()
        };
        let a = compute_surfaces(&params).unwrap();
        let b = compute_surfaces(&params).unwrap();
        assert_eq!(a.spirals, b.spirals);
        assert_eq!(a.reference, b.reference);

        let threshold = params.intersection_threshold * params.au;
        let ia = detect_intersections(&a.spirals, &a.reference, threshold);
        let ib = detect_intersections(&b.spirals, &b.reference, threshold);
        assert_eq!(ia, ib);
    }

    #[test]
    fn flat_reference_matches_on_z_alone() {
        // Amplitude 0 flattens the reference to z = 0 everywhere, so a
        // sample matches exactly when |z| < threshold, regardless of x/y.
        let params = Params {
            sin_amplitude: 0.0,
            n_r: 10,
            n_phi: 10,
            n_xy: 5,
            n_spirals: 2,
            ..Params::default()
        };
        let surfaces = compute_surfaces(&params).unwrap();
        assert!(surfaces.reference.z.data.iter().all(|&z| z == 0.0));

        let threshold = 0.5 * params.au;
        let hits = detect_intersections(&surfaces.spirals, &surfaces.reference, threshold);
        let expected: usize = surfaces
            .spirals
            .iter()
            .map(|c| c.z.data.iter().filter(|z| z.abs() < threshold).count())
            .sum();
        assert_eq!(hits.len(), expected);
        assert!(hits.iter().all(|p| p.z.abs() < threshold));
    }

    #[test]
    fn overflowing_range_surfaces_as_non_finite() {
        // r_max itself is finite, but r_max * au overflows to infinity
        // inside the grid, which must be reported, not propagated.
        let params = Params {
            r_max: 1e308,
            ..Params::default()
        };
        assert_eq!(
            compute_surfaces(&params),
            Err(ComputeError::NonFinite {
                stage: "spiral surfaces"
            })
        );
    }

    #[test]
    fn generate_reports_stage_timings() {
        let params = Params {
            n_r: 8,
            n_phi: 8,
            n_xy: 8,
            ..Params::default()
        };
        let (scene, timings) = generate(&params).unwrap();
        assert_eq!(scene.surfaces.spirals.len(), params.n_spirals);
        let names: Vec<&str> = timings.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["surfaces", "intersections", "TOTAL"]);
    }
}
