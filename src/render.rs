use rayon::prelude::*;

use crate::config::ViewParams;
use crate::{Point3, PointCloud, Surfaces};

const BACKGROUND: [u8; 4] = [250, 250, 252, 255];
const AXIS: [u8; 4] = [205, 205, 210, 255];
const HIT: [u8; 4] = [214, 48, 38, 255];
const HIT_YZ: [u8; 4] = [42, 98, 200, 255];
const HIT_XY: [u8; 4] = [38, 150, 72, 255];

// Spiral palette, cycled per spiral index
const SPIRALS: [[u8; 4]; 6] = [
    [68, 111, 200, 255],
    [60, 160, 135, 255],
    [160, 120, 60, 255],
    [130, 80, 170, 255],
    [200, 130, 60, 255],
    [90, 90, 100, 255],
];

// Reference surface ramp, low to high
const REF_LOW: [u8; 4] = [45, 20, 90, 255];
const REF_HIGH: [u8; 4] = [240, 200, 70, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

struct Canvas {
    rgba: Vec<u8>,
    w: usize,
    h: usize,
}

impl Canvas {
    fn new(w: usize, h: usize) -> Self {
        let mut rgba = vec![0u8; w * h * 4];
        rgba.par_chunks_mut(w * 4).for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&BACKGROUND);
            }
        });
        Self { rgba, w, h }
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let i = (y as usize * self.w + x as usize) * 4;
        self.rgba[i..i + 4].copy_from_slice(&color);
    }

    /// Filled disc at (x, y). Radius 0 degenerates to a single pixel.
    fn splat(&mut self, x: f64, y: f64, radius: f64, color: [u8; 4]) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let cx = x.round() as i64;
        let cy = y.round() as i64;
        let r = radius.max(0.0).round() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f64 <= radius * radius + 0.25 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Symmetric data extent mapped onto the canvas with equal aspect.
struct Extent {
    half: f64,
}

impl Extent {
    fn over(points: impl Iterator<Item = (f64, f64)>) -> Self {
        let mut half = 0.0f64;
        for (u, v) in points {
            if u.is_finite() {
                half = half.max(u.abs());
            }
            if v.is_finite() {
                half = half.max(v.abs());
            }
        }
        Self {
            half: if half > 0.0 { half * 1.05 } else { 1.0 },
        }
    }

    fn to_px(&self, u: f64, v: f64, canvas: &Canvas) -> (f64, f64) {
        let scale = (canvas.w.min(canvas.h) as f64) / (2.0 * self.half);
        (
            canvas.w as f64 / 2.0 + u * scale,
            canvas.h as f64 / 2.0 - v * scale,
        )
    }
}

/// Matplotlib-style `s` is a marker area; take the radius from its root.
#[inline]
fn marker_radius(marker_size: f64) -> f64 {
    (marker_size.max(0.0) / std::f64::consts::PI).sqrt()
}

/// Orthographic projection for the pseudo-3D view: rotate by azimuth about
/// z, then tilt by elevation, and drop the depth axis.
#[inline]
fn project(p: (f64, f64, f64), azim_rad: f64, elev_rad: f64) -> (f64, f64) {
    let (x, y, z) = p;
    let xr = x * azim_rad.cos() + y * azim_rad.sin();
    let yr = -x * azim_rad.sin() + y * azim_rad.cos();
    let u = yr;
    let v = -xr * elev_rad.sin() + z * elev_rad.cos();
    (u, v)
}

fn cloud_points(cloud: &PointCloud) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
    cloud
        .x
        .data
        .iter()
        .zip(cloud.y.data.iter().zip(cloud.z.data.iter()))
        .map(|(&x, (&y, &z))| (x, y, z))
}

/// Render the pseudo-3D scatter: all spiral clouds, the reference surface
/// colored by height, and the intersections on top.
pub fn render_scene(
    surfaces: &Surfaces,
    hits: &[Point3],
    view: &ViewParams,
    w: usize,
    h: usize,
) -> Vec<u8> {
    let azim = view.azim.to_radians();
    let elev = view.elev.to_radians();
    let mut canvas = Canvas::new(w, h);

    let all = surfaces
        .spirals
        .iter()
        .chain(std::iter::once(&surfaces.reference))
        .flat_map(|cloud| cloud_points(cloud))
        .map(|p| project(p, azim, elev));
    let extent = Extent::over(all);

    let (z_lo, z_hi) = surfaces.reference.z.data.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &z| (lo.min(z), hi.max(z)),
    );
    let z_span = if z_hi > z_lo { z_hi - z_lo } else { 1.0 };
    for (x, y, z) in cloud_points(&surfaces.reference) {
        let t = ((z - z_lo) / z_span) as f32;
        let (u, v) = project((x, y, z), azim, elev);
        let (px, py) = extent.to_px(u, v, &canvas);
        canvas.splat(px, py, 0.8, lerp_color(REF_LOW, REF_HIGH, t));
    }

    for (i, cloud) in surfaces.spirals.iter().enumerate() {
        let color = SPIRALS[i % SPIRALS.len()];
        for p in cloud_points(cloud) {
            let (u, v) = project(p, azim, elev);
            let (px, py) = extent.to_px(u, v, &canvas);
            canvas.splat(px, py, 0.8, color);
        }
    }

    let radius = marker_radius(view.marker_size);
    for p in hits {
        let (u, v) = project((p.x, p.y, p.z), azim, elev);
        let (px, py) = extent.to_px(u, v, &canvas);
        canvas.splat(px, py, radius, HIT);
    }

    canvas.rgba
}

fn render_projection(
    points: &[(f64, f64)],
    marker_size: f64,
    color: [u8; 4],
    w: usize,
    h: usize,
) -> Vec<u8> {
    let mut canvas = Canvas::new(w, h);
    let extent = Extent::over(points.iter().copied());

    // Axes through the origin
    let (ox, oy) = extent.to_px(0.0, 0.0, &canvas);
    for x in 0..w as i64 {
        canvas.put(x, oy.round() as i64, AXIS);
    }
    for y in 0..h as i64 {
        canvas.put(ox.round() as i64, y, AXIS);
    }

    let radius = marker_radius(marker_size);
    for &(u, v) in points {
        let (px, py) = extent.to_px(u, v, &canvas);
        canvas.splat(px, py, radius, color);
    }
    canvas.rgba
}

/// Intersections projected onto the x = 0 plane (y horizontal, z vertical).
pub fn render_projection_yz(hits: &[Point3], view: &ViewParams, w: usize, h: usize) -> Vec<u8> {
    let pts: Vec<(f64, f64)> = hits.iter().map(|p| (p.y, p.z)).collect();
    render_projection(&pts, view.marker_size, HIT_YZ, w, h)
}

/// Intersections projected onto the z = 0 plane (x horizontal, y vertical).
pub fn render_projection_xy(hits: &[Point3], view: &ViewParams, w: usize, h: usize) -> Vec<u8> {
    let pts: Vec<(f64, f64)> = hits.iter().map(|p| (p.x, p.y)).collect();
    render_projection(&pts, view.marker_size, HIT_XY, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Params;

    #[test]
    fn buffers_have_expected_size() {
        let params = Params {
            n_r: 6,
            n_phi: 6,
            n_xy: 6,
            ..Params::default()
        };
        let surfaces = crate::compute_surfaces(&params).unwrap();
        let view = ViewParams::default();
        assert_eq!(render_scene(&surfaces, &[], &view, 64, 48).len(), 64 * 48 * 4);
        assert_eq!(render_projection_yz(&[], &view, 32, 32).len(), 32 * 32 * 4);
        assert_eq!(render_projection_xy(&[], &view, 32, 32).len(), 32 * 32 * 4);
    }

    #[test]
    fn hits_leave_marks() {
        let view = ViewParams::default();
        let hits = [Point3 {
            x: 1.0,
            y: 1.0,
            z: 0.0,
        }];
        let rgba = render_projection_xy(&hits, &view, 64, 64);
        let marked = rgba
            .chunks(4)
            .filter(|px| px[0] == HIT_XY[0] && px[1] == HIT_XY[1] && px[2] == HIT_XY[2])
            .count();
        assert!(marked > 0);
    }
}
