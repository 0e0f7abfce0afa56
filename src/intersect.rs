use rayon::prelude::*;

use crate::{Point3, PointCloud};

/// Gap to the nearest value in a sorted slice. Infinite for an empty slice.
#[inline]
fn nearest_gap(sorted: &[f64], z: f64) -> f64 {
    let i = sorted.partition_point(|&h| h < z);
    let above = sorted.get(i).map_or(f64::INFINITY, |&h| (h - z).abs());
    let below = if i > 0 {
        (sorted[i - 1] - z).abs()
    } else {
        f64::INFINITY
    };
    above.min(below)
}

/// Collect every spiral sample whose z value lies strictly within
/// `threshold` of the closest reference height *anywhere* in the x/y
/// domain. The (x, y) displacement between the sample and the matching
/// reference cell is deliberately ignored; this is a height-proximity
/// heuristic, not a same-location surface intersection.
///
/// The reference heights are sorted once so each sample is a binary search
/// instead of a full grid scan; results are identical to the exhaustive
/// minimum. Output order is generation order: spiral index, then row, then
/// column.
pub fn detect_intersections(
    spirals: &[PointCloud],
    reference: &PointCloud,
    threshold: f64,
) -> Vec<Point3> {
    let mut heights = reference.z.data.clone();
    heights.sort_unstable_by(f64::total_cmp);

    let mut out = Vec::new();
    for cloud in spirals {
        let w = cloud.z.w;
        let rows: Vec<Vec<Point3>> = (0..cloud.z.h)
            .into_par_iter()
            .map(|row| {
                let mut hits = Vec::new();
                for col in 0..w {
                    let z = cloud.z.get(col, row);
                    if nearest_gap(&heights, z) < threshold {
                        hits.push(Point3 {
                            x: cloud.x.get(col, row),
                            y: cloud.y.get(col, row),
                            z,
                        });
                    }
                }
                hits
            })
            .collect();
        out.extend(rows.into_iter().flatten());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Params;
    use crate::grid::Grid;

    fn cloud_from_z(zs: &[f64], w: usize, h: usize) -> PointCloud {
        let mut x = Grid::new(w, h);
        let mut y = Grid::new(w, h);
        let mut z = Grid::new(w, h);
        for row in 0..h {
            for col in 0..w {
                x.set(col, row, (col * 10) as f64);
                y.set(col, row, (row * 10) as f64);
                z.set(col, row, zs[row * w + col]);
            }
        }
        PointCloud { x, y, z }
    }

    #[test]
    fn nearest_gap_hits_both_sides() {
        let sorted = [1.0, 4.0, 9.0];
        assert_eq!(nearest_gap(&sorted, 0.0), 1.0);
        assert_eq!(nearest_gap(&sorted, 5.0), 1.0);
        assert_eq!(nearest_gap(&sorted, 12.0), 3.0);
        assert_eq!(nearest_gap(&sorted, 4.0), 0.0);
        assert_eq!(nearest_gap(&[], 4.0), f64::INFINITY);
    }

    #[test]
    fn zero_threshold_matches_nothing() {
        let spiral = cloud_from_z(&[0.0, 1.0, 2.0, 3.0], 2, 2);
        let reference = cloud_from_z(&[0.0, 1.0, 2.0, 3.0], 2, 2);
        assert!(detect_intersections(&[spiral.clone()], &reference, 0.0).is_empty());
        assert!(detect_intersections(&[spiral], &reference, -1.0).is_empty());
    }

    #[test]
    fn huge_threshold_matches_everything() {
        let spiral = cloud_from_z(&[0.0, 5.0, -3.0, 8.0], 2, 2);
        let reference = cloud_from_z(&[100.0, 101.0, 102.0, 103.0], 2, 2);
        let hits = detect_intersections(&[spiral.clone(), spiral], &reference, 1e6);
        assert_eq!(hits.len(), 2 * 2 * 2);
    }

    #[test]
    fn match_ignores_xy_alignment() {
        // The spiral sample sits at (0, 0) but the only close reference
        // height lives at a far corner of the domain; it still matches.
        let spiral = cloud_from_z(&[7.0], 1, 1);
        let reference = cloud_from_z(&[-50.0, -20.0, 30.0, 7.3], 2, 2);
        let hits = detect_intersections(&[spiral], &reference, 0.5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].z, 7.0);
    }

    #[test]
    fn output_is_generation_order() {
        let a = cloud_from_z(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = cloud_from_z(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        let reference = cloud_from_z(&[0.0; 4], 2, 2);
        let hits = detect_intersections(&[a, b], &reference, 100.0);
        let zs: Vec<f64> = hits.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn matches_brute_force_scan() {
        // Pin the sorted-search rewrite against the exhaustive minimum on
        // a realistic surface pair.
        let params = Params {
            n_r: 12,
            n_phi: 9,
            n_xy: 11,
            n_spirals: 3,
            ..Params::default()
        };
        let surfaces = crate::compute_surfaces(&params).unwrap();
        let threshold = params.intersection_threshold * params.au;

        let fast = detect_intersections(&surfaces.spirals, &surfaces.reference, threshold);

        let mut slow = Vec::new();
        for cloud in &surfaces.spirals {
            for row in 0..cloud.z.h {
                for col in 0..cloud.z.w {
                    let z = cloud.z.get(col, row);
                    let min_gap = surfaces
                        .reference
                        .z
                        .data
                        .iter()
                        .map(|&h| (z - h).abs())
                        .fold(f64::INFINITY, f64::min);
                    if min_gap < threshold {
                        slow.push(Point3 {
                            x: cloud.x.get(col, row),
                            y: cloud.y.get(col, row),
                            z,
                        });
                    }
                }
            }
        }
        assert_eq!(fast, slow);
    }
}
