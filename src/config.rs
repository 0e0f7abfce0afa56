use crate::error::ComputeError;

/// All tunable parameters — exposed as UI sliders in the frontend.
/// Lengths (`r_min`, `r_max`, `x_min`, ...) are in units of `au`; the
/// pipeline multiplies by `au` when building grids.
#[derive(Clone, Debug)]
pub struct Params {
    // Spiral shape
    pub v: f64,
    pub omega: f64,
    pub au: f64,
    pub spiral_revolutions: f64,
    pub n_spirals: usize,

    // Spiral sampling
    pub r_min: f64,
    pub r_max: f64,
    pub n_r: usize,
    pub n_phi: usize,

    // Reference surface
    pub sin_amplitude: f64,
    pub sin_frequency: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub n_xy: usize,

    // Intersection search (tolerance in units of au)
    pub intersection_threshold: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            v: 400e3,
            omega: 2.7e-6,
            au: 1.496e11,
            spiral_revolutions: 2.0,
            n_spirals: 2,
            r_min: 0.1,
            r_max: 40.0,
            n_r: 50,
            n_phi: 50,
            sin_amplitude: 0.5,
            sin_frequency: 1.0,
            x_min: -10.0,
            x_max: 60.0,
            y_min: -10.0,
            y_max: 60.0,
            n_xy: 50,
            intersection_threshold: 0.1,
        }
    }
}

impl Params {
    /// Reject non-finite scalars and zero counts. Range ordering is not
    /// checked: a collapsed range just yields a degenerate grid downstream.
    pub fn validate(&self) -> Result<(), ComputeError> {
        let scalars = [
            ("V", self.v),
            ("omega", self.omega),
            ("AU", self.au),
            ("spiral_revolutions", self.spiral_revolutions),
            ("r_min", self.r_min),
            ("r_max", self.r_max),
            ("sin_amplitude", self.sin_amplitude),
            ("sin_frequency", self.sin_frequency),
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("intersection_threshold", self.intersection_threshold),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ComputeError::InvalidParameter { name, value });
            }
        }
        let counts = [
            ("n_r", self.n_r),
            ("n_phi", self.n_phi),
            ("n_xy", self.n_xy),
            ("n_spirals", self.n_spirals),
        ];
        for (name, count) in counts {
            if count < 1 {
                return Err(ComputeError::InvalidParameter {
                    name,
                    value: count as f64,
                });
            }
        }
        Ok(())
    }
}

/// Coerce a raw numeric count to a positive integer. Truncates the
/// fractional part, so 1.9 is 1 and 0.9 is rejected.
pub fn coerce_count(name: &'static str, value: f64) -> Result<usize, ComputeError> {
    if !value.is_finite() || value < 1.0 {
        return Err(ComputeError::InvalidParameter { name, value });
    }
    Ok(value.trunc() as usize)
}

/// Presentational parameters. Consumed only by the renderer and the
/// frontends, never by the compute pipeline.
#[derive(Clone, Copy, Debug)]
pub struct ViewParams {
    pub elev: f64,
    pub azim: f64,
    pub marker_size: f64,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            elev: 20.0,
            azim: 45.0,
            marker_size: 20.0,
        }
    }
}

/// Slider metadata: (name, default, min, max). Bounds drive slider ranges
/// in the frontend; direct numeric input is validated but not clamped.
pub const BOUNDS: &[(&str, f64, f64, f64)] = &[
    ("V", 400e3, 1e3, 1e6),
    ("omega", 2.7e-6, 1e-7, 1e-5),
    ("AU", 1.496e11, 1e10, 1e12),
    ("r_min", 0.1, 0.01, 1.0),
    ("r_max", 40.0, 10.0, 100.0),
    ("n_r", 50.0, 10.0, 200.0),
    ("n_phi", 50.0, 10.0, 100.0),
    ("n_spirals", 2.0, 1.0, 10.0),
    ("spiral_revolutions", 2.0, 0.5, 10.0),
    ("sin_amplitude", 0.5, 0.1, 2.0),
    ("sin_frequency", 1.0, 0.1, 5.0),
    ("x_min", -10.0, -50.0, 0.0),
    ("x_max", 60.0, 10.0, 100.0),
    ("y_min", -10.0, -50.0, 0.0),
    ("y_max", 60.0, 10.0, 100.0),
    ("n_xy", 50.0, 10.0, 200.0),
    ("intersection_threshold", 0.1, 0.01, 1.0),
    ("elev", 20.0, 0.0, 90.0),
    ("azim", 45.0, 0.0, 360.0),
    ("marker_size", 20.0, 1.0, 100.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn non_finite_scalar_rejected() {
        let params = Params {
            omega: f64::NAN,
            ..Params::default()
        };
        match params.validate() {
            Err(ComputeError::InvalidParameter { name, .. }) => assert_eq!(name, "omega"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn zero_count_rejected() {
        let params = Params {
            n_r: 0,
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn count_coercion_truncates() {
        assert_eq!(coerce_count("n_r", 1.9).unwrap(), 1);
        assert_eq!(coerce_count("n_r", 50.0).unwrap(), 50);
        assert!(coerce_count("n_r", 0.9).is_err());
        assert!(coerce_count("n_r", f64::INFINITY).is_err());
        assert!(coerce_count("n_r", -3.0).is_err());
    }
}
