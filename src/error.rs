/// Failures surfaced to the frontends. A failed recomputation leaves the
/// caller's previous results untouched; nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    /// A parameter is non-finite, or a count parameter is below 1. The
    /// offending value is reported, never silently replaced by a default.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A surface formula produced NaN or infinity during the named stage.
    #[error("non-finite value produced during {stage}")]
    NonFinite { stage: &'static str },
}
