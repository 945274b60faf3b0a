//! Parameters for diameter estimation.

/// Which sampled directions the ray caster uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionMode {
    /// The vertices of an icosahedral sphere sampling with the given
    /// subdivision count.
    Vertices(u32),
    /// One direction per sampling triangle: the (unnormalized) sum of
    /// its corner vertices. More directions for the same subdivision
    /// count; length does not matter to the boundary walk.
    Faces(u32),
}

/// Parameters for diameter estimation.
///
/// # Example
///
/// ```
/// use vessel_diameter::{DiameterParams, DirectionMode};
///
/// let params = DiameterParams::default();
/// assert!((params.gamma - 4.0).abs() < 1e-12);
///
/// // denser direction sampling, stronger small-axis preference
/// let params = DiameterParams::default()
///     .with_gamma(8.0)
///     .with_directions(DirectionMode::Vertices(3));
/// ```
#[derive(Debug, Clone)]
pub struct DiameterParams {
    /// Cross-section axis weighting exponent. Values above 1 favor the
    /// smaller of the two cross-sectional principal axes; the larger
    /// gamma, the stronger the preference. Default: 4.
    pub gamma: f64,

    /// Calibration constant relating principal-component magnitudes to
    /// the radius. Default: √2, which maps a circular boundary cloud of
    /// radius r to exactly r.
    pub rho: f64,

    /// Ray direction set. Default: `Vertices(2)`, 92 directions.
    pub directions: DirectionMode,
}

impl Default for DiameterParams {
    fn default() -> Self {
        Self {
            gamma: 4.0,
            rho: std::f64::consts::SQRT_2,
            directions: DirectionMode::Vertices(2),
        }
    }
}

impl DiameterParams {
    /// Set the axis weighting exponent.
    #[must_use]
    pub const fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the radius calibration constant.
    #[must_use]
    pub const fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the ray direction set.
    #[must_use]
    pub const fn with_directions(mut self, directions: DirectionMode) -> Self {
        self.directions = directions;
        self
    }
}
