//! Relaxation coefficients and schedule.

/// Coefficients and schedule for the relaxation solvers.
///
/// Relaxation runs `iterations` full steps followed by `chillout`
/// annealed steps. Before each annealed step every coefficient is
/// reduced by a fixed decrement of `coefficient / (chillout + 1)`, so
/// the final step still runs at `1 / (chillout + 1)` of the original
/// strength.
///
/// The defaults are the coefficients the extraction pipeline has
/// always shipped with.
///
/// # Example
///
/// ```
/// use vessel_smooth::SmoothParams;
///
/// let params = SmoothParams::default().with_iterations(20).with_d1(0.3);
/// assert_eq!(params.iterations, 20);
/// assert_eq!(params.d2, 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Pull toward the mean of the neighbors.
    pub d1: f64,
    /// Pull toward the node's projection onto neighbor chord lines.
    /// Only used by position smoothing.
    pub d2: f64,
    /// Linear anchor force toward the original value.
    pub fa: f64,
    /// Cubic anchor force toward the original value.
    pub faaa: f64,
    /// Full-strength steps.
    pub iterations: u32,
    /// Annealed steps with linearly decaying coefficients.
    pub chillout: u32,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            d1: 0.5,
            d2: 0.2,
            fa: 0.01,
            faaa: 0.01,
            iterations: 10,
            chillout: 5,
        }
    }
}

impl SmoothParams {
    /// Sets the neighbor-mean coefficient.
    #[must_use]
    pub const fn with_d1(mut self, d1: f64) -> Self {
        self.d1 = d1;
        self
    }

    /// Sets the chord-projection coefficient.
    #[must_use]
    pub const fn with_d2(mut self, d2: f64) -> Self {
        self.d2 = d2;
        self
    }

    /// Sets the linear anchor coefficient.
    #[must_use]
    pub const fn with_fa(mut self, fa: f64) -> Self {
        self.fa = fa;
        self
    }

    /// Sets the cubic anchor coefficient.
    #[must_use]
    pub const fn with_faaa(mut self, faaa: f64) -> Self {
        self.faaa = faaa;
        self
    }

    /// Sets the number of full-strength steps.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of annealed steps.
    #[must_use]
    pub const fn with_chillout(mut self, chillout: u32) -> Self {
        self.chillout = chillout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let params = SmoothParams::default();
        assert_eq!(params.d1, 0.5);
        assert_eq!(params.d2, 0.2);
        assert_eq!(params.fa, 0.01);
        assert_eq!(params.faaa, 0.01);
        assert_eq!(params.iterations, 10);
        assert_eq!(params.chillout, 5);
    }

    #[test]
    fn test_builders_compose() {
        let params = SmoothParams::default()
            .with_d1(0.1)
            .with_d2(0.0)
            .with_fa(0.2)
            .with_faaa(0.3)
            .with_iterations(3)
            .with_chillout(0);
        assert_eq!(params.d1, 0.1);
        assert_eq!(params.d2, 0.0);
        assert_eq!(params.fa, 0.2);
        assert_eq!(params.faaa, 0.3);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.chillout, 0);
    }
}
