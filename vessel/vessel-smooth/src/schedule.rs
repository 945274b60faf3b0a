//! Annealing schedule shared by the solvers.

use crate::params::SmoothParams;

/// Coefficient set for one relaxation step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Coefficients {
    pub d1: f64,
    pub d2: f64,
    pub fa: f64,
    pub faaa: f64,
}

/// Yields `iterations` full-strength coefficient sets, then `chillout`
/// sets with every coefficient reduced by a fixed decrement of
/// `coefficient / (chillout + 1)` before each step. The final step runs
/// at `1 / (chillout + 1)` of the original strength, never at zero.
pub(crate) fn coefficient_schedule(params: &SmoothParams) -> impl Iterator<Item = Coefficients> {
    let full = Coefficients {
        d1: params.d1,
        d2: params.d2,
        fa: params.fa,
        faaa: params.faaa,
    };
    let divisor = f64::from(params.chillout + 1);
    let decrement = Coefficients {
        d1: full.d1 / divisor,
        d2: full.d2 / divisor,
        fa: full.fa / divisor,
        faaa: full.faaa / divisor,
    };

    let mut current = full;
    let annealed = (0..params.chillout).map(move |_| {
        current.d1 -= decrement.d1;
        current.d2 -= decrement.d2;
        current.fa -= decrement.fa;
        current.faaa -= decrement.faaa;
        current
    });
    std::iter::repeat(full)
        .take(params.iterations as usize)
        .chain(annealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schedule_length_and_decay() {
        let params = SmoothParams::default();
        let steps: Vec<_> = coefficient_schedule(&params).collect();
        assert_eq!(steps.len(), 15);
        // ten full-strength steps
        for step in &steps[..10] {
            assert_relative_eq!(step.d1, 0.5, epsilon = 1e-12);
        }
        // the final annealed step keeps 1/6 of the strength
        assert_relative_eq!(steps[14].d1, 0.5 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(steps[14].fa, 0.01 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_chillout_keeps_full_strength() {
        let params = SmoothParams::default().with_iterations(3).with_chillout(0);
        let steps: Vec<_> = coefficient_schedule(&params).collect();
        assert_eq!(steps.len(), 3);
        assert_relative_eq!(steps[2].d2, 0.2, epsilon = 1e-12);
    }
}
