#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{AMBIGUITY_RATIO, CONVERGENCE_M, MAX_ITERATIONS, MAX_PDOP2, RESIDUAL_GATE};

fn default_max_pdop2() -> f64 {
    MAX_PDOP2
}

fn default_residual_gate() -> f64 {
    RESIDUAL_GATE
}

fn default_ratio_test() -> f64 {
    AMBIGUITY_RATIO
}

fn default_max_iterations() -> usize {
    MAX_ITERATIONS
}

fn default_convergence_m() -> f64 {
    CONVERGENCE_M
}

/// Hidden point [Solver] configuration.
/// Default values are the ones we recommend for tape or laser
/// measurements at a few meters range.
///
/// [Solver]: crate::prelude::Solver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Squared PDOP limit, above which the horizontal solution
    /// is flagged imprecise.
    #[cfg_attr(feature = "serde", serde(default = "default_max_pdop2"))]
    pub max_pdop2: f64,

    /// A squared residual larger than this many times its variance
    /// flags the solution imprecise.
    #[cfg_attr(feature = "serde", serde(default = "default_residual_gate"))]
    pub residual_gate: f64,

    /// Initial guess ratio test: the best seed pairing distance multiplied
    /// by this factor must be smaller than the second best, otherwise the
    /// solution is flagged ambiguous.
    #[cfg_attr(feature = "serde", serde(default = "default_ratio_test"))]
    pub ratio_test: f64,

    /// Maximal number of Gauss-Newton iterations
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,

    /// Iteration stops once the step norm falls below this value (meters)
    #[cfg_attr(feature = "serde", serde(default = "default_convergence_m"))]
    pub convergence_m: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_pdop2: default_max_pdop2(),
            residual_gate: default_residual_gate(),
            ratio_test: default_ratio_test(),
            max_iterations: default_max_iterations(),
            convergence_m: default_convergence_m(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated squared PDOP limit.
    pub fn with_max_pdop2(&self, max_pdop2: f64) -> Self {
        let mut s = *self;
        s.max_pdop2 = max_pdop2;
        s
    }

    /// Copies and returns [Config] with updated residual gate.
    pub fn with_residual_gate(&self, gate: f64) -> Self {
        let mut s = *self;
        s.residual_gate = gate;
        s
    }

    /// Copies and returns [Config] with updated ambiguity ratio test.
    pub fn with_ratio_test(&self, ratio: f64) -> Self {
        let mut s = *self;
        s.ratio_test = ratio;
        s
    }

    /// Copies and returns [Config] with updated iteration limit.
    pub fn with_max_iterations(&self, max_iterations: usize) -> Self {
        let mut s = *self;
        s.max_iterations = max_iterations;
        s
    }

    /// Copies and returns [Config] with updated convergence criterion (meters).
    pub fn with_convergence_m(&self, convergence_m: f64) -> Self {
        let mut s = *self;
        s.convergence_m = convergence_m;
        s
    }
}
