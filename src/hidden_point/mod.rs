//! Hidden point solver: locates a point that cannot be surveyed directly
//! (obstructed), from horizontal distances measured from nearby surveyed points.
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{cfg::Config, ellipsoid::Ellipsoid, error::Error};

mod ambiguity;
mod analytical;
mod iterative;
mod warnings;

pub use ambiguity::{Pairing, SeedCandidates, SeedChoice, SeedDecision};
pub use warnings::Warnings;

/// Position [Sample]: coordinates and covariance. Expressed in ECEF
/// or in a local tangent frame, depending on context.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Coordinates (m)
    pub position: Vector3<f64>,
    /// Covariance matrix (m²)
    pub covariance: Matrix3<f64>,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            covariance: Matrix3::zeros(),
        }
    }
}

impl Sample {
    /// Builds a new [Sample]
    pub fn new(position: Vector3<f64>, covariance: Matrix3<f64>) -> Self {
        Self {
            position,
            covariance,
        }
    }

    /// Builds a new [Sample] from per axis variances (uncorrelated axes)
    pub fn from_variances(position: Vector3<f64>, variances: Vector3<f64>) -> Self {
        Self {
            position,
            covariance: Matrix3::from_diagonal(&variances),
        }
    }

    /// Rotates and translates this [Sample] into the frame centered on `origin`
    /// and oriented by `rotation`.
    pub(crate) fn to_local(&self, origin: &Vector3<f64>, rotation: &Matrix3<f64>) -> Self {
        Self {
            position: rotation * (self.position - origin),
            covariance: rotation * self.covariance * rotation.transpose(),
        }
    }

    /// Inverse of [Self::to_local]
    pub(crate) fn to_global(&self, origin: &Vector3<f64>, rotation: &Matrix3<f64>) -> Self {
        let inv_rotation = rotation.transpose();
        Self {
            position: inv_rotation * self.position + origin,
            covariance: inv_rotation * self.covariance * rotation,
        }
    }
}

/// Surveyor measurement [Input]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Input {
    /// Surveyed point [Sample]
    pub sample: Sample,
    /// Horizontal distance (m) from the surveyed point to the hidden point
    pub horiz_distance: f64,
    /// Variance (m²) of the distance measurement, as estimated by the surveyor.
    /// A tape measure typically has a few cm of standard deviation.
    pub horiz_variance: f64,
    /// Slant distance (m) to the hidden point, that could resolve the vertical component.
    /// Not used yet.
    pub diagonal_distance: f64,
    /// Measurement time
    pub time_stamp: Option<Epoch>,
}

impl Input {
    /// Builds a new [Input]
    pub fn new(sample: Sample, horiz_distance: f64, horiz_variance: f64) -> Self {
        Self {
            sample,
            horiz_distance,
            horiz_variance,
            diagonal_distance: 0.0,
            time_stamp: None,
        }
    }

    /// Copies and returns [Input] with measurement time
    pub fn with_time_stamp(&self, t: Epoch) -> Self {
        let mut s = *self;
        s.time_stamp = Some(t);
        s
    }

    /// Copies and returns [Input] with slant distance
    pub fn with_diagonal_distance(&self, distance: f64) -> Self {
        let mut s = *self;
        s.diagonal_distance = distance;
        s
    }

    /// Copies and returns [Input] expressed in the local frame
    pub(crate) fn to_local(&self, origin: &Vector3<f64>, rotation: &Matrix3<f64>) -> Self {
        let mut s = *self;
        s.sample = self.sample.to_local(origin, rotation);
        s
    }
}

/// Iterative [Solution]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    /// Solved hidden point (ECEF)
    pub sample: Sample,
    /// [Warnings] qualifying this solution
    pub warnings: Warnings,
}

/// Two points (analytical) [Solution]s. Always ambiguous:
/// caller is responsible for picking one side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalyticalSolution {
    /// Solution on the right hand side of AB, when facing B from A (ECEF)
    pub right: Sample,
    /// Solution on the left hand side of AB, when facing B from A (ECEF)
    pub left: Sample,
    /// [Warnings] qualifying both solutions
    pub warnings: Warnings,
}

/// Hidden point [Solver]. Stateless: may be shared between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Solver {
    /// [Config] preset
    pub cfg: Config,
    /// Reference [Ellipsoid]
    pub ellipsoid: Ellipsoid,
}

impl Solver {
    /// Builds a new [Solver]
    pub fn new(ellipsoid: Ellipsoid, cfg: Config) -> Self {
        Self { cfg, ellipsoid }
    }

    /// Solves the hidden point from 3 or more [Input]s,
    /// by weighted least squares.
    pub fn solve(&self, inputs: &[Input]) -> Result<Solution, Error> {
        iterative::solve(&self.ellipsoid, &self.cfg, inputs)
    }

    /// Solves both possible hidden points from 2 [Input]s.
    pub fn analytical_solve(&self, a: &Input, b: &Input) -> Result<AnalyticalSolution, Error> {
        analytical::solve(&self.ellipsoid, &self.cfg, a, b)
    }
}

/// Solves the hidden point from 3 or more [Input]s, with default [Config].
pub fn solve(ellipsoid: &Ellipsoid, inputs: &[Input]) -> Result<Solution, Error> {
    iterative::solve(ellipsoid, &Config::default(), inputs)
}

/// Solves both possible hidden points from 2 [Input]s, with default [Config].
pub fn analytical_solve(
    ellipsoid: &Ellipsoid,
    a: &Input,
    b: &Input,
) -> Result<AnalyticalSolution, Error> {
    analytical::solve(ellipsoid, &Config::default(), a, b)
}
