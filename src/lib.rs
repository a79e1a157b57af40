#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod covariance;
mod ellipsoid;
mod error;
mod frame;
mod fusion;
mod hidden_point;
mod statistics;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::Config;
    pub use crate::constants::{
        CEP_50_FACTOR, EARTH_INVERSE_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84, SEP_50_FACTOR,
        SEP_99_FACTOR,
    };
    pub use crate::covariance::{
        cep_horizontal, drms_horizontal, drms_vertical, mrse_3d, sep_3d, sep_3d_99, to_global,
        to_local, Accuracy,
    };
    pub use crate::ellipsoid::{ellipsoid_params, Ellipsoid, StandardEllipsoid};
    pub use crate::error::Error;
    pub use crate::frame::{ecef_to_geodetic, geodetic_to_ecef, local_tangent_rotation};
    pub use crate::fusion::{
        fuse_ellipsis, fuse_scalar, fuse_update, fuse_vector, Estimate, Integrator, Status,
    };
    pub use crate::hidden_point::{
        analytical_solve, solve, AnalyticalSolution, Input, Pairing, Sample, SeedCandidates,
        SeedChoice, SeedDecision, Solution, Solver, Warnings,
    };
    pub use crate::statistics::{mean, variance};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::{Matrix3, Vector3};
}

// pub export
pub use error::Error;
