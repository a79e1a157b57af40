/// WGS84 Earth Frame Ellipsoid semi-major axis
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 inverse flattening
pub const EARTH_INVERSE_FLATTENING_WGS84: f64 = 298.257223563_f64;

/// Circular Error Probable (50%) scaling of the eigenvalues fourth roots sum.
/// Valid when the larger standard deviation is no more than 3 times the smaller one,
/// see "Fundamentals of High Accuracy Inertial Navigation" (A. B. Chatfield).
pub const CEP_50_FACTOR: f64 = 0.589;

/// Spherical Error Probable (50%) scaling, from NovAtel APN-029 rev.1
pub const SEP_50_FACTOR: f64 = 0.51;

/// Spherical Error Probable (99%) scaling, from NovAtel APN-029 rev.1
pub const SEP_99_FACTOR: f64 = 1.122;

/// Squared PDOP limit. 4.0 corresponds to a 45° separation
/// of two lines of sight.
pub const MAX_PDOP2: f64 = 4.0;

/// Squared residual to variance ratio, above which a measurement is
/// considered an outlier (2 sigma).
pub const RESIDUAL_GATE: f64 = 4.0;

/// Seed ambiguity ratio test: the best pairing distance times this
/// factor must remain below the second best.
pub const AMBIGUITY_RATIO: f64 = 4.0;

/// Maximal number of Gauss-Newton iterations
pub const MAX_ITERATIONS: usize = 5;

/// Gauss-Newton convergence criterion (step norm, meters)
pub const CONVERGENCE_M: f64 = 0.001;
