use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The iterative solver needs at least 3 [Input]s. With only two of them,
    /// the solution is ambiguous (left or right of the baseline) and
    /// you should use the analytical solver instead.
    ///
    /// [Input]: crate::prelude::Input
    #[error("not enough inputs: at least 3 measurements required")]
    NotEnoughInputs,

    /// Measured horizontal distances and the baseline between the two
    /// measurement points do not form a triangle: circles do not intersect.
    #[error("inconsistent geometry: distances violate triangle inequality")]
    InconsistentGeometry,

    /// Normal equations or covariance could not be inverted.
    /// Degenerate covariance or null weights will wind up here.
    #[error("failed to invert matrix")]
    MatrixInversion,

    /// Fusion requires at least one element.
    #[error("cannot fuse an empty batch")]
    EmptyBatch,

    /// Values and variances (or covariances) must be paired one to one.
    #[error("values and variances lengths do not match")]
    LengthMismatch,

    /// Ellipsoid short name was not found in the standard table.
    #[error("unknown ellipsoid \"{0}\"")]
    UnknownEllipsoid(String),
}
