//! ECEF, geodetic and local tangent (east, north, up) frames
use nalgebra::{Matrix3, Vector3};

use crate::ellipsoid::Ellipsoid;

/// Converts ECEF coordinates (meters) to geodetic coordinates,
/// returned as (latitude (ddeg), longitude (ddeg), altitude above ellipsoid (m)).
/// Closed form solution, with an altitude expression that
/// remains valid at the poles.
pub fn ecef_to_geodetic(ellipsoid: &Ellipsoid, ecef_m: &Vector3<f64>) -> (f64, f64, f64) {
    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);
    let (a, b, e2, ep2) = (ellipsoid.a, ellipsoid.b, ellipsoid.e2, ellipsoid.ep2);

    // distance to polar axis
    let p = (x * x + y * y).sqrt();

    let th = (a * z).atan2(b * p);
    let (sin_th, cos_th) = th.sin_cos();

    let lon_rad = y.atan2(x);
    let lat_rad = (z + ep2 * b * sin_th.powi(3)).atan2(p - e2 * a * cos_th.powi(3));

    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    let alt_m = cos_lat * p + sin_lat * (z + e2 * n * sin_lat) - n;

    (lat_rad.to_degrees(), lon_rad.to_degrees(), alt_m)
}

/// Converts geodetic coordinates (ddeg, ddeg, meters above ellipsoid)
/// to ECEF coordinates (meters).
pub fn geodetic_to_ecef(
    ellipsoid: &Ellipsoid,
    lat_ddeg: f64,
    long_ddeg: f64,
    alt_m: f64,
) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_ddeg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = long_ddeg.to_radians().sin_cos();

    let n = ellipsoid.a / (1.0 - ellipsoid.e2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + alt_m) * cos_lat * cos_lon,
        (n + alt_m) * cos_lat * sin_lon,
        (n * (1.0 - ellipsoid.e2) + alt_m) * sin_lat,
    )
}

/// Returns the rotation matrix that maps ECEF vectors into the
/// local tangent frame (east, north, up) at this ECEF position.
/// The geodetic latitude is computed when not provided.
///
/// At the north pole this is the identity,
/// at the south pole the negated identity.
pub fn local_tangent_rotation(
    ellipsoid: &Ellipsoid,
    ecef_m: &Vector3<f64>,
    lat_ddeg: Option<f64>,
) -> Matrix3<f64> {
    let lat_ddeg = lat_ddeg.unwrap_or_else(|| ecef_to_geodetic(ellipsoid, ecef_m).0);

    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);
    let xy = (x * x + y * y).sqrt();

    if lat_ddeg >= 90.0 || (xy == 0.0 && z > 0.0) {
        return Matrix3::identity();
    } else if lat_ddeg <= -90.0 || (xy == 0.0 && z < 0.0) {
        return -Matrix3::identity();
    }

    // easting is the only axis parallel to the equatorial plane
    let east = Vector3::new(-y / xy, x / xy, 0.0);

    // Tilting by tan(lat) * xy amplifies our error on xy next to the poles.
    // We move along the polar axis by d = Rn * e² * sin(lat) instead,
    // which lands on the ellipsoid normal.
    let sin_lat = lat_ddeg.to_radians().sin();
    let d = ellipsoid.e2 * sin_lat * ellipsoid.a / (1.0 - ellipsoid.e2 * sin_lat * sin_lat).sqrt();
    let up = Vector3::new(x, y, z + d).normalize();

    let north = up.cross(&east);

    Matrix3::from_rows(&[east.transpose(), north.transpose(), up.transpose()])
}
