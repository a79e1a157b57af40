use hifitime::{Duration, Epoch};
use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{covariance::sep_3d_99, error::Error, fusion::fuse_update};

/// [Integrator] status, after each new coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    /// Coordinate accepted (or ignored because simultaneous)
    Ok,
    /// Last coordinate lies outside the 99% probability sphere
    /// of the accumulated estimate: rejected.
    NewPointTooFar,
    /// Reserved: rover not stable over the integration period.
    InMotion,
    /// Reserved: last coordinate has very poor variance compared
    /// to the other data in the integral.
    PoorQuality,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NewPointTooFar => write!(f, "new point too far"),
            Self::InMotion => write!(f, "in motion"),
            Self::PoorQuality => write!(f, "poor quality"),
        }
    }
}

/// Streaming position [Integrator]: fuses raw position solutions of a static point
/// as they come, rejecting outliers.
///
/// Successive solutions suffer from correlated (multipath) errors, which
/// decorrelate over `period`. Samples closer in time than that are de-weighted.
/// One [Integrator] per tracked point; it is not synchronized.
#[derive(Debug, Clone)]
pub struct Integrator {
    /// Multipath decorrelation period
    period: Duration,
    /// Last accepted sample time
    last_sample_time: Option<Epoch>,
    /// Number of continuous samples
    samples: u32,
    /// Fused position
    position: Vector3<f64>,
    /// Fused covariance
    covariance: Matrix3<f64>,
}

impl Integrator {
    /// Builds a new [Integrator] with this multipath decorrelation period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            samples: 0,
            last_sample_time: None,
            position: Vector3::zeros(),
            covariance: Matrix3::zeros(),
        }
    }

    /// Reset this [Integrator]. Next coordinate will seed the estimate.
    pub fn clear(&mut self) {
        self.samples = 0;
        self.last_sample_time = None;
        self.position = Vector3::zeros();
        self.covariance = Matrix3::zeros();
    }

    /// Push a new coordinate into this [Integrator].
    /// The internal state is left untouched unless [Status::Ok] is returned.
    pub fn add_coordinate(
        &mut self,
        t: Epoch,
        position: Vector3<f64>,
        covariance: Matrix3<f64>,
    ) -> Result<Status, Error> {
        let last_t = match self.last_sample_time {
            Some(last_t) if self.samples > 0 => last_t,
            _ => {
                self.position = position;
                self.covariance = covariance;
                self.samples = 1;
                self.last_sample_time = Some(t);
                return Ok(Status::Ok);
            },
        };

        let distance = (position - self.position).norm();
        let sep_99 = sep_3d_99(&self.covariance);

        if distance > sep_99 {
            debug!(
                "{} - rejected coordinate: |dx|={:.4}m > sep99={:.4}m",
                t, distance, sep_99
            );
            return Ok(Status::NewPointTooFar);
        }

        let dt = t - last_t;
        if dt <= Duration::ZERO {
            if dt < Duration::ZERO {
                warn!("{} - ignored coordinate: prior last sample ({})", t, last_t);
            }
            return Ok(Status::Ok);
        }

        // de-weighting factor, applied on the largest contribution
        let alpha = if dt < self.period {
            self.period.to_seconds() / dt.to_seconds()
        } else {
            1.0
        };

        let (mut new_covar, mut running_covar) = (covariance, self.covariance);

        if covariance.trace() > self.covariance.trace() {
            new_covar *= alpha;
        } else {
            running_covar *= alpha;
        }

        let mut running_position = self.position;
        fuse_update(
            &position,
            &new_covar,
            &mut running_position,
            &mut running_covar,
        )?;

        debug!(
            "{} - fused coordinate #{} (dt={}, alpha={:.3})",
            t,
            self.samples + 1,
            dt,
            alpha
        );

        self.position = running_position;
        self.covariance = running_covar;
        self.samples += 1;
        self.last_sample_time = Some(t);

        Ok(Status::Ok)
    }

    /// Fused position
    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Fused covariance
    pub fn covariance(&self) -> &Matrix3<f64> {
        &self.covariance
    }

    /// Number of continuous samples in the estimate
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Time of the last sample that contributed
    pub fn last_sample_time(&self) -> Option<Epoch> {
        self.last_sample_time
    }

    /// Multipath decorrelation period
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod test {
    use super::{Integrator, Status};
    use hifitime::{Duration, Epoch};
    use nalgebra::{Matrix3, Vector3};

    #[test]
    fn first_coordinate_seeds() {
        let t0 = Epoch::from_gpst_seconds(0.0);
        let mut integrator = Integrator::new(Duration::from_seconds(30.0));

        let pos = Vector3::new(1.0, 2.0, 3.0);
        let covar = Matrix3::identity() * 10.0;

        assert_eq!(integrator.add_coordinate(t0, pos, covar), Ok(Status::Ok));
        assert_eq!(integrator.samples(), 1);
        assert_eq!(integrator.position(), &pos);
        assert_eq!(integrator.covariance(), &covar);
        assert_eq!(integrator.last_sample_time(), Some(t0));

        integrator.clear();
        assert_eq!(integrator.samples(), 0);
        assert!(integrator.last_sample_time().is_none());

        let pos = Vector3::new(100.0, 200.0, 300.0);
        assert_eq!(integrator.add_coordinate(t0, pos, covar), Ok(Status::Ok));
        assert_eq!(integrator.position(), &pos);
    }

    #[test]
    fn simultaneous_coordinate_ignored() {
        let t0 = Epoch::from_gpst_seconds(10.0);
        let mut integrator = Integrator::new(Duration::from_seconds(30.0));

        let covar = Matrix3::identity();
        integrator
            .add_coordinate(t0, Vector3::new(0.0, 0.0, 0.0), covar)
            .unwrap();

        let status = integrator
            .add_coordinate(t0, Vector3::new(0.1, 0.0, 0.0), covar)
            .unwrap();

        assert_eq!(status, Status::Ok);
        assert_eq!(integrator.samples(), 1);
        assert_eq!(integrator.position(), &Vector3::zeros());
    }

    #[test]
    fn decorrelated_coordinates() {
        let t0 = Epoch::from_gpst_seconds(0.0);
        let mut integrator = Integrator::new(Duration::from_seconds(30.0));

        let covar = Matrix3::identity();
        integrator
            .add_coordinate(t0, Vector3::new(0.0, 0.0, 0.0), covar)
            .unwrap();

        // past the decorrelation period: plain inverse variance weighting
        let t1 = t0 + Duration::from_seconds(60.0);
        integrator
            .add_coordinate(t1, Vector3::new(0.2, 0.0, 0.0), covar)
            .unwrap();

        assert_eq!(integrator.samples(), 2);
        assert!((integrator.position() - Vector3::new(0.1, 0.0, 0.0)).norm() < 1.0E-12);
        assert!((integrator.covariance() - Matrix3::identity() * 0.5).norm() < 1.0E-12);
    }

    #[test]
    fn correlated_coordinates_deweighted() {
        let t0 = Epoch::from_gpst_seconds(0.0);
        let mut integrator = Integrator::new(Duration::from_seconds(30.0));

        integrator
            .add_coordinate(t0, Vector3::zeros(), Matrix3::identity())
            .unwrap();

        // 10s later, new sample is 3 times de-weighted (larger trace)
        let t1 = t0 + Duration::from_seconds(10.0);
        integrator
            .add_coordinate(t1, Vector3::new(0.4, 0.0, 0.0), Matrix3::identity() * 2.0)
            .unwrap();

        // 1/P = 1 + 1/6
        let expected_var = 6.0 / 7.0;
        assert!((integrator.covariance()[(0, 0)] - expected_var).abs() < 1.0E-12);
        assert!((integrator.position()[0] - expected_var * 0.4 / 6.0).abs() < 1.0E-12);
    }
}
