mod fusion;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{Input, Sample, Vector3, EARTH_SEMI_MAJOR_AXIS_WGS84};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Default 1-sigma = 10cm on all axes
pub const TEST_VARIANCE: f64 = 0.01;

/// Builds an [Input] surveyed at (R, y, z) ECEF, R being the WGS84 semi-major axis.
/// Close to this point, local east is +Y, local north is +Z and local up is +X.
pub fn equatorial_input(y: f64, z: f64, distance: f64) -> Input {
    Input::new(
        Sample::from_variances(
            Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, y, z),
            Vector3::new(TEST_VARIANCE, TEST_VARIANCE, TEST_VARIANCE),
        ),
        distance,
        TEST_VARIANCE,
    )
}
