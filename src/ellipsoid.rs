//! Reference ellipsoids (NGA, GLONASS ICD 5.1)
use crate::{
    constants::{EARTH_INVERSE_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84},
    error::Error,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference [Ellipsoid]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis (equatorial radius, meters)
    pub a: f64,
    /// Flattening
    pub f: f64,
    /// Semi-minor axis (polar radius, meters)
    pub b: f64,
    /// Squared eccentricity
    pub e2: f64,
    /// Second squared eccentricity
    pub ep2: f64,
}

impl Default for Ellipsoid {
    /// Builds the WGS84 [Ellipsoid]
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Ellipsoid {
    /// Builds [Ellipsoid] from semi-major axis (meters) and flattening.
    pub fn from_a_f(a: f64, f: f64) -> Self {
        let b = a * (1.0 - f);
        let e2 = (a * a - b * b) / (a * a);
        let ep2 = e2 / (1.0 - e2);
        Self { a, f, b, e2, ep2 }
    }

    /// Builds [Ellipsoid] from semi-major axis (meters) and inverse flattening,
    /// which is the way most tables list them.
    pub fn from_a_inv_f(a: f64, inv_f: f64) -> Self {
        Self::from_a_f(a, 1.0 / inv_f)
    }

    /// World Geodetic System 1984
    pub fn wgs84() -> Self {
        Self::from_a_inv_f(EARTH_SEMI_MAJOR_AXIS_WGS84, EARTH_INVERSE_FLATTENING_WGS84)
    }
}

impl std::str::FromStr for Ellipsoid {
    type Err = Error;
    /// Ellipsoid lookup by (case insensitive) short name, for example "WGS84" or "PZ-90".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let standard = StandardEllipsoid::from_str(s)?;
        Ok(standard.ellipsoid())
    }
}

/// Returns parameters of the standard [Ellipsoid] identified by short name.
pub fn ellipsoid_params(name: &str) -> Result<Ellipsoid, Error> {
    name.parse::<Ellipsoid>()
}

/// Standard [Ellipsoid]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StandardEllipsoid {
    Wgs84,
    Wgs72,
    Pz90,
    Grs80,
    Clarke1866,
    Clarke1880,
    Airy1830,
    AustralianNational,
    Bessel1841,
    Bessel1841Namibia,
    EverestBrunei,
    Everest1830,
    Everest1956,
    EverestPakistan,
    Everest1948,
    Everest1969,
    Helmert1906,
    Hough1960,
    Indonesian1974,
    International1924,
    Krassovsky1940,
    ModifiedAiry,
    ModifiedFischer1960,
    SouthAmerican1969,
}

impl StandardEllipsoid {
    /// All [StandardEllipsoid]s
    pub const ALL: [Self; 24] = [
        Self::Wgs84,
        Self::Wgs72,
        Self::Pz90,
        Self::Grs80,
        Self::Clarke1866,
        Self::Clarke1880,
        Self::Airy1830,
        Self::AustralianNational,
        Self::Bessel1841,
        Self::Bessel1841Namibia,
        Self::EverestBrunei,
        Self::Everest1830,
        Self::Everest1956,
        Self::EverestPakistan,
        Self::Everest1948,
        Self::Everest1969,
        Self::Helmert1906,
        Self::Hough1960,
        Self::Indonesian1974,
        Self::International1924,
        Self::Krassovsky1940,
        Self::ModifiedAiry,
        Self::ModifiedFischer1960,
        Self::SouthAmerican1969,
    ];

    /// (semi-major axis (m), inverse flattening)
    fn a_inv_f(&self) -> (f64, f64) {
        match self {
            Self::Wgs84 => (EARTH_SEMI_MAJOR_AXIS_WGS84, EARTH_INVERSE_FLATTENING_WGS84),
            Self::Wgs72 => (6378135.0, 298.26),
            Self::Pz90 => (6378136.0, 298.25784),
            Self::Grs80 => (6378137.0, 298.257222101),
            Self::Clarke1866 => (6378206.4, 294.9786982),
            Self::Clarke1880 => (6378249.145, 293.465),
            Self::Airy1830 => (6377563.396, 299.3249646),
            Self::AustralianNational => (6378160.0, 298.25),
            Self::Bessel1841 => (6377397.155, 299.1528128),
            Self::Bessel1841Namibia => (6377483.865, 299.1528128),
            Self::EverestBrunei => (6377298.556, 300.8017),
            Self::Everest1830 => (6377276.345, 300.8017),
            Self::Everest1956 => (6377301.243, 300.8017),
            Self::EverestPakistan => (6377309.613, 300.8017),
            Self::Everest1948 => (6377304.063, 300.8017),
            Self::Everest1969 => (6377295.664, 300.8017),
            Self::Helmert1906 => (6378200.0, 298.3),
            Self::Hough1960 => (6378270.0, 297.0),
            Self::Indonesian1974 => (6378160.0, 298.247),
            Self::International1924 => (6378388.0, 297.0),
            Self::Krassovsky1940 => (6378245.0, 298.3),
            Self::ModifiedAiry => (6377340.189, 299.3249646),
            Self::ModifiedFischer1960 => (6378155.0, 298.3),
            Self::SouthAmerican1969 => (6378160.0, 298.25),
        }
    }

    /// Builds the [Ellipsoid] parameters
    pub fn ellipsoid(&self) -> Ellipsoid {
        let (a, inv_f) = self.a_inv_f();
        Ellipsoid::from_a_inv_f(a, inv_f)
    }

    /// Short name, as used in datum descriptions
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Wgs84 => "WGS84",
            Self::Wgs72 => "WGS72",
            Self::Pz90 => "PZ-90",
            Self::Grs80 => "GRS80",
            Self::Clarke1866 => "CLK66",
            Self::Clarke1880 => "CLK80",
            Self::Airy1830 => "AIR30",
            Self::AustralianNational => "AUSNT",
            Self::Bessel1841 => "BES41",
            Self::Bessel1841Namibia => "BEN41",
            Self::EverestBrunei => "EVRBM",
            Self::Everest1830 => "EVR30",
            Self::Everest1956 => "EVR56",
            Self::EverestPakistan => "EVRPK",
            Self::Everest1948 => "EVR48",
            Self::Everest1969 => "EVR69",
            Self::Helmert1906 => "HLM06",
            Self::Hough1960 => "HGH60",
            Self::Indonesian1974 => "IND74",
            Self::International1924 => "INT24",
            Self::Krassovsky1940 => "KRA40",
            Self::ModifiedAiry => "MDAIR",
            Self::ModifiedFischer1960 => "MFS60",
            Self::SouthAmerican1969 => "SAM69",
        }
    }

    /// Readable name
    pub fn long_name(&self) -> &'static str {
        match self {
            Self::Wgs84 => "World Geodetic System 1984",
            Self::Wgs72 => "World Geodetic System 1972",
            Self::Pz90 => "Parametri Zemli 1990",
            Self::Grs80 => "Geodetic Reference System 1980",
            Self::Clarke1866 => "Clarke 1866",
            Self::Clarke1880 => "Clarke 1880",
            Self::Airy1830 => "Airy 1830",
            Self::AustralianNational => "Australian National",
            Self::Bessel1841 => "Bessel 1841",
            Self::Bessel1841Namibia => "Bessel 1841 (Namibia)",
            Self::EverestBrunei => "Everest (Brunei, E. Malaysia (Sabah and Sarawak))",
            Self::Everest1830 => "Everest 1830",
            Self::Everest1956 => "Everest 1956 (India and Nepal)",
            Self::EverestPakistan => "Everest (Pakistan)",
            Self::Everest1948 => "Everest 1948 (W. Malaysia and Singapore)",
            Self::Everest1969 => "Everest 1969 (W. Malaysia)",
            Self::Helmert1906 => "Helmert 1906",
            Self::Hough1960 => "Hough 1960",
            Self::Indonesian1974 => "Indonesian 1974",
            Self::International1924 => "International 1924",
            Self::Krassovsky1940 => "Krassovsky 1940",
            Self::ModifiedAiry => "Modified Airy",
            Self::ModifiedFischer1960 => "Modified Fischer 1960",
            Self::SouthAmerican1969 => "South American 1969",
        }
    }
}

impl std::str::FromStr for StandardEllipsoid {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .find(|ell| ell.short_name().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or(Error::UnknownEllipsoid(trimmed.to_string()))
    }
}

impl std::fmt::Display for StandardEllipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
