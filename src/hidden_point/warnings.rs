#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Solution [Warnings]: independent flags that qualify an otherwise valid solution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Warnings(u32);

impl Warnings {
    /// No warning
    pub const OK: Self = Self(0x00);

    /// Geometry or number of inputs does not allow to pick a unique solution
    pub const AMBIGUOUS: Self = Self(0x01);

    /// Poor horizontal precision (PDOP or residual test failed)
    pub const HORIZ_IMPRECISE: Self = Self(0x02);

    /// Poor vertical precision (residual test failed)
    pub const VERT_IMPRECISE: Self = Self(0x04);

    /// Raw bitmask
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Builds [Warnings] from a raw bitmask. Unknown bits are dropped.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & (Self::AMBIGUOUS.0 | Self::HORIZ_IMPRECISE.0 | Self::VERT_IMPRECISE.0))
    }

    /// True when all flags of `other` are raised
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when no flag is raised
    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Warnings {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Warnings {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for Warnings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_ok() {
            return write!(f, "ok");
        }

        let flags = [
            (Self::AMBIGUOUS, "ambiguous"),
            (Self::HORIZ_IMPRECISE, "horiz-imprecise"),
            (Self::VERT_IMPRECISE, "vert-imprecise"),
        ];

        let descriptors = flags
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();

        write!(f, "{}", descriptors.join("|"))
    }
}
