use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::HourlyCost, rate::MegawattHourRate};

pub type Megawatts = Quantity<f64, 1, 0, 0>;

const TENTHS_NOISE: f64 = 1e-6;

impl Megawatts {
    /// Round to a tenth of a megawatt, halves away from zero.
    pub fn round_to_tenths(self) -> Self {
        Self((self.0 * 10.0).round() / 10.0)
    }

    /// Round up to a tenth of a megawatt, ignoring the floating-point noise below it.
    pub fn ceil_to_tenths(self) -> Self {
        Self((self.0 * 10.0 - TENTHS_NOISE).ceil() / 10.0)
    }

    /// Round down to a tenth of a megawatt, ignoring the floating-point noise above it.
    pub fn floor_to_tenths(self) -> Self {
        Self((self.0 * 10.0 + TENTHS_NOISE).floor() / 10.0)
    }

    /// Whether both values are equal within the absolute tolerance.
    pub fn is_close_to(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl Display for Megawatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} MW", self.0)
    }
}

impl Debug for Megawatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}MW", self.0)
    }
}

impl Mul<MegawattHourRate> for Megawatts {
    type Output = HourlyCost;

    fn mul(self, rhs: MegawattHourRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
