use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Euro per hour of running the fleet.
pub type HourlyCost = Quantity<f64, 0, -1, 1>;

impl Display for HourlyCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €/h", self.0)
    }
}

impl Debug for HourlyCost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}€/h", self.0)
    }
}
