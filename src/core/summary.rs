use crate::quantity::{cost::HourlyCost, power::Megawatts};

/// Production plan summary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    /// Total assigned power before rounding.
    pub total_power: Megawatts,

    /// Fuel and carbon cost of running the plan for an hour.
    pub hourly_cost: HourlyCost,

    pub n_committed: usize,
}
