use crate::{
    core::unit::{FuelPrices, Kind, Unit},
    quantity::{Quantity, power::Megawatts, rate::MegawattHourRate},
};

/// Absolute tolerance for comparing power levels.
pub const EPSILON: Megawatts = Quantity(1e-9);

/// Unit annotated with its marginal cost and the capacity it can actually deliver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostedUnit<'a> {
    /// Position of the unit in the request.
    pub index: usize,

    pub unit: &'a Unit,
    pub marginal_cost: MegawattHourRate,
    pub effective_p_max: Megawatts,
}

impl<'a> CostedUnit<'a> {
    /// Resolve the unit's marginal cost and effective capacity at the current prices.
    pub fn resolve(index: usize, unit: &'a Unit, prices: &FuelPrices) -> Self {
        let marginal_cost = prices.fuel_price(unit.kind).map_or(MegawattHourRate::ZERO, |price| {
            price / unit.efficiency + prices.carbon_cost(unit.kind)
        });
        let effective_p_max = match unit.kind {
            Kind::WindTurbine => {
                (unit.p_max * (prices.wind_percentage / 100.0)).round_to_tenths().max(Megawatts::ZERO)
            }
            Kind::GasFired | Kind::TurboJet => unit.p_max.floor_to_tenths(),
        };
        Self { index, unit, marginal_cost, effective_p_max }
    }

    /// Operating floor, rounded up so that a rounded assignment never goes below it.
    pub fn p_min(&self) -> Megawatts {
        self.unit.p_min.ceil_to_tenths()
    }

    /// Whether the unit can be committed at all, that is, its floor is reachable.
    pub fn is_committable(&self) -> bool {
        self.effective_p_max > EPSILON && self.effective_p_max >= self.p_min() - EPSILON
    }
}

/// Resolve every unit, preserving the request order.
pub fn resolve_all<'a>(units: &'a [Unit], prices: &FuelPrices) -> Vec<CostedUnit<'a>> {
    units.iter().enumerate().map(|(index, unit)| CostedUnit::resolve(index, unit, prices)).collect()
}
