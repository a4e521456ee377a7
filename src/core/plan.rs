use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    core::{
        costing::{self, CostedUnit, EPSILON},
        dispatch::Dispatcher,
        error::Error,
        merit_order,
        summary::Summary,
        unit::{FuelPrices, Kind, Unit},
    },
    prelude::*,
    quantity::{power::Megawatts, rate::MegawattHourRate},
};

/// Power assigned to a single unit.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanEntry {
    pub name: String,
    pub kind: Kind,
    pub marginal_cost: MegawattHourRate,
    pub effective_p_max: Megawatts,

    /// Assigned power, rounded to a tenth of a megawatt.
    pub power: Megawatts,
}

/// Production plan, one entry per unit in the request order.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductionPlan {
    pub entries: Vec<PlanEntry>,
    pub summary: Summary,
}

impl ProductionPlan {
    /// Restore the request order and round the assigned power.
    fn format(merit_order: &[CostedUnit<'_>], power: &[Megawatts]) -> Self {
        let summary = Summary {
            total_power: power.iter().copied().sum(),
            hourly_cost: merit_order
                .iter()
                .zip(power)
                .map(|(unit, power)| *power * unit.marginal_cost)
                .sum(),
            n_committed: power.iter().filter(|power| **power > EPSILON).count(),
        };
        let entries = merit_order
            .iter()
            .zip(power)
            .sorted_by_key(|(unit, _)| unit.index)
            .map(|(unit, power)| PlanEntry {
                name: unit.unit.name.clone(),
                kind: unit.unit.kind,
                marginal_cost: unit.marginal_cost,
                effective_p_max: unit.effective_p_max,
                power: power.round_to_tenths(),
            })
            .collect();
        Self { entries, summary }
    }
}

/// Compute the least-cost production plan that meets the load exactly.
///
/// The load and the unit bounds are quantized to tenths of a megawatt before the dispatch,
/// so that the rounded plan still sums up to the load and respects the floors.
#[instrument(skip_all, name = "Planning…", fields(load = %load, n_units = units.len()))]
pub fn plan(load: Megawatts, units: &[Unit], prices: &FuelPrices) -> Result<ProductionPlan, Error> {
    validate(units)?;

    let merit_order = merit_order::build(costing::resolve_all(units, prices));
    for unit in &merit_order {
        trace!(
            name = %unit.unit.name,
            marginal_cost = %unit.marginal_cost,
            effective_p_max = %unit.effective_p_max,
            is_committable = unit.is_committable(),
            "Merit order",
        );
    }

    let load = load.round_to_tenths();
    let power = Dispatcher::builder().merit_order(&merit_order).load(load).dispatch()?;
    let plan = ProductionPlan::format(&merit_order, &power);
    debug!(
        n_committed = plan.summary.n_committed,
        hourly_cost = %plan.summary.hourly_cost,
        "Planned",
    );
    Ok(plan)
}

fn validate(units: &[Unit]) -> Result<(), Error> {
    let mut names = HashSet::with_capacity(units.len());
    for unit in units {
        if unit.p_min > unit.p_max {
            return Err(Error::InvalidBounds {
                name: unit.name.clone(),
                p_min: unit.p_min,
                p_max: unit.p_max,
            });
        }
        if !names.insert(unit.name.as_str()) {
            return Err(Error::DuplicateName(unit.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn powers(plan: &ProductionPlan) -> Vec<(&str, f64)> {
        plan.entries.iter().map(|entry| (entry.name.as_str(), entry.power.0)).collect()
    }

    #[test]
    fn test_cheaper_gas_filled_first() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [
            Unit::builder()
                .name("gas")
                .kind(Kind::GasFired)
                .efficiency(0.5)
                .p_max(Megawatts::from(200.0))
                .build(),
            Unit::builder().name("kerosine").kind(Kind::TurboJet).p_max(Megawatts::from(200.0)).build(),
        ];
        let plan = plan(Megawatts::from(300.0), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("gas", 200.0), ("kerosine", 100.0)]);
        assert_abs_diff_eq!(plan.summary.hourly_cost.0, 9000.0);
        assert_eq!(plan.summary.n_committed, 2);
    }

    #[test]
    fn test_entries_follow_request_order() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [
            Unit::builder()
                .name("gas")
                .kind(Kind::GasFired)
                .efficiency(0.5)
                .p_min(Megawatts::from(100.0))
                .p_max(Megawatts::from(200.0))
                .build(),
            Unit::builder().name("wind").kind(Kind::WindTurbine).p_max(Megawatts::from(50.0)).build(),
        ];
        let plan = plan(Megawatts::from(210.0), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("gas", 160.0), ("wind", 50.0)]);
    }

    #[test]
    fn test_floor_repair() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(20.0))
            .build();
        let units = [
            Unit::builder().name("A").kind(Kind::GasFired).p_max(Megawatts::from(200.0)).build(),
            Unit::builder()
                .name("B")
                .kind(Kind::TurboJet)
                .p_min(Megawatts::from(50.0))
                .p_max(Megawatts::from(100.0))
                .build(),
        ];
        let plan = plan(Megawatts::from(205.0), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("A", 155.0), ("B", 50.0)]);
    }

    #[test]
    fn test_carbon_price_with_partial_wind() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(13.4))
            .kerosine(MegawattHourRate::from(50.8))
            .co2_per_ton(20.0)
            .wind_percentage(60.0)
            .build();
        let units = [
            Unit::builder()
                .name("gasfiredbig1")
                .kind(Kind::GasFired)
                .efficiency(0.53)
                .p_min(Megawatts::from(100.0))
                .p_max(Megawatts::from(460.0))
                .build(),
            Unit::builder()
                .name("gasfiredbig2")
                .kind(Kind::GasFired)
                .efficiency(0.53)
                .p_min(Megawatts::from(100.0))
                .p_max(Megawatts::from(460.0))
                .build(),
            Unit::builder()
                .name("gasfiredsomewhatsmaller")
                .kind(Kind::GasFired)
                .efficiency(0.37)
                .p_min(Megawatts::from(40.0))
                .p_max(Megawatts::from(210.0))
                .build(),
            Unit::builder()
                .name("tj1")
                .kind(Kind::TurboJet)
                .efficiency(0.3)
                .p_max(Megawatts::from(16.0))
                .build(),
            Unit::builder().name("windpark1").kind(Kind::WindTurbine).p_max(Megawatts::from(150.0)).build(),
            Unit::builder().name("windpark2").kind(Kind::WindTurbine).p_max(Megawatts::from(36.0)).build(),
        ];
        let plan = plan(Megawatts::from(910.0), &units, &prices).unwrap();
        assert_eq!(
            powers(&plan),
            [
                ("gasfiredbig1", 460.0),
                ("gasfiredbig2", 338.4),
                ("gasfiredsomewhatsmaller", 0.0),
                ("tj1", 0.0),
                ("windpark1", 90.0),
                ("windpark2", 21.6),
            ],
        );
        assert_eq!(plan.summary.n_committed, 4);
    }

    #[test]
    fn test_uncommittable_unit_gets_nothing() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .wind_percentage(10.0)
            .build();
        let units = [
            Unit::builder()
                .name("wind")
                .kind(Kind::WindTurbine)
                .p_min(Megawatts::from(20.0))
                .p_max(Megawatts::from(100.0))
                .build(),
            Unit::builder().name("gas").kind(Kind::GasFired).p_max(Megawatts::from(100.0)).build(),
        ];
        let plan = plan(Megawatts::from(50.0), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("wind", 0.0), ("gas", 50.0)]);
    }

    #[test]
    fn test_invalid_bounds() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [Unit::builder()
            .name("broken")
            .kind(Kind::GasFired)
            .p_min(Megawatts::from(150.0))
            .p_max(Megawatts::from(100.0))
            .build()];
        assert_eq!(
            plan(Megawatts::from(50.0), &units, &prices),
            Err(Error::InvalidBounds {
                name: "broken".to_owned(),
                p_min: Megawatts::from(150.0),
                p_max: Megawatts::from(100.0),
            }),
        );
    }

    #[test]
    fn test_duplicate_name() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let unit = Unit::builder().name("twin").kind(Kind::GasFired).p_max(Megawatts::from(100.0)).build();
        assert_eq!(
            plan(Megawatts::from(50.0), &[unit.clone(), unit], &prices),
            Err(Error::DuplicateName("twin".to_owned())),
        );
    }

    #[test]
    fn test_infeasible_load_returns_no_plan() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [Unit::builder().name("gas").kind(Kind::GasFired).p_max(Megawatts::from(100.0)).build()];
        assert!(matches!(
            plan(Megawatts::from(100.5), &units, &prices),
            Err(Error::InsufficientCapacity { .. }),
        ));
    }

    #[test]
    fn test_rounding_to_tenths() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [
            Unit::builder().name("gas").kind(Kind::GasFired).p_max(Megawatts::from(100.0)).build(),
            Unit::builder().name("tj").kind(Kind::TurboJet).p_max(Megawatts::from(100.0)).build(),
        ];
        let plan = plan(Megawatts::from(120.25), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("gas", 100.0), ("tj", 20.3)]);
        assert_abs_diff_eq!(plan.summary.total_power.0, 120.3, epsilon = 1e-9);
        let total: f64 = plan.entries.iter().map(|entry| entry.power.0).sum();
        assert_abs_diff_eq!(total, 120.3, epsilon = 1e-9);
    }

    #[test]
    fn test_rounded_power_respects_fractional_floor() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [
            Unit::builder()
                .name("gas")
                .kind(Kind::GasFired)
                .p_min(Megawatts::from(20.04))
                .p_max(Megawatts::from(30.0))
                .build(),
            Unit::builder().name("tj").kind(Kind::TurboJet).p_max(Megawatts::from(50.0)).build(),
        ];

        let plan = plan(Megawatts::from(20.04), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("gas", 0.0), ("tj", 20.0)]);

        let plan = super::plan(Megawatts::from(25.04), &units, &prices).unwrap();
        assert_eq!(powers(&plan), [("gas", 25.0), ("tj", 0.0)]);
    }

    #[test]
    fn test_fractional_floor_above_rounded_load_is_unsatisfiable() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(10.0))
            .kerosine(MegawattHourRate::from(50.0))
            .build();
        let units = [Unit::builder()
            .name("gas")
            .kind(Kind::GasFired)
            .p_min(Megawatts::from(20.04))
            .p_max(Megawatts::from(30.0))
            .build()];
        assert!(matches!(
            plan(Megawatts::from(20.04), &units, &prices),
            Err(Error::Unsatisfiable { .. }),
        ));
    }
}
