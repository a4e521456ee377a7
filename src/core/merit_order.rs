use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::core::costing::CostedUnit;

/// Order the units from the cheapest to the most expensive marginal cost.
///
/// Ties go to the larger effective capacity first, so that fewer units have to be committed,
/// and then to the request order.
pub fn build(units: Vec<CostedUnit<'_>>) -> Vec<CostedUnit<'_>> {
    units
        .into_iter()
        .sorted_by_key(|unit| {
            (
                OrderedFloat(unit.marginal_cost.0),
                Reverse(OrderedFloat(unit.effective_p_max.0)),
                unit.index,
            )
        })
        .collect()
}
