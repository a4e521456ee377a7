mod search;

use bon::Builder;

use crate::{
    core::{
        costing::{CostedUnit, EPSILON},
        dispatch::search::CommitmentSearch,
        error::Error,
    },
    prelude::*,
    quantity::{Quantity, power::Megawatts},
};

/// Maximal allowed difference between the total assigned power and the load.
pub const CONSERVATION_TOLERANCE: Megawatts = Quantity(1e-6);

/// Assigns power to merit-ordered units so that the total meets the load exactly.
///
/// A unit is either off or runs within `[p_min, effective_p_max]`. The dispatcher fills
/// the units greedily in the merit order and then repairs the marginal unit if it ended up
/// below its floor. When the repair gets stuck, it falls back to [`CommitmentSearch`].
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Dispatcher<'a> {
    merit_order: &'a [CostedUnit<'a>],
    load: Megawatts,
}

impl<S: dispatcher_builder::IsComplete> DispatcherBuilder<'_, S> {
    /// Dispatch the load and return the power assigned to each unit, in the merit order.
    pub fn dispatch(self) -> Result<Vec<Megawatts>, Error> {
        self.build().dispatch()
    }
}

impl Dispatcher<'_> {
    #[instrument(skip_all, name = "Dispatching…", fields(load = %self.load))]
    fn dispatch(self) -> Result<Vec<Megawatts>, Error> {
        let n_units = self.merit_order.len();

        let is_committable: Vec<bool> =
            self.merit_order.iter().map(CostedUnit::is_committable).collect();
        let capacity: Megawatts = self
            .merit_order
            .iter()
            .zip(&is_committable)
            .filter(|(_, is_committable)| **is_committable)
            .map(|(unit, _)| unit.effective_p_max)
            .sum();
        if capacity < self.load - EPSILON {
            return Err(Error::InsufficientCapacity {
                load: self.load,
                capacity,
                shortfall: self.load - capacity,
            });
        }

        // Units that got dropped by the repair are no longer available:
        let mut is_available = is_committable.clone();
        let mut power = vec![Megawatts::ZERO; n_units];
        let unserved = fill(self.merit_order, &mut power, &is_available, self.load);
        debug_assert!(unserved <= EPSILON, "capacity has been checked");

        // Every iteration either confirms the plan, repairs the floor, or drops a unit:
        for _ in 0..=(n_units + 1) {
            let Some(marginal) = power.iter().rposition(|power| *power > EPSILON) else {
                // Nothing is committed, which only happens for zero load.
                return self.verify(power);
            };
            let marginal_unit = &self.merit_order[marginal];
            if power[marginal] >= marginal_unit.p_min() - EPSILON {
                return self.verify(power);
            }

            let shortfall = marginal_unit.p_min() - power[marginal];
            trace!(
                name = %marginal_unit.unit.name,
                power = %power[marginal],
                p_min = %marginal_unit.p_min(),
                %shortfall,
                "Marginal unit is below its floor",
            );
            if self.absorb(&mut power, marginal, shortfall) {
                power[marginal] = marginal_unit.p_min();
                debug!(name = %marginal_unit.unit.name, %shortfall, "Absorbed by cheaper units");
                continue;
            }

            let deficit = power[marginal];
            power[marginal] = Megawatts::ZERO;
            is_available[marginal] = false;
            debug!(name = %marginal_unit.unit.name, %deficit, "Dropped the marginal unit");
            let unserved = fill(self.merit_order, &mut power, &is_available, deficit);
            if unserved > EPSILON {
                debug!(%unserved, "Repair is stuck, searching through the commitments");
                return CommitmentSearch::new(self.merit_order, self.load, &is_committable)
                    .run()
                    .map_or(Err(Error::Unsatisfiable { load: self.load, unserved }), |power| {
                        self.verify(power)
                    });
            }
        }

        Err(Error::RepairDidNotConverge(n_units + 2))
    }

    /// Take the shortfall from the committed units cheaper than the marginal one,
    /// starting from the most expensive of them, without pushing any below its own floor.
    ///
    /// Returns `false` and leaves the power untouched if they cannot absorb all of it.
    fn absorb(&self, power: &mut [Megawatts], marginal: usize, shortfall: Megawatts) -> bool {
        let slack: Megawatts = self.merit_order[..marginal]
            .iter()
            .zip(&power[..marginal])
            .filter(|(_, power)| **power > EPSILON)
            .map(|(unit, power)| (*power - unit.p_min()).max(Megawatts::ZERO))
            .sum();
        if slack < shortfall - EPSILON {
            trace!(%slack, %shortfall, "Not enough slack to absorb");
            return false;
        }

        let mut remaining = shortfall;
        for (unit, power) in self.merit_order[..marginal].iter().zip(&mut power[..marginal]).rev() {
            if remaining <= EPSILON {
                break;
            }
            if *power <= EPSILON {
                continue;
            }
            let taken = (*power - unit.p_min()).clamp(Megawatts::ZERO, remaining);
            *power = (*power - taken).max(Megawatts::ZERO);
            remaining -= taken;
        }
        true
    }

    /// Check the conservation and the bounds before handing the plan out.
    fn verify(&self, power: Vec<Megawatts>) -> Result<Vec<Megawatts>, Error> {
        let total: Megawatts = power.iter().copied().sum();
        if !total.is_close_to(self.load, CONSERVATION_TOLERANCE) {
            return Err(Error::InvariantViolated(format!(
                "total power of {total:?} does not match the load of {:?}",
                self.load,
            )));
        }
        for (unit, power) in self.merit_order.iter().zip(&power) {
            if *power > EPSILON
                && (*power < unit.p_min() - EPSILON || *power > unit.effective_p_max + EPSILON)
            {
                return Err(Error::InvariantViolated(format!(
                    "`{}` is assigned {power:?} outside of [{:?}, {:?}]",
                    unit.unit.name,
                    unit.p_min(),
                    unit.effective_p_max,
                )));
            }
        }
        Ok(power)
    }
}

/// Spread the power over the available units' headroom in the merit order.
///
/// Returns the power that did not fit.
fn fill(
    merit_order: &[CostedUnit<'_>],
    power: &mut [Megawatts],
    is_available: &[bool],
    mut remaining: Megawatts,
) -> Megawatts {
    for ((unit, power), is_available) in merit_order.iter().zip(power).zip(is_available) {
        if remaining <= EPSILON {
            break;
        }
        if !is_available {
            continue;
        }
        let added = (unit.effective_p_max - *power).clamp(Megawatts::ZERO, remaining);
        *power += added;
        remaining -= added;
    }
    remaining.max(Megawatts::ZERO)
}
