use crate::{
    core::{
        costing::{CostedUnit, EPSILON},
        dispatch::fill,
    },
    prelude::*,
    quantity::{cost::HourlyCost, power::Megawatts},
};

/// Maximal number of search tree nodes to visit before giving up.
const MAX_VISITED: usize = 1 << 16;

/// Depth-first search through the sets of committed units.
///
/// Each committed unit starts at its floor, the rest of the load is filled in the merit order,
/// and the cheapest such assignment wins. Branches whose floors already overshoot the load,
/// or whose ceilings can no longer reach it, are pruned.
pub struct CommitmentSearch<'a> {
    merit_order: &'a [CostedUnit<'a>],
    load: Megawatts,
    is_committable: &'a [bool],

    /// Committable capacity from the index onwards.
    remaining_capacity: Vec<Megawatts>,

    is_committed: Vec<bool>,
    n_visited: usize,
    best: Option<(HourlyCost, Vec<Megawatts>)>,
}

impl<'a> CommitmentSearch<'a> {
    pub fn new(
        merit_order: &'a [CostedUnit<'a>],
        load: Megawatts,
        is_committable: &'a [bool],
    ) -> Self {
        let mut remaining_capacity = vec![Megawatts::ZERO; merit_order.len() + 1];
        for (index, (unit, is_committable)) in merit_order.iter().zip(is_committable).enumerate().rev()
        {
            remaining_capacity[index] = remaining_capacity[index + 1]
                + if *is_committable { unit.effective_p_max } else { Megawatts::ZERO };
        }
        Self {
            merit_order,
            load,
            is_committable,
            remaining_capacity,
            is_committed: vec![false; merit_order.len()],
            n_visited: 0,
            best: None,
        }
    }

    /// Return the power of the cheapest feasible assignment, in the merit order.
    #[instrument(skip_all, name = "Searching…", fields(load = %self.load))]
    pub fn run(mut self) -> Option<Vec<Megawatts>> {
        self.visit(0, Megawatts::ZERO, Megawatts::ZERO);
        if self.n_visited > MAX_VISITED {
            warn!(n_visited = self.n_visited, "Gave up the search");
        } else {
            debug!(n_visited = self.n_visited, is_found = self.best.is_some(), "Searched");
        }
        self.best.map(|(_, power)| power)
    }

    fn visit(&mut self, index: usize, floor: Megawatts, ceiling: Megawatts) {
        if self.n_visited > MAX_VISITED
            || floor > self.load + EPSILON
            || ceiling + self.remaining_capacity[index] < self.load - EPSILON
        {
            return;
        }
        self.n_visited += 1;

        let Some(unit) = self.merit_order.get(index) else {
            self.evaluate(floor);
            return;
        };
        if self.is_committable[index] {
            self.is_committed[index] = true;
            self.visit(index + 1, floor + unit.p_min(), ceiling + unit.effective_p_max);
            self.is_committed[index] = false;
        }
        self.visit(index + 1, floor, ceiling);
    }

    fn evaluate(&mut self, floor: Megawatts) {
        let mut power: Vec<Megawatts> = self
            .merit_order
            .iter()
            .zip(&self.is_committed)
            .map(|(unit, is_committed)| if *is_committed { unit.p_min() } else { Megawatts::ZERO })
            .collect();
        let unserved = fill(
            self.merit_order,
            &mut power,
            &self.is_committed,
            (self.load - floor).max(Megawatts::ZERO),
        );
        if unserved > EPSILON {
            return;
        }
        let cost: HourlyCost =
            self.merit_order.iter().zip(&power).map(|(unit, power)| *power * unit.marginal_cost).sum();
        if self.best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
            self.best = Some((cost, power));
        }
    }
}
