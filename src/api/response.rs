use serde::{Deserialize, Serialize};

use crate::{core::plan::ProductionPlan, quantity::power::Megawatts};

/// Power assigned to a single plant.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PowerDispatch {
    pub name: String,
    pub p: Megawatts,
}

impl From<&ProductionPlan> for Vec<PowerDispatch> {
    fn from(plan: &ProductionPlan) -> Self {
        plan.entries
            .iter()
            .map(|entry| PowerDispatch { name: entry.name.clone(), p: entry.power })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}
