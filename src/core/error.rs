use crate::quantity::power::Megawatts;

/// Outward classification of [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The request describes a fleet or prices that cannot be dispatched at all.
    Configuration,

    /// The fleet cannot meet the load.
    Infeasible,

    /// The dispatcher broke its own invariants.
    Internal,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("no power plants were provided")]
    NoPowerPlants,

    #[error("power plant `{name}` has an unsupported type `{kind}`")]
    UnsupportedKind { name: String, kind: String },

    #[error("power plant `{name}`: pmin of {p_min} exceeds pmax of {p_max}")]
    InvalidBounds { name: String, p_min: Megawatts, p_max: Megawatts },

    #[error("power plant name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("`{field}` must be {requirement}, got {value}")]
    OutOfRange { field: String, requirement: &'static str, value: f64 },

    #[error("requested load of {load} exceeds the available capacity of {capacity} by {shortfall}")]
    InsufficientCapacity { load: Megawatts, capacity: Megawatts, shortfall: Megawatts },

    #[error("unable to meet the load of {load} without breaching operating floors, {unserved} unserved")]
    Unsatisfiable { load: Megawatts, unserved: Megawatts },

    #[error("floor repair did not converge after {0} iterations")]
    RepairDidNotConverge(usize),

    #[error("dispatch invariant violated: {0}")]
    InvariantViolated(String),
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoPowerPlants
            | Self::UnsupportedKind { .. }
            | Self::InvalidBounds { .. }
            | Self::DuplicateName(_)
            | Self::OutOfRange { .. } => ErrorKind::Configuration,
            Self::InsufficientCapacity { .. } | Self::Unsatisfiable { .. } => ErrorKind::Infeasible,
            Self::RepairDidNotConverge(_) | Self::InvariantViolated(_) => ErrorKind::Internal,
        }
    }
}
