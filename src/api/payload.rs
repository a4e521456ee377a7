use serde::{Deserialize, Serialize};

use crate::{
    core::{
        error::Error,
        plan::{ProductionPlan, plan},
        unit::{FuelPrices, Kind, Unit},
    },
    quantity::{power::Megawatts, rate::MegawattHourRate},
};

/// Incoming request: the load and the fleet to meet it with.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProductionPlanRequest {
    pub load: Megawatts,
    pub fuels: FuelBreakdown,
    pub powerplants: Vec<PowerPlant>,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct FuelBreakdown {
    #[serde(rename = "gas(euro/MWh)", alias = "gas_euro_mwh")]
    pub gas: MegawattHourRate,

    #[serde(rename = "kerosine(euro/MWh)", alias = "kerosine_euro_mwh")]
    pub kerosine: MegawattHourRate,

    #[serde(rename = "co2(euro/ton)", alias = "co2_euro_ton", default)]
    pub co2: f64,

    #[serde(rename = "wind(%)", alias = "wind_percentage")]
    pub wind_percentage: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PowerPlant {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: PowerPlantType,

    pub efficiency: f64,

    #[serde(rename = "pmin")]
    pub p_min: Megawatts,

    #[serde(rename = "pmax")]
    pub p_max: Megawatts,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum PowerPlantType {
    #[serde(rename = "gasfired")]
    GasFired,

    #[serde(rename = "turbojet")]
    TurboJet,

    #[serde(rename = "windturbine")]
    WindTurbine,

    /// Anything else, kept to be reported together with the plant name.
    #[serde(untagged)]
    Unsupported(String),
}

impl ProductionPlanRequest {
    /// Validate the request and compute its production plan.
    pub fn plan(&self) -> Result<ProductionPlan, Error> {
        self.validate()?;
        let units = self.powerplants.iter().map(Unit::try_from).collect::<Result<Vec<_>, _>>()?;
        plan(self.load, &units, &FuelPrices::from(self.fuels))
    }

    fn validate(&self) -> Result<(), Error> {
        ensure_range("load", self.load.0, "non-negative", |load| load >= 0.0)?;
        self.fuels.validate()?;
        if self.powerplants.is_empty() {
            return Err(Error::NoPowerPlants);
        }
        self.powerplants.iter().try_for_each(PowerPlant::validate)
    }
}

impl FuelBreakdown {
    fn validate(&self) -> Result<(), Error> {
        ensure_range("gas(euro/MWh)", self.gas.0, "positive", |price| price > 0.0)?;
        ensure_range("kerosine(euro/MWh)", self.kerosine.0, "positive", |price| price > 0.0)?;
        ensure_range("co2(euro/ton)", self.co2, "non-negative", |price| price >= 0.0)?;
        ensure_range("wind(%)", self.wind_percentage, "between 0 and 100", |percentage| {
            (0.0..=100.0).contains(&percentage)
        })
    }
}

impl From<FuelBreakdown> for FuelPrices {
    fn from(fuels: FuelBreakdown) -> Self {
        Self {
            gas: fuels.gas,
            kerosine: fuels.kerosine,
            co2_per_ton: fuels.co2,
            wind_percentage: fuels.wind_percentage,
        }
    }
}

impl PowerPlant {
    fn validate(&self) -> Result<(), Error> {
        ensure_range(
            &format!("{}.efficiency", self.name),
            self.efficiency,
            "within (0, 1]",
            |efficiency| efficiency > 0.0 && efficiency <= 1.0,
        )?;
        ensure_range(&format!("{}.pmin", self.name), self.p_min.0, "non-negative", |p_min| {
            p_min >= 0.0
        })?;
        ensure_range(&format!("{}.pmax", self.name), self.p_max.0, "positive", |p_max| p_max > 0.0)
    }
}

impl TryFrom<&PowerPlant> for Unit {
    type Error = Error;

    fn try_from(power_plant: &PowerPlant) -> Result<Self, Self::Error> {
        let kind = match &power_plant.kind {
            PowerPlantType::GasFired => Kind::GasFired,
            PowerPlantType::TurboJet => Kind::TurboJet,
            PowerPlantType::WindTurbine => Kind::WindTurbine,
            PowerPlantType::Unsupported(kind) => {
                return Err(Error::UnsupportedKind {
                    name: power_plant.name.clone(),
                    kind: kind.clone(),
                });
            }
        };
        Ok(Self {
            name: power_plant.name.clone(),
            kind,
            efficiency: power_plant.efficiency,
            p_min: power_plant.p_min,
            p_max: power_plant.p_max,
        })
    }
}

/// Fails for non-finite values or values the predicate rejects.
fn ensure_range(
    field: &str,
    value: f64,
    requirement: &'static str,
    predicate: impl FnOnce(f64) -> bool,
) -> Result<(), Error> {
    if value.is_finite() && predicate(value) {
        Ok(())
    } else {
        Err(Error::OutOfRange { field: field.to_owned(), requirement, value })
    }
}
