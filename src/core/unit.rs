use bon::Builder;

use crate::quantity::{power::Megawatts, rate::MegawattHourRate};

/// Closed set of supported power plant kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Kind {
    #[display("gasfired")]
    GasFired,

    /// Kerosine-fired turbojet.
    #[display("turbojet")]
    TurboJet,

    #[display("windturbine")]
    WindTurbine,
}

impl Kind {
    /// Tons of CO₂ emitted per megawatt-hour of electrical output.
    pub const fn emission_intensity(self) -> f64 {
        match self {
            Self::GasFired | Self::TurboJet => 0.3,
            Self::WindTurbine => 0.0,
        }
    }
}

/// Single generating plant, read-only for the duration of a request.
#[derive(Clone, Debug, PartialEq, Builder)]
pub struct Unit {
    #[builder(into)]
    pub name: String,

    pub kind: Kind,

    /// Fraction of the fuel energy converted into electricity, `1.0` for wind.
    #[builder(default = 1.0)]
    pub efficiency: f64,

    #[builder(default = Megawatts::ZERO)]
    pub p_min: Megawatts,

    pub p_max: Megawatts,
}

/// Current fuel prices and wind availability.
#[derive(Copy, Clone, Debug, PartialEq, Builder)]
pub struct FuelPrices {
    pub gas: MegawattHourRate,
    pub kerosine: MegawattHourRate,

    /// Euro per ton of emitted CO₂.
    #[builder(default)]
    pub co2_per_ton: f64,

    /// Wind availability, `0` to `100`.
    #[builder(default = 100.0)]
    pub wind_percentage: f64,
}

impl FuelPrices {
    /// Price of the fuel burnt by the kind, [`None`] for sources without fuel.
    pub const fn fuel_price(&self, kind: Kind) -> Option<MegawattHourRate> {
        match kind {
            Kind::GasFired => Some(self.gas),
            Kind::TurboJet => Some(self.kerosine),
            Kind::WindTurbine => None,
        }
    }

    /// Carbon cost of a megawatt-hour produced by the kind.
    pub fn carbon_cost(&self, kind: Kind) -> MegawattHourRate {
        MegawattHourRate::from(kind.emission_intensity() * self.co2_per_ton)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_fuel_price() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(13.4))
            .kerosine(MegawattHourRate::from(50.8))
            .build();
        assert_eq!(prices.fuel_price(Kind::GasFired), Some(MegawattHourRate::from(13.4)));
        assert_eq!(prices.fuel_price(Kind::TurboJet), Some(MegawattHourRate::from(50.8)));
        assert_eq!(prices.fuel_price(Kind::WindTurbine), None);
    }

    #[test]
    fn test_carbon_cost() {
        let prices = FuelPrices::builder()
            .gas(MegawattHourRate::from(13.4))
            .kerosine(MegawattHourRate::from(50.8))
            .co2_per_ton(20.0)
            .build();
        assert_abs_diff_eq!(prices.carbon_cost(Kind::GasFired).0, 6.0);
        assert_eq!(prices.carbon_cost(Kind::WindTurbine), MegawattHourRate::ZERO);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::TurboJet.to_string(), "turbojet");
    }
}
