//! Conversion of raw mass concentrations into the units the breakpoint
//! tables are expressed in.

use crate::pollutant::PollutantId;

/// Molar volume of an ideal gas at 25 °C and 1 atm, in litres.
pub const MOLAR_VOLUME: f64 = 24.45;

/// How a raw µg/m³ reading becomes a breakpoint-table concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Already in table units (particulates).
    Identity,
    /// µg/m³ -> ppb
    ToPpb { molar_mass: f64 },
    /// µg/m³ -> ppm
    ToPpm { molar_mass: f64 },
}

impl Conversion {
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Conversion::Identity => value,
            Conversion::ToPpb { molar_mass } => value * MOLAR_VOLUME / molar_mass,
            Conversion::ToPpm { molar_mass } => value * MOLAR_VOLUME / (molar_mass * 1000.0),
        }
    }
}

/// Conversion dispatch keyed by pollutant.
pub const CONVERSIONS: [(PollutantId, Conversion); 6] = [
    (PollutantId::Pm25, Conversion::Identity),
    (PollutantId::Pm10, Conversion::Identity),
    (PollutantId::O3, Conversion::ToPpb { molar_mass: 48.0 }),
    (PollutantId::No2, Conversion::ToPpb { molar_mass: 46.0 }),
    (PollutantId::So2, Conversion::ToPpb { molar_mass: 64.066 }),
    (PollutantId::Co, Conversion::ToPpm { molar_mass: 28.01 }),
];

pub fn conversion_for(id: PollutantId) -> Conversion {
    CONVERSIONS
        .iter()
        .find(|(pollutant, _)| *pollutant == id)
        .map(|(_, conversion)| *conversion)
        .unwrap_or(Conversion::Identity)
}

/// Normalize a raw reading for `id`. Missing or non-finite input is absent.
pub fn normalize(id: PollutantId, value: Option<f64>) -> Option<f64> {
    let value = value.filter(|v| v.is_finite())?;
    Some(conversion_for(id).apply(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_non_finite_are_absent() {
        assert_eq!(normalize(PollutantId::O3, None), None);
        assert_eq!(normalize(PollutantId::O3, Some(f64::NAN)), None);
        assert_eq!(normalize(PollutantId::Pm25, Some(f64::INFINITY)), None);
    }

    #[test]
    fn test_ozone_to_ppb() {
        let ppb = normalize(PollutantId::O3, Some(48.0)).unwrap();
        assert!((ppb - 24.45).abs() < 1e-9);
    }

    #[test]
    fn test_carbon_monoxide_to_ppm() {
        let ppm = normalize(PollutantId::Co, Some(2801.0)).unwrap();
        assert!((ppm - 2.445).abs() < 1e-9);
    }

    #[test]
    fn test_particulates_pass_through() {
        assert_eq!(normalize(PollutantId::Pm25, Some(17.3)), Some(17.3));
        assert_eq!(normalize(PollutantId::Pm10, Some(0.0)), Some(0.0));
    }

    #[test]
    fn test_every_pollutant_has_a_conversion() {
        for (id, _) in CONVERSIONS.iter() {
            assert!(normalize(*id, Some(1.0)).is_some());
        }
        assert_eq!(
            conversion_for(PollutantId::So2),
            Conversion::ToPpb { molar_mass: 64.066 }
        );
    }
}
