use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest index value defined by the breakpoint tables.
pub const MAX_INDEX: u16 = 500;

/// The six standardized pollutants that make up the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutantId {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl PollutantId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollutantId::Pm25 => "pm25",
            PollutantId::Pm10 => "pm10",
            PollutantId::O3 => "o3",
            PollutantId::No2 => "no2",
            PollutantId::So2 => "so2",
            PollutantId::Co => "co",
        }
    }
}

impl fmt::Display for PollutantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a breakpoint table is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "ug/m3")]
    MicrogramsPerCubicMeter,
    #[serde(rename = "ppb")]
    PartsPerBillion,
    #[serde(rename = "ppm")]
    PartsPerMillion,
}

/// One interpolation segment: concentrations `c_low..=c_high` map onto
/// index values `i_low..=i_high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: f64,
    pub i_high: f64,
}

const fn bp(c_low: f64, c_high: f64, i_low: f64, i_high: f64) -> Breakpoint {
    Breakpoint {
        c_low,
        c_high,
        i_low,
        i_high,
    }
}

/// Static definition of a pollutant: identity, upstream field and breakpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pollutant {
    pub id: PollutantId,
    pub label: &'static str,
    /// Name of the hourly series in the upstream payload.
    pub hourly_field: &'static str,
    /// Unit of the breakpoint table (after conversion).
    pub unit: Unit,
    pub breakpoints: &'static [Breakpoint],
}

/// Serializable pollutant metadata for front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantMeta {
    pub id: PollutantId,
    pub label: String,
    pub unit: Unit,
}

const PM25_BREAKPOINTS: [Breakpoint; 6] = [
    bp(0.0, 12.0, 0.0, 50.0),
    bp(12.1, 35.4, 51.0, 100.0),
    bp(35.5, 55.4, 101.0, 150.0),
    bp(55.5, 150.4, 151.0, 200.0),
    bp(150.5, 250.4, 201.0, 300.0),
    bp(250.5, 500.4, 301.0, 500.0),
];

const PM10_BREAKPOINTS: [Breakpoint; 6] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 154.0, 51.0, 100.0),
    bp(155.0, 254.0, 101.0, 150.0),
    bp(255.0, 354.0, 151.0, 200.0),
    bp(355.0, 424.0, 201.0, 300.0),
    bp(425.0, 604.0, 301.0, 500.0),
];

const O3_BREAKPOINTS: [Breakpoint; 6] = [
    bp(0.0, 54.0, 0.0, 50.0),
    bp(55.0, 70.0, 51.0, 100.0),
    bp(71.0, 85.0, 101.0, 150.0),
    bp(86.0, 105.0, 151.0, 200.0),
    bp(106.0, 200.0, 201.0, 300.0),
    bp(201.0, 604.0, 301.0, 500.0),
];

const NO2_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 53.0, 0.0, 50.0),
    bp(54.0, 100.0, 51.0, 100.0),
    bp(101.0, 360.0, 101.0, 150.0),
    bp(361.0, 649.0, 151.0, 200.0),
    bp(650.0, 1249.0, 201.0, 300.0),
    bp(1250.0, 2049.0, 301.0, 400.0),
    bp(2050.0, 4049.0, 401.0, 500.0),
];

const SO2_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 35.0, 0.0, 50.0),
    bp(36.0, 75.0, 51.0, 100.0),
    bp(76.0, 185.0, 101.0, 150.0),
    bp(186.0, 304.0, 151.0, 200.0),
    bp(305.0, 604.0, 201.0, 300.0),
    bp(605.0, 804.0, 301.0, 400.0),
    bp(805.0, 1004.0, 401.0, 500.0),
];

const CO_BREAKPOINTS: [Breakpoint; 7] = [
    bp(0.0, 4.4, 0.0, 50.0),
    bp(4.5, 9.4, 51.0, 100.0),
    bp(9.5, 12.4, 101.0, 150.0),
    bp(12.5, 15.4, 151.0, 200.0),
    bp(15.5, 30.4, 201.0, 300.0),
    bp(30.5, 40.4, 301.0, 400.0),
    bp(40.5, 50.4, 401.0, 500.0),
];

/// All pollutants, in reporting order.
pub static POLLUTANTS: [Pollutant; 6] = [
    Pollutant {
        id: PollutantId::Pm25,
        label: "PM2.5",
        hourly_field: "pm2_5",
        unit: Unit::MicrogramsPerCubicMeter,
        breakpoints: &PM25_BREAKPOINTS,
    },
    Pollutant {
        id: PollutantId::Pm10,
        label: "PM10",
        hourly_field: "pm10",
        unit: Unit::MicrogramsPerCubicMeter,
        breakpoints: &PM10_BREAKPOINTS,
    },
    Pollutant {
        id: PollutantId::O3,
        label: "O3",
        hourly_field: "ozone",
        unit: Unit::PartsPerBillion,
        breakpoints: &O3_BREAKPOINTS,
    },
    Pollutant {
        id: PollutantId::No2,
        label: "NO2",
        hourly_field: "nitrogen_dioxide",
        unit: Unit::PartsPerBillion,
        breakpoints: &NO2_BREAKPOINTS,
    },
    Pollutant {
        id: PollutantId::So2,
        label: "SO2",
        hourly_field: "sulphur_dioxide",
        unit: Unit::PartsPerBillion,
        breakpoints: &SO2_BREAKPOINTS,
    },
    Pollutant {
        id: PollutantId::Co,
        label: "CO",
        hourly_field: "carbon_monoxide",
        unit: Unit::PartsPerMillion,
        breakpoints: &CO_BREAKPOINTS,
    },
];

impl Pollutant {
    pub fn get(id: PollutantId) -> &'static Pollutant {
        match id {
            PollutantId::Pm25 => &POLLUTANTS[0],
            PollutantId::Pm10 => &POLLUTANTS[1],
            PollutantId::O3 => &POLLUTANTS[2],
            PollutantId::No2 => &POLLUTANTS[3],
            PollutantId::So2 => &POLLUTANTS[4],
            PollutantId::Co => &POLLUTANTS[5],
        }
    }

    /// Comma-joined upstream field names for a single request covering every pollutant.
    pub fn hourly_fields() -> String {
        POLLUTANTS
            .iter()
            .map(|p| p.hourly_field)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn meta() -> Vec<PollutantMeta> {
        POLLUTANTS
            .iter()
            .map(|p| PollutantMeta {
                id: p.id,
                label: p.label.to_string(),
                unit: p.unit,
            })
            .collect()
    }
}
