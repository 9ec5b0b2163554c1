//! IQAr air quality index.
//!
//! Each pollutant's concentration is mapped to a sub-index by piecewise-linear
//! interpolation over its breakpoint table; the pollutant with the highest
//! sub-index is dominant and decides the category.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Sub-index for concentrations beyond the last breakpoint.
pub const CEILING_INDEX: f64 = 300.0;

/// Index ranges shared by every pollutant, aligned with its concentration bands.
const INDEX_BANDS: [(f64, f64); 5] = [
    (0.0, 40.0),
    (41.0, 80.0),
    (81.0, 120.0),
    (121.0, 200.0),
    (201.0, 300.0),
];

// Concentrations in provider-native units (µg/m³).
const PM10_BANDS: [(f64, f64); 5] = [
    (0.0, 50.0),
    (51.0, 100.0),
    (101.0, 150.0),
    (151.0, 250.0),
    (251.0, 600.0),
];
const PM2_5_BANDS: [(f64, f64); 5] = [
    (0.0, 25.0),
    (26.0, 50.0),
    (51.0, 75.0),
    (76.0, 125.0),
    (126.0, 250.0),
];
const O3_BANDS: [(f64, f64); 5] = [
    (0.0, 100.0),
    (101.0, 130.0),
    (131.0, 160.0),
    (161.0, 200.0),
    (201.0, 800.0),
];
const CO_BANDS: [(f64, f64); 5] = [
    (0.0, 9000.0),
    (9001.0, 11000.0),
    (11001.0, 13000.0),
    (13001.0, 15000.0),
    (15001.0, 30000.0),
];
const NO2_BANDS: [(f64, f64); 5] = [
    (0.0, 100.0),
    (101.0, 240.0),
    (241.0, 320.0),
    (321.0, 1130.0),
    (1131.0, 2260.0),
];
const SO2_BANDS: [(f64, f64); 5] = [
    (0.0, 20.0),
    (21.0, 40.0),
    (41.0, 365.0),
    (366.0, 800.0),
    (801.0, 1600.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Pollutant {
    #[serde(rename = "pm10")]
    Pm10,
    #[serde(rename = "pm2_5")]
    Pm2_5,
    #[serde(rename = "o3")]
    O3,
    #[serde(rename = "co")]
    Co,
    #[serde(rename = "no2")]
    No2,
    #[serde(rename = "so2")]
    So2,
}

impl Pollutant {
    /// Canonical order. On equal sub-indices the earlier pollutant is dominant.
    pub const ALL: [Pollutant; 6] = [
        Self::Pm10,
        Self::Pm2_5,
        Self::O3,
        Self::Co,
        Self::No2,
        Self::So2,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Pm10 => "pm10",
            Self::Pm2_5 => "pm2_5",
            Self::O3 => "o3",
            Self::Co => "co",
            Self::No2 => "no2",
            Self::So2 => "so2",
        }
    }

    fn concentration_bands(self) -> &'static [(f64, f64); 5] {
        match self {
            Self::Pm10 => &PM10_BANDS,
            Self::Pm2_5 => &PM2_5_BANDS,
            Self::O3 => &O3_BANDS,
            Self::Co => &CO_BANDS,
            Self::No2 => &NO2_BANDS,
            Self::So2 => &SO2_BANDS,
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Pollutant concentrations keyed by provider name (`pm10`, `pm2_5`, ...).
/// Keys outside the breakpoint tables (`no`, `nh3`) are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollutantSample(HashMap<String, f64>);

impl PollutantSample {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.0.get(pollutant.key()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AirQualityCategory {
    Boa,
    Moderada,
    Ruim,
    #[serde(rename = "Muito Ruim")]
    MuitoRuim,
    #[serde(rename = "Péssima")]
    Pessima,
}

impl AirQualityCategory {
    /// Upper edges are inclusive: 40 is still `Boa`.
    pub fn from_sub_index(index: f64) -> Self {
        if index <= 40.0 {
            Self::Boa
        } else if index <= 80.0 {
            Self::Moderada
        } else if index <= 120.0 {
            Self::Ruim
        } else if index <= 200.0 {
            Self::MuitoRuim
        } else {
            Self::Pessima
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Boa => "Boa",
            Self::Moderada => "Moderada",
            Self::Ruim => "Ruim",
            Self::MuitoRuim => "Muito Ruim",
            Self::Pessima => "Péssima",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Boa => "A qualidade do ar está boa, adequada para todas as atividades.",
            Self::Moderada => {
                "A qualidade do ar é aceitável, mas grupos sensíveis devem ter cautela."
            }
            Self::Ruim => "A qualidade do ar está ruim, evite longas exposições ao ar livre.",
            Self::MuitoRuim => {
                "A qualidade do ar está muito ruim, evite atividades físicas externas."
            }
            Self::Pessima => "A qualidade do ar está péssima, permaneça em ambientes fechados.",
        }
    }
}

impl std::fmt::Display for AirQualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AirQualityResult {
    #[serde(rename = "mainPollutant")]
    pub dominant_pollutant: Pollutant,
    pub index: u32,
    pub category: AirQualityCategory,
}

#[derive(Debug, Error, PartialEq)]
pub enum IqarError {
    #[error("sample contains none of the indexed pollutants")]
    NoPollutants,
    #[error("invalid concentration for {pollutant}: {value}")]
    InvalidConcentration { pollutant: Pollutant, value: f64 },
}

/// Sub-index of one pollutant.
///
/// The first band containing the value is interpolated linearly. Values below
/// the first band take its lower index. Anything no band contains, including
/// the gaps between published bands (e.g. pm10 50.5), takes [`CEILING_INDEX`].
pub fn sub_index(pollutant: Pollutant, value: f64) -> f64 {
    let bands = pollutant.concentration_bands();
    if value < bands[0].0 {
        return INDEX_BANDS[0].0;
    }

    bands
        .iter()
        .zip(INDEX_BANDS.iter())
        .find(|(&(c_low, c_high), _)| (c_low..=c_high).contains(&value))
        .map(|(&c, &i)| interpolate(value, c, i))
        .unwrap_or(CEILING_INDEX)
}

#[inline]
fn interpolate(value: f64, (c_low, c_high): (f64, f64), (i_low, i_high): (f64, f64)) -> f64 {
    i_low + (value - c_low) * (i_high - i_low) / (c_high - c_low)
}

/// Computes the IQAr of a sample: dominant pollutant, rounded index and category.
pub fn calculate_iqar(sample: &PollutantSample) -> Result<AirQualityResult, IqarError> {
    let mut dominant: Option<(Pollutant, f64)> = None;

    for pollutant in Pollutant::ALL {
        let Some(value) = sample.get(pollutant) else {
            continue;
        };
        if !value.is_finite() || value < 0.0 {
            return Err(IqarError::InvalidConcentration { pollutant, value });
        }

        let score = sub_index(pollutant, value);
        match dominant {
            Some((_, best)) if score <= best => {}
            _ => dominant = Some((pollutant, score)),
        }
    }

    let (pollutant, score) = dominant.ok_or(IqarError::NoPollutants)?;

    Ok(AirQualityResult {
        dominant_pollutant: pollutant,
        index: score.round() as u32,
        category: AirQualityCategory::from_sub_index(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sample(value: f64) -> PollutantSample {
        Pollutant::ALL
            .iter()
            .fold(PollutantSample::new(), |s, p| s.with(p.key(), value))
    }

    #[test]
    fn band_edges_map_exactly() {
        for pollutant in Pollutant::ALL {
            for (&(c_low, c_high), &(i_low, i_high)) in
                pollutant.concentration_bands().iter().zip(INDEX_BANDS.iter())
            {
                assert_eq!(sub_index(pollutant, c_low), i_low, "{pollutant} at {c_low}");
                assert_eq!(sub_index(pollutant, c_high), i_high, "{pollutant} at {c_high}");
            }
        }
    }

    #[test]
    fn pm10_reference_points() {
        assert_eq!(sub_index(Pollutant::Pm10, 50.0), 40.0);
        assert_eq!(sub_index(Pollutant::Pm10, 51.0), 41.0);
        assert_eq!(sub_index(Pollutant::Pm10, 25.0), 20.0);
        assert_eq!(sub_index(Pollutant::Pm10, 425.5), 250.5);
    }

    #[test]
    fn gap_between_bands_takes_the_ceiling() {
        assert_eq!(sub_index(Pollutant::Pm10, 50.5), CEILING_INDEX);
        assert_eq!(sub_index(Pollutant::Co, 9000.5), CEILING_INDEX);
        assert_eq!(sub_index(Pollutant::So2, 40.2), CEILING_INDEX);

        let result = calculate_iqar(&PollutantSample::new().with("pm10", 50.5)).unwrap();
        assert_eq!(result.dominant_pollutant, Pollutant::Pm10);
        assert_eq!(result.index, 300);
        assert_eq!(result.category, AirQualityCategory::Pessima);
    }

    #[test]
    fn past_last_band_saturates() {
        assert_eq!(sub_index(Pollutant::Pm10, 600.0), 300.0);
        assert_eq!(sub_index(Pollutant::Pm10, 601.0), CEILING_INDEX);
        assert_eq!(sub_index(Pollutant::So2, 1e9), CEILING_INDEX);
    }

    #[test]
    fn below_first_band_clamps_to_lowest_index() {
        assert_eq!(sub_index(Pollutant::O3, -5.0), 0.0);
    }

    #[test]
    fn index_is_rounded_max_and_dominant_is_argmax() {
        let sample = PollutantSample::new()
            .with("pm10", 20.0) // 16
            .with("pm2_5", 30.0) // 41 + 4*39/24 = 47.5
            .with("o3", 50.0) // 20
            .with("co", 300.0)
            .with("no2", 10.0)
            .with("so2", 5.0);

        let result = calculate_iqar(&sample).unwrap();
        assert_eq!(result.dominant_pollutant, Pollutant::Pm2_5);
        assert_eq!(result.index, 48);
        assert_eq!(result.category, AirQualityCategory::Moderada);
    }

    #[test]
    fn ties_resolve_in_canonical_order() {
        // pm10 = 50 and so2 = 20 both score 40.
        let sample = PollutantSample::new()
            .with("so2", 20.0)
            .with("pm10", 50.0)
            .with("o3", 10.0);
        let result = calculate_iqar(&sample).unwrap();
        assert_eq!(result.dominant_pollutant, Pollutant::Pm10);

        let result = calculate_iqar(&full_sample(0.0)).unwrap();
        assert_eq!(result.dominant_pollutant, Pollutant::Pm10);
        assert_eq!(result.index, 0);
        assert_eq!(result.category, AirQualityCategory::Boa);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let sample = PollutantSample::new()
            .with("nh3", 5000.0)
            .with("no", 5000.0)
            .with("o3", 101.0);
        let result = calculate_iqar(&sample).unwrap();
        assert_eq!(result.dominant_pollutant, Pollutant::O3);
        assert_eq!(result.index, 41);
    }

    #[test]
    fn empty_sample_is_an_error() {
        assert_eq!(calculate_iqar(&PollutantSample::new()), Err(IqarError::NoPollutants));
        let only_extras = PollutantSample::new().with("nh3", 1.0);
        assert_eq!(calculate_iqar(&only_extras), Err(IqarError::NoPollutants));
    }

    #[test]
    fn negative_or_nan_concentration_is_rejected() {
        let sample = PollutantSample::new().with("pm10", -1.0);
        assert!(matches!(
            calculate_iqar(&sample),
            Err(IqarError::InvalidConcentration { pollutant: Pollutant::Pm10, .. })
        ));
        let sample = PollutantSample::new().with("co", f64::NAN);
        assert!(calculate_iqar(&sample).is_err());
    }

    #[test]
    fn category_edges_are_inclusive() {
        assert_eq!(AirQualityCategory::from_sub_index(40.0), AirQualityCategory::Boa);
        assert_eq!(AirQualityCategory::from_sub_index(41.0), AirQualityCategory::Moderada);
        assert_eq!(AirQualityCategory::from_sub_index(80.0), AirQualityCategory::Moderada);
        assert_eq!(AirQualityCategory::from_sub_index(120.0), AirQualityCategory::Ruim);
        assert_eq!(AirQualityCategory::from_sub_index(121.0), AirQualityCategory::MuitoRuim);
        assert_eq!(AirQualityCategory::from_sub_index(200.0), AirQualityCategory::MuitoRuim);
        assert_eq!(AirQualityCategory::from_sub_index(201.0), AirQualityCategory::Pessima);
    }

    #[test]
    fn saturated_sample_is_pessima() {
        let result = calculate_iqar(&full_sample(1e6)).unwrap();
        assert_eq!(result.index, 300);
        assert_eq!(result.category, AirQualityCategory::Pessima);
        assert_eq!(result.dominant_pollutant, Pollutant::Pm10);
    }

    #[test]
    fn wire_format() {
        let result = AirQualityResult {
            dominant_pollutant: Pollutant::Pm2_5,
            index: 130,
            category: AirQualityCategory::MuitoRuim,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "mainPollutant": "pm2_5", "index": 130, "category": "Muito Ruim" })
        );

        let sample: PollutantSample = serde_json::from_value(serde_json::json!({
            "co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66,
            "so2": 0.64, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12
        }))
        .unwrap();
        assert_eq!(sample.get(Pollutant::O3), Some(68.66));
        assert_eq!(calculate_iqar(&sample).unwrap().dominant_pollutant, Pollutant::O3);
    }
}
