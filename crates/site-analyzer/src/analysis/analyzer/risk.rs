use serde::Serialize;

use super::slope::SlopeAssessment;
use crate::analysis::domain::{ElevationSummary, FloodInfo, ProviderResult, SoilInfo, WetlandsInfo};

pub const MAX_RISK_SCORE: u8 = 10;

/// Bounded development risk, always within `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub fn new(points: u32) -> Self {
        Self(points.min(u32::from(MAX_RISK_SCORE)) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            0..=3 => "Low",
            4..=6 => "Moderate",
            _ => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Slope,
    Flood,
    Wetlands,
    Soil,
}

impl RiskFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slope => "Slope",
            Self::Flood => "Flood zone",
            Self::Wetlands => "Wetlands",
            Self::Soil => "Soil drainage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub points: u8,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: RiskScore,
    pub level: &'static str,
    pub components: Vec<RiskComponent>,
}

/// Additive risk score capped at [`MAX_RISK_SCORE`].
///
/// An unavailable provider contributes nothing: missing data is scored as
/// no risk rather than unknown risk.
pub fn score_risk(
    slope: &SlopeAssessment,
    flood: &ProviderResult<FloodInfo>,
    wetlands: &ProviderResult<WetlandsInfo>,
    soil: &ProviderResult<SoilInfo>,
    elevation: &ElevationSummary,
) -> RiskAssessment {
    let mut components = Vec::with_capacity(4);

    components.push(RiskComponent {
        factor: RiskFactor::Slope,
        points: slope.classification.risk_points(),
        notes: format!(
            "{} across {:.1} m of elevation change",
            slope.classification.label(),
            elevation.range_meters()
        ),
    });

    components.push(match flood.as_option() {
        Some(info) if info.in_100_year_floodplain => RiskComponent {
            factor: RiskFactor::Flood,
            points: 3,
            notes: format!("zone {} inside the 100-year floodplain", info.zone),
        },
        Some(info) if info.in_500_year_floodplain => RiskComponent {
            factor: RiskFactor::Flood,
            points: 1,
            notes: format!("zone {} inside the 500-year floodplain", info.zone),
        },
        Some(info) => RiskComponent {
            factor: RiskFactor::Flood,
            points: 0,
            notes: format!("zone {} outside mapped floodplains", info.zone),
        },
        None => unavailable(RiskFactor::Flood),
    });

    components.push(match wetlands.as_option() {
        Some(info) if info.present => RiskComponent {
            factor: RiskFactor::Wetlands,
            points: 2,
            notes: match &info.classification {
                Some(kind) => format!("mapped wetlands present ({kind})"),
                None => "mapped wetlands present".to_string(),
            },
        },
        Some(_) => RiskComponent {
            factor: RiskFactor::Wetlands,
            points: 0,
            notes: "no mapped wetlands".to_string(),
        },
        None => unavailable(RiskFactor::Wetlands),
    });

    components.push(match soil.as_option() {
        Some(info) if has_poor_drainage(info) => RiskComponent {
            factor: RiskFactor::Soil,
            points: 1,
            notes: format!("{} soil, {}", info.soil_type, info.drainage.to_lowercase()),
        },
        Some(info) => RiskComponent {
            factor: RiskFactor::Soil,
            points: 0,
            notes: format!("{} soil, {}", info.soil_type, info.drainage.to_lowercase()),
        },
        None => unavailable(RiskFactor::Soil),
    });

    let total: u32 = components.iter().map(|c| u32::from(c.points)).sum();
    let score = RiskScore::new(total);

    RiskAssessment {
        score,
        level: score.label(),
        components,
    }
}

pub(crate) fn has_poor_drainage(soil: &SoilInfo) -> bool {
    soil.drainage.to_lowercase().contains("poor")
}

fn unavailable(factor: RiskFactor) -> RiskComponent {
    RiskComponent {
        factor,
        points: 0,
        notes: "data unavailable; no points assigned".to_string(),
    }
}

