use serde::Serialize;

use crate::analysis::domain::ElevationSummary;

pub const FEET_PER_METER: f64 = 3.28084;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeClass {
    Flat,
    Gentle,
    Moderate,
    Steep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Buildability {
    Excellent,
    Good,
    Fair,
    Challenging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl SlopeClass {
    /// Bucket an elevation range in meters. Upper bounds are exclusive.
    pub fn from_range(range_m: f64) -> Self {
        if range_m < 3.0 {
            Self::Flat
        } else if range_m < 8.0 {
            Self::Gentle
        } else if range_m < 15.0 {
            Self::Moderate
        } else {
            Self::Steep
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Flat => "Flat (< 5%)",
            Self::Gentle => "Gentle (5-15%)",
            Self::Moderate => "Moderate (15-25%)",
            Self::Steep => "Steep (> 25%)",
        }
    }

    pub const fn buildability(self) -> Buildability {
        match self {
            Self::Flat => Buildability::Excellent,
            Self::Gentle => Buildability::Good,
            Self::Moderate => Buildability::Fair,
            Self::Steep => Buildability::Challenging,
        }
    }

    pub const fn risk_level(self) -> RiskLevel {
        match self {
            Self::Flat | Self::Gentle => RiskLevel::Low,
            Self::Moderate => RiskLevel::Medium,
            Self::Steep => RiskLevel::High,
        }
    }

    pub const fn grading_cost_factor(self) -> f64 {
        match self {
            Self::Flat => 1.0,
            Self::Gentle => 1.3,
            Self::Moderate => 1.8,
            Self::Steep => 2.5,
        }
    }

    /// Points this class contributes to the overall risk score.
    pub const fn risk_points(self) -> u8 {
        match self {
            Self::Flat => 1,
            Self::Gentle => 2,
            Self::Moderate => 3,
            Self::Steep => 4,
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Flat => {
                "Standard slab-on-grade foundation; minimal grading and conventional drainage."
            }
            Self::Gentle => {
                "Balance cut and fill on site; plan positive drainage away from the building pad."
            }
            Self::Moderate => {
                "Budget for retaining walls or a stepped foundation; obtain a geotechnical report."
            }
            Self::Steep => {
                "Engage a geotechnical engineer early; expect engineered walls, erosion control and hillside review."
            }
        }
    }
}

impl Buildability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - minimal grading required",
            Self::Good => "Good - standard grading techniques",
            Self::Fair => "Fair - may require retaining walls",
            Self::Challenging => "Challenging - significant earthwork required",
        }
    }
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeAssessment {
    pub elevation_change_meters: f64,
    pub elevation_change_feet: f64,
    pub classification: SlopeClass,
    pub classification_label: &'static str,
    pub buildability: Buildability,
    pub buildability_label: &'static str,
    pub risk_level: RiskLevel,
    pub grading_cost_factor: f64,
    pub recommendation: &'static str,
}

pub fn classify_slope(elevation: &ElevationSummary) -> SlopeAssessment {
    let range_m = elevation.range_meters();
    let classification = SlopeClass::from_range(range_m);
    let buildability = classification.buildability();

    SlopeAssessment {
        elevation_change_meters: round2(range_m),
        elevation_change_feet: round2(range_m * FEET_PER_METER),
        classification,
        classification_label: classification.label(),
        buildability,
        buildability_label: buildability.label(),
        risk_level: classification.risk_level(),
        grading_cost_factor: classification.grading_cost_factor(),
        recommendation: classification.recommendation(),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
