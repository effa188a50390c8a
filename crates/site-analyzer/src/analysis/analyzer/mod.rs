//! Pure, total assessments derived from aggregated site data.

mod access;
mod earthwork;
mod risk;
mod slope;
mod utilities;

pub use access::{assess_access, AccessAssessment};
pub use earthwork::{
    estimate_earthwork, EarthworkEstimate, COMPACTION_COST_PER_SQFT, GRADING_COST_PER_CY,
    HAULING_COST_PER_CY, REFERENCE_SITE_AREA_SQFT,
};
pub use risk::{score_risk, RiskAssessment, RiskComponent, RiskFactor, RiskScore, MAX_RISK_SCORE};
pub use slope::{
    classify_slope, Buildability, RiskLevel, SlopeAssessment, SlopeClass, FEET_PER_METER,
};
pub use utilities::{assess_utilities, UtilityAssessment, UtilityEstimate, UtilityKind};
