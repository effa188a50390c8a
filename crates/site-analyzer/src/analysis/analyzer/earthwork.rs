use serde::Serialize;

use super::slope::FEET_PER_METER;
use crate::analysis::domain::ElevationSummary;

/// Reference building area (≈0.25 acre). Not derived from the parcel.
pub const REFERENCE_SITE_AREA_SQFT: f64 = 10_890.0;
pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;
pub const GRADING_COST_PER_CY: f64 = 25.0;
pub const HAULING_COST_PER_CY: f64 = 10.0;
pub const COMPACTION_COST_PER_SQFT: f64 = 0.50;
const LOW_RANGE_FACTOR: f64 = 0.8;
const HIGH_RANGE_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthworkEstimate {
    pub volume_cubic_yards: f64,
    pub grading_cost: f64,
    pub hauling_cost: f64,
    pub compaction_cost: f64,
    pub total_low: f64,
    pub total_high: f64,
}

/// Cut volume assumes an average cut of half the elevation change across
/// the reference area.
pub fn estimate_earthwork(elevation: &ElevationSummary) -> EarthworkEstimate {
    let avg_cut_depth_ft = elevation.range_meters() * FEET_PER_METER / 2.0;
    let volume_cubic_yards = REFERENCE_SITE_AREA_SQFT * avg_cut_depth_ft / CUBIC_FEET_PER_CUBIC_YARD;

    let grading_cost = volume_cubic_yards * GRADING_COST_PER_CY;
    let hauling_cost = volume_cubic_yards * HAULING_COST_PER_CY;
    let compaction_cost = REFERENCE_SITE_AREA_SQFT * COMPACTION_COST_PER_SQFT;
    let total = grading_cost + hauling_cost + compaction_cost;

    EarthworkEstimate {
        volume_cubic_yards,
        grading_cost,
        hauling_cost,
        compaction_cost,
        total_low: total * LOW_RANGE_FACTOR,
        total_high: total * HIGH_RANGE_FACTOR,
    }
}
