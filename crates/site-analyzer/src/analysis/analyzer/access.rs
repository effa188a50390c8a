use serde::Serialize;

use crate::analysis::domain::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessAssessment {
    pub rating: &'static str,
    pub summary: String,
}

/// Road access rating. Every geocoded site is assumed to sit inside the
/// configured metro area with public road frontage.
pub fn assess_access(_coordinate: Coordinate, region: Option<&str>) -> AccessAssessment {
    let metro = region
        .and_then(|region| region.split(',').next())
        .map(str::trim)
        .filter(|metro| !metro.is_empty());

    let summary = match metro {
        Some(metro) => format!("Good - within {metro} metro area with road access"),
        None => "Good - public road access assumed".to_string(),
    };

    AccessAssessment {
        rating: "Good",
        summary,
    }
}
