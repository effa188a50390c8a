use serde::Serialize;

use crate::analysis::domain::{ParcelInfo, ProviderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityKind {
    Water,
    Sewer,
    Power,
    Gas,
}

impl UtilityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Sewer => "Sewer",
            Self::Power => "Power",
            Self::Gas => "Natural gas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityEstimate {
    pub utility: UtilityKind,
    pub label: &'static str,
    pub availability: &'static str,
    pub cost_low: f64,
    pub cost_high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilityAssessment {
    pub utilities: Vec<UtilityEstimate>,
    pub total_low: f64,
    pub total_high: f64,
}

impl UtilityAssessment {
    pub fn get(&self, kind: UtilityKind) -> Option<&UtilityEstimate> {
        self.utilities.iter().find(|entry| entry.utility == kind)
    }
}

const HOOKUPS: [(UtilityKind, &str, f64, f64); 4] = [
    (
        UtilityKind::Water,
        "Municipal water main likely available at the street frontage",
        3_000.0,
        8_000.0,
    ),
    (
        UtilityKind::Sewer,
        "Public sewer likely available; confirm lateral depth and capacity",
        4_000.0,
        12_000.0,
    ),
    (
        UtilityKind::Power,
        "Overhead or underground service available from the local utility",
        2_000.0,
        6_000.0,
    ),
    (
        UtilityKind::Gas,
        "Natural gas service common in the area; confirm with the provider",
        1_500.0,
        4_000.0,
    ),
];

/// Typical hookup costs. A static lookup: the parcel is accepted so a real
/// utility source can use it later, but it does not affect the estimate.
pub fn assess_utilities(_parcel: &ProviderResult<ParcelInfo>) -> UtilityAssessment {
    let utilities: Vec<UtilityEstimate> = HOOKUPS
        .iter()
        .map(|&(utility, availability, cost_low, cost_high)| UtilityEstimate {
            utility,
            label: utility.label(),
            availability,
            cost_low,
            cost_high,
        })
        .collect();

    let total_low = utilities.iter().map(|entry| entry.cost_low).sum();
    let total_high = utilities.iter().map(|entry| entry.cost_high).sum();

    UtilityAssessment {
        utilities,
        total_low,
        total_high,
    }
}
